//! CLI argument definitions for Flowscribe.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use flowscribe_docs::ExportFormat;

/// Flowscribe -- turn process descriptions into numbered workflow steps.
#[derive(Parser)]
#[command(
    name = "flowscribe",
    version,
    about = "Flowscribe -- process descriptions in, workflow steps out",
    long_about = "Classifies free-text process descriptions into ordered, deduplicated \
                  workflow steps using keyword rules, and exports them as text, CSV, \
                  Markdown reports, JSON, or Mermaid flowcharts."
)]
pub struct Cli {
    /// Configuration file (defaults to $FLOWSCRIBE_CONFIG or config/flowscribe.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a workflow from text, a document, or stdin.
    Generate {
        /// The process description. Read from --file or stdin when omitted.
        text: Option<String>,

        /// Plain-text document to read the description from.
        #[arg(long, short, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Output format: text, csv, report, pdf, json, or diagram.
        #[arg(long, short = 'F', value_parser = parse_format)]
        format: Option<ExportFormat>,

        /// Write the export to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Title used by the report format.
        #[arg(long, short)]
        title: Option<String>,

        /// Include the metadata block in reports.
        #[arg(long)]
        metadata: bool,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Inspect or validate rule tables.
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Interactive session: classify descriptions and edit the resulting workflow.
    Repl {
        /// Title for workflows created in this session.
        #[arg(long, short)]
        title: Option<String>,

        #[command(flatten)]
        rules: RuleArgs,
    },
}

/// Actions for rule tables.
#[derive(Subcommand)]
pub enum RulesAction {
    /// Print the effective rule table.
    List {
        /// Print as JSON instead of a listing.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Validate a rule file without classifying anything.
    Check {
        /// TOML or JSON rule file.
        path: PathBuf,
    },
}

/// Rule selection shared by subcommands.
#[derive(Args, Clone, Default)]
pub struct RuleArgs {
    /// Extra rule file (TOML or JSON), merged with the built-in table.
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Use only the rule file (`--rules` or the configured one), without
    /// the built-in table.
    #[arg(long)]
    pub no_builtin: bool,

    /// Restrict classification to these domains (repeatable).
    #[arg(long = "domain", short)]
    pub domains: Vec<String>,
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse().map_err(|e: flowscribe_docs::DocsError| e.to_string())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_with_format() {
        let cli = Cli::try_parse_from([
            "flowscribe",
            "generate",
            "customer places order",
            "-F",
            "csv",
            "--domain",
            "business",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                text,
                format,
                rules,
                ..
            } => {
                assert_eq!(text.as_deref(), Some("customer places order"));
                assert_eq!(format, Some(ExportFormat::Csv));
                assert_eq!(rules.domains, vec!["business"]);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn unknown_format_rejected() {
        let result = Cli::try_parse_from(["flowscribe", "generate", "x", "--format", "docx"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_builtin_parses_without_rules_flag() {
        let cli = Cli::try_parse_from(["flowscribe", "rules", "list", "--no-builtin"]).unwrap();
        match cli.command {
            Commands::Rules {
                action: RulesAction::List { rules, .. },
            } => {
                assert!(rules.no_builtin);
                assert!(rules.rules.is_none());
            }
            _ => panic!("expected rules list"),
        }
    }
}
