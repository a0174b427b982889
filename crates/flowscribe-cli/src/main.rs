//! CLI entry point for Flowscribe.
//!
//! This binary provides the `flowscribe` command with subcommands for
//! generating workflows, inspecting rule tables, and editing workflows
//! interactively.

mod cli;
mod config;
mod generate;
mod helpers;
mod repl;
mod rules_cmd;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands, RulesAction};
use crate::config::AppConfig;
use crate::generate::{GenerateArgs, cmd_generate};
use crate::helpers::{build_classifier, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Generate {
            text,
            file,
            format,
            output,
            title,
            metadata,
            rules,
        } => {
            let args = GenerateArgs {
                text,
                file,
                format,
                output,
                title,
                metadata,
                rules,
            };
            cmd_generate(&config, args).await
        }
        Commands::Rules { action } => match action {
            RulesAction::List { json, rules } => rules_cmd::cmd_rules_list(&config, &rules, json),
            RulesAction::Check { path } => rules_cmd::cmd_rules_check(&path),
        },
        Commands::Repl { title, rules } => {
            let classifier = build_classifier(&config, &rules)?;
            repl::cmd_repl(&config, classifier, title)
        }
    }
}
