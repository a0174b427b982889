//! Subcommand: `flowscribe generate`.
//!
//! Reads a description from the argument, a document, or stdin, classifies
//! it, and writes the chosen export to stdout or a file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use flowscribe_docs::{ExportFormat, ExportOptions, ReportMetadata, exporter_for};

use crate::cli::RuleArgs;
use crate::config::AppConfig;
use crate::helpers::build_classifier;

/// Flags of the `generate` subcommand.
pub struct GenerateArgs {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub metadata: bool,
    pub rules: RuleArgs,
}

/// Where the description came from, for report metadata.
enum Source {
    Argument(String),
    File(PathBuf),
    Stdin,
}

impl Source {
    fn describe(&self) -> String {
        match self {
            Self::Argument(_) => "command line".into(),
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "stdin".into(),
        }
    }
}

/// Run the `generate` subcommand.
pub async fn cmd_generate(config: &AppConfig, args: GenerateArgs) -> Result<()> {
    let classifier = build_classifier(config, &args.rules)?;

    let source = match (args.text, args.file) {
        (Some(text), _) => Source::Argument(text),
        (None, Some(path)) => Source::File(path),
        (None, None) => Source::Stdin,
    };
    let text = read_source(&source).await?;
    let text = match config.max_input_chars {
        Some(max) => flowscribe_docs::truncate_input(&text, max),
        None => text.as_str(),
    };

    let result = classifier.classify(text);
    if result.is_placeholder() {
        warn!(label = %result.steps()[0].label, "no workflow steps matched");
    }

    let format = resolve_format(args.format, args.output.as_deref(), config.default_format);
    let options = ExportOptions {
        title: args.title.unwrap_or_else(|| config.title.clone()),
        metadata: args
            .metadata
            .then(|| ReportMetadata::now(Some(source.describe()))),
        pretty: true,
        diagram_label_width: config.diagram_label_width,
    };
    let exporter = exporter_for(format, &options);

    match &args.output {
        Some(path) => {
            let rendered = exporter
                .render(result.steps())
                .with_context(|| format!("failed to render {format} export"))?;
            tokio::fs::write(path, &rendered)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), %format, steps = result.len(), "workflow exported");
            eprintln!("  Wrote {} step(s) to {}", result.len(), path.display());
        }
        None if format.is_binary() => {
            bail!("{format} output needs --output FILE");
        }
        None => {
            let rendered = exporter
                .export(result.steps())
                .with_context(|| format!("failed to render {format} export"))?;
            print!("{rendered}");
            if !rendered.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

async fn read_source(source: &Source) -> Result<String> {
    match source {
        Source::Argument(text) => Ok(text.clone()),
        Source::File(path) => flowscribe_docs::extract_text(path)
            .await
            .with_context(|| format!("failed to extract text from {}", path.display())),
        Source::Stdin => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// `--format`, else the output file extension, else the configured default.
pub fn resolve_format(
    flag: Option<ExportFormat>,
    output: Option<&Path>,
    default: ExportFormat,
) -> ExportFormat {
    flag.or_else(|| {
        output
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
    })
    .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_extension() {
        let format = resolve_format(
            Some(ExportFormat::Json),
            Some(Path::new("out.csv")),
            ExportFormat::Text,
        );
        assert_eq!(format, ExportFormat::Json);
    }

    #[test]
    fn extension_beats_default() {
        let format = resolve_format(None, Some(Path::new("out.MD")), ExportFormat::Text);
        assert_eq!(format, ExportFormat::Report);
    }

    #[test]
    fn default_when_extension_unknown() {
        let format = resolve_format(None, Some(Path::new("out.bin")), ExportFormat::Csv);
        assert_eq!(format, ExportFormat::Csv);
        assert_eq!(resolve_format(None, None, ExportFormat::Diagram), ExportFormat::Diagram);
    }

    #[tokio::test]
    async fn generate_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("process.txt");
        let output = dir.path().join("workflow.csv");
        std::fs::write(&input, "Customer places order.\nEmail the receipt.").unwrap();

        let args = GenerateArgs {
            text: None,
            file: Some(input),
            format: None,
            output: Some(output.clone()),
            title: None,
            metadata: false,
            rules: RuleArgs::default(),
        };
        cmd_generate(&AppConfig::default(), args).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "step,label\r\n1,Process customer order\r\n2,Send notification\r\n"
        );
    }

    #[tokio::test]
    async fn report_with_metadata_names_source() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("workflow.md");
        let args = GenerateArgs {
            text: Some("Deploy the api".into()),
            file: None,
            format: None,
            output: Some(output.clone()),
            title: Some("Release".into()),
            metadata: true,
            rules: RuleArgs::default(),
        };
        cmd_generate(&AppConfig::default(), args).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("# Release\n"));
        assert!(written.contains("- Source: command line\n"));
        assert!(written.ends_with("1. Deploy application\n"));
    }

    #[tokio::test]
    async fn pdf_goes_to_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("workflow.pdf");
        let args = GenerateArgs {
            text: Some("Deploy the api".into()),
            file: None,
            format: None,
            output: Some(output.clone()),
            title: None,
            metadata: false,
            rules: RuleArgs::default(),
        };
        cmd_generate(&AppConfig::default(), args).await.unwrap();

        let text = flowscribe_docs::extract_text(&output).await.unwrap();
        assert!(text.contains("Step 1: Deploy application"));
    }

    #[tokio::test]
    async fn pdf_to_stdout_is_refused() {
        let args = GenerateArgs {
            text: Some("Deploy the api".into()),
            file: None,
            format: Some(ExportFormat::Pdf),
            output: None,
            title: None,
            metadata: false,
            rules: RuleArgs::default(),
        };
        let err = cmd_generate(&AppConfig::default(), args).await.unwrap_err();
        assert!(err.to_string().contains("--output"));
    }
}
