//! Subcommand: `flowscribe repl` — interactive classification and editing.
//!
//! Plain lines are classified into a fresh [`WorkflowDraft`].  Lines starting
//! with `:` are commands that edit, approve, or export the current draft.
//! The draft is a local value owned by the loop and passed to every command.

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};

use flowscribe_core::{StepClassifier, WorkflowDraft};
use flowscribe_docs::{ExportFormat, ExportOptions, ReportMetadata, exporter_for};

use crate::config::AppConfig;

const HELP: &str = "\
  Type a process description to generate a workflow, or a command:
    :show                 Show the current workflow
    :edit N LABEL         Replace step N
    :add LABEL            Append a step
    :insert N LABEL       Insert a step at position N
    :remove N             Remove step N
    :move FROM TO         Move step FROM to position TO
    :approve              Approve the workflow
    :reopen               Reopen an approved workflow
    :export FORMAT [PATH] Export (text, csv, report, pdf, json, diagram)
    :help                 Show this help
    :quit                 Exit";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One parsed REPL input line.
#[derive(Debug, PartialEq)]
pub enum ReplCommand {
    Describe(String),
    Show,
    Edit(usize, String),
    Add(String),
    Insert(usize, String),
    Remove(usize),
    Move(usize, usize),
    Approve,
    Reopen,
    Export(ExportFormat, Option<PathBuf>),
    Help,
    Quit,
}

/// Parse a non-empty input line.
pub fn parse_command(line: &str) -> std::result::Result<ReplCommand, String> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(ReplCommand::Describe(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "show" | "s" => Ok(ReplCommand::Show),
        "edit" | "e" => {
            let (n, label) = number_and_text(args, "edit")?;
            Ok(ReplCommand::Edit(n, label))
        }
        "add" | "a" => {
            if args.is_empty() {
                return Err("usage: :add LABEL".into());
            }
            Ok(ReplCommand::Add(args.to_string()))
        }
        "insert" | "i" => {
            let (n, label) = number_and_text(args, "insert")?;
            Ok(ReplCommand::Insert(n, label))
        }
        "remove" | "rm" => Ok(ReplCommand::Remove(parse_number(args, "remove")?)),
        "move" | "mv" => {
            let mut parts = args.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(from), Some(to), None) => Ok(ReplCommand::Move(
                    parse_number(from, "move")?,
                    parse_number(to, "move")?,
                )),
                _ => Err("usage: :move FROM TO".into()),
            }
        }
        "approve" => Ok(ReplCommand::Approve),
        "reopen" => Ok(ReplCommand::Reopen),
        "export" | "x" => {
            let (format, path) = match args.split_once(char::is_whitespace) {
                Some((format, path)) => (format, path.trim()),
                None => (args, ""),
            };
            if format.is_empty() {
                return Err("usage: :export FORMAT [PATH]".into());
            }
            let format = format.parse::<ExportFormat>().map_err(|e| e.to_string())?;
            let path = (!path.is_empty()).then(|| PathBuf::from(path));
            Ok(ReplCommand::Export(format, path))
        }
        "help" | "h" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command `:{other}`; try :help")),
    }
}

fn parse_number(s: &str, command: &str) -> std::result::Result<usize, String> {
    s.trim()
        .parse()
        .map_err(|_| format!(":{command} expects a step number, got `{s}`"))
}

fn number_and_text(args: &str, command: &str) -> std::result::Result<(usize, String), String> {
    match args.split_once(char::is_whitespace) {
        Some((n, text)) if !text.trim().is_empty() => {
            Ok((parse_number(n, command)?, text.trim().to_string()))
        }
        _ => Err(format!("usage: :{command} N LABEL")),
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// What the loop should do after a command.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Print(String),
    Quit,
}

/// Per-session settings.
pub struct Session {
    pub classifier: StepClassifier,
    pub title: String,
    pub export: ExportOptions,
}

impl Session {
    /// Apply `command` to `draft`, returning what to print.
    ///
    /// Rejected edits leave `draft` untouched and are reported as text.
    pub fn apply(
        &self,
        command: ReplCommand,
        draft: &mut Option<WorkflowDraft>,
    ) -> Result<Outcome> {
        let message = match command {
            ReplCommand::Describe(text) => {
                let result = self.classifier.classify(&text);
                let rendered = render(result.steps());
                *draft = Some(WorkflowDraft::from_result(self.title.clone(), &result));
                rendered
            }
            ReplCommand::Help => HELP.to_string(),
            ReplCommand::Quit => return Ok(Outcome::Quit),
            command => {
                let Some(current) = draft.as_mut() else {
                    return Ok(Outcome::Print(
                        "  No workflow yet. Type a process description first.".into(),
                    ));
                };
                match self.apply_to_draft(command, current) {
                    Ok(message) => message,
                    Err(e) => format!("  Error: {e}"),
                }
            }
        };
        Ok(Outcome::Print(message))
    }

    fn apply_to_draft(&self, command: ReplCommand, draft: &mut WorkflowDraft) -> Result<String> {
        match command {
            ReplCommand::Show => Ok(show(draft)),
            ReplCommand::Edit(n, label) => {
                draft.edit(n, label)?;
                Ok(show(draft))
            }
            ReplCommand::Add(label) => {
                draft.push(label)?;
                Ok(show(draft))
            }
            ReplCommand::Insert(n, label) => {
                draft.insert(n, label)?;
                Ok(show(draft))
            }
            ReplCommand::Remove(n) => {
                let label = draft.remove(n)?;
                Ok(format!("  Removed \"{label}\"\n{}", show(draft)))
            }
            ReplCommand::Move(from, to) => {
                draft.move_step(from, to)?;
                Ok(show(draft))
            }
            ReplCommand::Approve => {
                draft.approve()?;
                Ok(format!("  Approved \"{}\" ({} steps)", draft.title, draft.len()))
            }
            ReplCommand::Reopen => {
                draft.reopen()?;
                Ok("  Workflow reopened for editing".into())
            }
            ReplCommand::Export(format, path) => self.export(draft, format, path),
            ReplCommand::Describe(_) | ReplCommand::Help | ReplCommand::Quit => {
                Ok(String::new())
            }
        }
    }

    fn export(
        &self,
        draft: &WorkflowDraft,
        format: ExportFormat,
        path: Option<PathBuf>,
    ) -> Result<String> {
        let options = ExportOptions {
            title: draft.title.clone(),
            metadata: Some(ReportMetadata::now(Some("repl session".into()))),
            ..self.export.clone()
        };
        let exporter = exporter_for(format, &options);
        match path {
            Some(path) => {
                let rendered = exporter.render(&draft.steps())?;
                std::fs::write(&path, &rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), %format, "draft exported");
                Ok(format!("  Wrote {format} export to {}", path.display()))
            }
            None => Ok(exporter.export(&draft.steps())?.trim_end().to_string()),
        }
    }
}

fn render(steps: &[flowscribe_core::Step]) -> String {
    steps
        .iter()
        .map(|s| format!("  {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn show(draft: &WorkflowDraft) -> String {
    if draft.is_empty() {
        return "  (no steps)".into();
    }
    let status = if draft.is_approved() { " [approved]" } else { "" };
    format!("  {}{status}\n{}", draft.title, render(&draft.steps()))
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// Run the interactive loop on stdin/stdout.
pub fn cmd_repl(
    config: &AppConfig,
    classifier: StepClassifier,
    title: Option<String>,
) -> Result<()> {
    let session = Session {
        classifier,
        title: title.unwrap_or_else(|| config.title.clone()),
        export: ExportOptions {
            title: config.title.clone(),
            metadata: None,
            pretty: true,
            diagram_label_width: config.diagram_label_width,
        },
    };

    println!();
    println!("  Flowscribe v{}", env!("CARGO_PKG_VERSION"));
    println!("  Describe a process, or type :help. :quit to exit.");
    println!();

    let mut draft: Option<WorkflowDraft> = None;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("> ");
    stdout.flush().context("failed to flush stdout")?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read input")?;
        let trimmed = line.trim();

        if !trimmed.is_empty() {
            let outcome = match parse_command(trimmed) {
                Ok(command) => session.apply(command, &mut draft),
                Err(usage) => Ok(Outcome::Print(format!("  {usage}"))),
            };
            match outcome {
                Ok(Outcome::Print(text)) => println!("{text}"),
                Ok(Outcome::Quit) => {
                    info!("user requested exit");
                    return Ok(());
                }
                Err(e) => {
                    error!(error = %e, "command failed");
                    println!("  Error: {e}");
                }
            }
        }

        print!("> ");
        stdout.flush().context("failed to flush stdout")?;
    }

    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
