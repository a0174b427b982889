//! Subcommand: `flowscribe rules` — list and validate rule tables.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use flowscribe_core::{RuleSet, StepClassifier};

use crate::cli::RuleArgs;
use crate::config::AppConfig;
use crate::helpers::resolve_rule_set;

/// Print the effective rule table.
pub fn cmd_rules_list(config: &AppConfig, args: &RuleArgs, json: bool) -> Result<()> {
    let rules = resolve_rule_set(config, args)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
    } else {
        print!("{}", render_listing(&rules));
    }
    Ok(())
}

/// Validate a rule file and report what it contains.
pub fn cmd_rules_check(path: &Path) -> Result<()> {
    let rules =
        RuleSet::load(path).with_context(|| format!("invalid rule file {}", path.display()))?;
    StepClassifier::new(rules.clone()).context("rule table failed to compile")?;
    println!(
        "  {} is valid: {} domain(s), {} rule(s)",
        path.display(),
        rules.domains.len(),
        rules.rule_count()
    );
    Ok(())
}

/// Human-readable listing in evaluation order.
pub fn render_listing(rules: &RuleSet) -> String {
    let mut out = String::new();
    for domain in &rules.domains {
        let _ = writeln!(out, "[{}] gate: {}", domain.name, domain.gate.join(", "));
        for rule in &domain.rules {
            let _ = writeln!(out, "    {} <- {}", rule.label, rule.keywords.join(", "));
        }
    }
    if !rules.common.is_empty() {
        let _ = writeln!(out, "[common]");
        for rule in &rules.common {
            let _ = writeln!(out, "    {} <- {}", rule.label, rule.keywords.join(", "));
        }
    }
    out
}
