//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization and rule table resolution.

use anyhow::{Context, Result, bail};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use flowscribe_core::{RuleSet, StepClassifier};

use crate::cli::RuleArgs;
use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// Logs go to stderr so exports on stdout stay machine-readable.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Resolve the effective rule table from flags and configuration.
///
/// `--rules` beats `rules_path`; `--no-builtin` beats `extend_builtin`.
pub fn resolve_rule_set(config: &AppConfig, args: &RuleArgs) -> Result<RuleSet> {
    let path = args.rules.as_ref().or(config.rules_path.as_ref());
    let extend_builtin = config.extend_builtin && !args.no_builtin;

    let mut rules = match path {
        Some(path) => {
            let user = RuleSet::load(path)
                .with_context(|| format!("failed to load rules from {}", path.display()))?;
            if extend_builtin {
                let mut merged = RuleSet::builtin();
                merged.extend(user);
                merged
            } else {
                user
            }
        }
        None if args.no_builtin => {
            bail!("--no-builtin needs a rule file from --rules, rules_path or FLOWSCRIBE_RULES")
        }
        None => RuleSet::builtin(),
    };

    if !args.domains.is_empty() {
        rules.retain_domains(&args.domains)?;
    }

    info!(
        domains = ?rules.domain_names(),
        rules = rules.rule_count(),
        "rule table resolved"
    );
    Ok(rules)
}

/// Build a classifier from flags and configuration.
pub fn build_classifier(config: &AppConfig, args: &RuleArgs) -> Result<StepClassifier> {
    let rules = resolve_rule_set(config, args)?;
    let classifier = StepClassifier::new(rules).context("invalid rule table")?;
    debug!(domains = ?classifier.domain_names(), "classifier ready");
    Ok(classifier)
}
