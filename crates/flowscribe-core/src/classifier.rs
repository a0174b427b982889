//! Step classifier — turns free text into an ordered list of workflow steps.
//!
//! Classification runs in a fixed order:
//!
//! 1. Empty or whitespace-only input yields an [`StepKind::EmptyInput`]
//!    placeholder.
//! 2. The text is split into lower-cased sentences.
//! 3. For each sentence, each domain whose gate hits contributes every rule
//!    label whose keywords hit, in table order.
//! 4. Common-action rules are evaluated for every sentence regardless of
//!    domain.
//! 5. Labels are deduplicated, first occurrence wins, and numbered from 1.
//!
//! Matching is plain substring containment on the lower-cased sentence,
//! backed by one Aho-Corasick automaton per keyword set.
//!
//! [`StepKind::EmptyInput`]: crate::result::StepKind::EmptyInput

use std::collections::HashSet;
use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::result::WorkflowResult;
use crate::rules::{Rule, RuleSet};
use crate::sentence::split_sentences;

static BUILTIN: LazyLock<StepClassifier> = LazyLock::new(StepClassifier::builtin);

/// Classify `text` with the built-in rule table.
pub fn classify(text: &str) -> WorkflowResult {
    BUILTIN.classify(text)
}

// ---------------------------------------------------------------------------
// Keyword sets
// ---------------------------------------------------------------------------

/// A set of lower-cased keywords matched by substring containment.
#[derive(Debug, Clone)]
struct KeywordSet {
    keywords: Vec<String>,
    /// `None` only if the automaton failed to build; matching then falls
    /// back to `str::contains`.
    automaton: Option<AhoCorasick>,
}

impl KeywordSet {
    fn new(keywords: &[String]) -> Self {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

        let automaton = match AhoCorasick::new(&keywords) {
            Ok(ac) => Some(ac),
            Err(e) => {
                tracing::error!(error = %e, "failed to build aho-corasick automaton");
                None
            }
        };

        Self {
            keywords,
            automaton,
        }
    }

    fn matches(&self, sentence: &str) -> bool {
        match &self.automaton {
            Some(ac) => ac.is_match(sentence),
            None => self.keywords.iter().any(|k| sentence.contains(k.as_str())),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    keywords: KeywordSet,
    label: String,
}

impl CompiledRule {
    fn new(rule: &Rule) -> Self {
        Self {
            keywords: KeywordSet::new(&rule.keywords),
            label: rule.label.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledDomain {
    name: String,
    gate: KeywordSet,
    rules: Vec<CompiledRule>,
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// A compiled, immutable rule table.
///
/// `StepClassifier` is `Send + Sync` and holds no per-call state, so one
/// instance can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct StepClassifier {
    domains: Vec<CompiledDomain>,
    common: Vec<CompiledRule>,
}

impl StepClassifier {
    /// Validate and compile a rule table.
    pub fn new(rules: RuleSet) -> Result<Self> {
        rules.validate()?;
        Ok(Self::compile(&rules))
    }

    /// Classifier over [`RuleSet::builtin`].
    pub fn builtin() -> Self {
        Self::compile(&RuleSet::builtin())
    }

    fn compile(rules: &RuleSet) -> Self {
        let domains = rules
            .domains
            .iter()
            .map(|d| CompiledDomain {
                name: d.name.clone(),
                gate: KeywordSet::new(&d.gate),
                rules: d.rules.iter().map(CompiledRule::new).collect(),
            })
            .collect::<Vec<_>>();
        let common = rules.common.iter().map(CompiledRule::new).collect::<Vec<_>>();

        debug!(
            domains = domains.len(),
            common = common.len(),
            "classifier compiled"
        );
        Self { domains, common }
    }

    /// Domain names in evaluation order.
    pub fn domain_names(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.name.as_str()).collect()
    }

    /// Turn `text` into numbered workflow steps.
    ///
    /// Never fails: empty input and unmatched text produce a single
    /// placeholder step.
    pub fn classify(&self, text: &str) -> WorkflowResult {
        if text.trim().is_empty() {
            debug!("empty workflow description");
            return WorkflowResult::empty_input();
        }

        let sentences = split_sentences(text);
        let Some(first) = sentences.first() else {
            warn!("input contains no sentences");
            return WorkflowResult::no_steps();
        };

        let mut raw = Vec::new();
        for sentence in &sentences {
            self.collect_labels(sentence, &mut raw);
        }

        let labels = dedup_first_wins(raw);
        if labels.is_empty() {
            warn!(
                sentences = sentences.len(),
                "no rule matched, echoing first sentence"
            );
            return WorkflowResult::fallback(first);
        }

        info!(
            sentences = sentences.len(),
            steps = labels.len(),
            "workflow classified"
        );
        WorkflowResult::from_labels(labels)
    }

    /// Append every label that fires for `sentence` to `raw`.
    fn collect_labels<'a>(&'a self, sentence: &str, raw: &mut Vec<&'a str>) {
        for domain in &self.domains {
            if !domain.gate.matches(sentence) {
                continue;
            }
            debug!(domain = %domain.name, sentence, "domain gate hit");
            raw.extend(
                domain
                    .rules
                    .iter()
                    .filter(|r| r.keywords.matches(sentence))
                    .map(|r| r.label.as_str()),
            );
        }

        raw.extend(
            self.common
                .iter()
                .filter(|r| r.keywords.matches(sentence))
                .map(|r| r.label.as_str()),
        );
    }
}

impl Default for StepClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Drop repeated labels, keeping each at its first position.
fn dedup_first_wins(raw: Vec<&str>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .filter(|label| seen.insert(*label))
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
