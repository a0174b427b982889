//! Rule tables — the data that drives step classification.
//!
//! A [`RuleSet`] is an ordered list of [`Domain`]s followed by an ordered
//! list of common-action [`Rule`]s.  A domain's gate keywords decide whether
//! its rules are evaluated for a sentence at all; common rules are evaluated
//! for every sentence.
//!
//! Rule tables are plain data.  The built-in table lives in
//! [`BUILTIN_DOMAINS`] / [`BUILTIN_COMMON`]; user tables are loaded from TOML
//! or JSON:
//!
//! ```toml
//! [[domains]]
//! name = "logistics"
//! gate = ["shipment", "warehouse"]
//!
//! [[domains.rules]]
//! keywords = ["pick", "pack"]
//! label = "Pick and pack items"
//!
//! [[common]]
//! keywords = ["archive"]
//! label = "Archive records"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, Result};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single keyword → canonical label rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Trigger keywords; the rule fires when any of them is a substring of
    /// the sentence.
    pub keywords: Vec<String>,
    /// The canonical step label contributed when the rule fires.
    pub label: String,
}

/// A thematic bucket of rules gated by coarse keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain name (e.g. "education").
    pub name: String,
    /// Gate keywords; at least one must hit before `rules` are evaluated.
    pub gate: Vec<String>,
    /// Finer-grained rules, evaluated in order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// The complete, ordered classification table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Domains, evaluated in order for every sentence.
    #[serde(default)]
    pub domains: Vec<Domain>,
    /// Domain-independent rules, evaluated after the domains.
    #[serde(default)]
    pub common: Vec<Rule>,
}

impl Rule {
    /// Create a rule from keywords and a label.
    pub fn new<K, S>(keywords: K, label: impl Into<String>) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            label: label.into(),
        }
    }
}

impl Domain {
    /// Create a domain with the given gate keywords and no rules.
    pub fn new<K, S>(name: impl Into<String>, gate: K) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            gate: gate.into_iter().map(Into::into).collect(),
            rules: Vec::new(),
        }
    }

    /// Append a rule to this domain.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

/// `(keywords, label)` pairs in static form.
pub type StaticRule = (&'static [&'static str], &'static str);

/// `(name, gate keywords, rules)` in static form.
pub type StaticDomain = (&'static str, &'static [&'static str], &'static [StaticRule]);

/// Built-in domains, in evaluation order.
pub const BUILTIN_DOMAINS: &[StaticDomain] = &[
    (
        "education",
        &["student", "admission", "course", "exam", "result", "grade", "enroll", "tuition"],
        &[
            (&["admission", "apply"], "Process student admission"),
            (&["course", "enroll"], "Enroll student into course"),
            (&["tuition", "fee"], "Collect tuition fees"),
            (&["exam"], "Schedule examination"),
            (&["result", "grade"], "Publish academic results"),
        ],
    ),
    (
        "business",
        &["customer", "order", "payment", "pay", "invoice", "billing", "report", "purchase"],
        &[
            (&["order", "purchase"], "Process customer order"),
            (&["payment", "pay", "transaction"], "Process payment transaction"),
            (&["invoice", "billing"], "Generate invoice"),
            (&["ship", "deliver"], "Ship order to customer"),
            (&["report"], "Generate business report"),
        ],
    ),
    (
        "it",
        &["login", "register", "signup", "deploy", "server", "bug", "api", "backup"],
        &[
            (&["register", "signup"], "Register new user"),
            (&["login"], "Authenticate user login"),
            (&["deploy"], "Deploy application"),
            (&["bug", "error"], "Identify and fix software issue"),
            (&["backup"], "Back up server data"),
        ],
    ),
    (
        "real-estate",
        &["property", "house", "apartment", "tenant", "lease", "rent", "listing"],
        &[
            (&["listing", "list"], "List property on market"),
            (&["viewing", "visit", "tour"], "Schedule property viewing"),
            (&["inspect"], "Conduct property inspection"),
            (&["offer", "negotiat"], "Negotiate purchase offer"),
            (&["lease", "rent", "tenant"], "Sign lease agreement"),
        ],
    ),
    (
        "healthcare",
        &["patient", "doctor", "appointment", "hospital", "clinic", "diagnos", "prescri"],
        &[
            (&["appointment", "book"], "Schedule patient appointment"),
            (&["admit", "check in", "check-in"], "Admit patient"),
            (&["diagnos", "examine"], "Diagnose patient condition"),
            (&["prescri", "medic"], "Prescribe medication"),
            (&["discharge"], "Discharge patient"),
        ],
    ),
    (
        "software",
        &["code", "feature", "requirement", "test", "release", "sprint", "develop"],
        &[
            (&["requirement"], "Gather requirements"),
            (&["design"], "Design solution architecture"),
            (&["develop", "implement", "code"], "Develop feature"),
            (&["review"], "Review code changes"),
            (&["test"], "Run automated tests"),
            (&["release"], "Release new version"),
        ],
    ),
];

/// Built-in common-action rules, evaluated for every sentence.
pub const BUILTIN_COMMON: &[StaticRule] = &[
    (&["start", "begin", "initiat"], "Start process"),
    (&["save", "store"], "Save data to database"),
    (&["email", "notify", "notification"], "Send notification"),
    (&["approve", "approval"], "Approve request"),
    (&["reject", "decline"], "Reject request"),
    (&["finish", "complete", "close"], "End process"),
];

fn rule_from_static((keywords, label): &StaticRule) -> Rule {
    Rule::new(keywords.iter().copied(), *label)
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

impl RuleSet {
    /// The built-in rule table.
    pub fn builtin() -> Self {
        let domains = BUILTIN_DOMAINS
            .iter()
            .map(|(name, gate, rules)| Domain {
                name: (*name).to_string(),
                gate: gate.iter().map(|k| (*k).to_string()).collect(),
                rules: rules.iter().map(rule_from_static).collect(),
            })
            .collect();
        let common = BUILTIN_COMMON.iter().map(rule_from_static).collect();
        Self { domains, common }
    }

    /// Parse a rule table from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let rules: Self = toml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Parse a rule table from JSON.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let rules: Self = serde_json::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load a rule table from disk.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let rules = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        info!(
            path = %path.display(),
            domains = rules.domains.len(),
            rules = rules.rule_count(),
            "rule table loaded"
        );
        Ok(rules)
    }

    /// Serialize the table as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CoreError::InvalidRules {
            reason: format!("failed to serialize rules as TOML: {e}"),
        })
    }

    /// Check the table for structural problems.
    ///
    /// Empty keywords are rejected because an empty substring matches every
    /// sentence.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for domain in &self.domains {
            let name = domain.name.trim();
            if name.is_empty() {
                return Err(invalid("domain name must not be empty"));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(invalid(format!("duplicate domain `{name}`")));
            }
            if domain.gate.is_empty() {
                return Err(invalid(format!("domain `{name}` has no gate keywords")));
            }
            check_keywords(&domain.gate, &format!("gate of domain `{name}`"))?;
            for rule in &domain.rules {
                check_rule(rule, &format!("domain `{name}`"))?;
            }
        }

        for rule in &self.common {
            check_rule(rule, "common actions")?;
        }

        Ok(())
    }

    /// Merge `other` into this table.
    ///
    /// A domain whose name already exists gets the new gate keywords and
    /// rules appended; new domains and all common rules are appended in
    /// order.
    pub fn extend(&mut self, other: RuleSet) {
        for domain in other.domains {
            match self
                .domains
                .iter_mut()
                .find(|d| same_domain(&d.name, &domain.name))
            {
                Some(existing) => {
                    debug!(domain = %domain.name, rules = domain.rules.len(), "extending domain");
                    for keyword in domain.gate {
                        if !existing.gate.contains(&keyword) {
                            existing.gate.push(keyword);
                        }
                    }
                    existing.rules.extend(domain.rules);
                }
                None => {
                    debug!(domain = %domain.name, rules = domain.rules.len(), "adding domain");
                    self.domains.push(domain);
                }
            }
        }
        self.common.extend(other.common);
    }

    /// Keep only the named domains, preserving table order.
    ///
    /// Common rules are unaffected.  Names are matched case-insensitively.
    pub fn retain_domains<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        for name in names {
            let name = name.as_ref();
            if !self.domains.iter().any(|d| same_domain(&d.name, name)) {
                return Err(CoreError::UnknownDomain {
                    name: name.to_string(),
                });
            }
        }
        self.domains
            .retain(|d| names.iter().any(|n| same_domain(&d.name, n.as_ref())));
        Ok(())
    }

    /// Domain names in evaluation order.
    pub fn domain_names(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.name.as_str()).collect()
    }

    /// Total number of rules, domain and common.
    pub fn rule_count(&self) -> usize {
        self.domains.iter().map(|d| d.rules.len()).sum::<usize>() + self.common.len()
    }
}

/// Domain names compare trimmed and case-insensitively, as in `validate`.
fn same_domain(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn invalid(reason: impl Into<String>) -> CoreError {
    CoreError::InvalidRules {
        reason: reason.into(),
    }
}

fn check_rule(rule: &Rule, context: &str) -> Result<()> {
    if rule.label.trim().is_empty() {
        return Err(invalid(format!("rule in {context} has an empty label")));
    }
    if rule.keywords.is_empty() {
        return Err(invalid(format!(
            "rule `{}` in {context} has no keywords",
            rule.label
        )));
    }
    check_keywords(&rule.keywords, &format!("rule `{}` in {context}", rule.label))
}

fn check_keywords(keywords: &[String], context: &str) -> Result<()> {
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(invalid(format!("{context} contains an empty keyword")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
