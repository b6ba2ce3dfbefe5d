//! Data-driven heuristic rule tables.
//!
//! A rule is a `(pattern, label)` pair. Tables are evaluated against the
//! whole file; each matching rule contributes its label once, no matter how
//! many times the pattern occurs.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Which detector a rule feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    LanguageFeature,
    SecurityInsight,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::LanguageFeature => "language_feature",
            RuleKind::SecurityInsight => "security_insight",
        }
    }
}

/// Uncompiled rule definition, as found in built-in tables and config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub label: String,
}

/// Pre-compiled rule with its label.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    label: String,
}

impl Rule {
    /// Compile a rule, failing on an invalid pattern.
    pub fn new(pattern: &str, label: &str) -> anyhow::Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| anyhow::anyhow!("compiling pattern {:?}: {}", pattern, e))?;
        Ok(Self {
            regex,
            label: label.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// An ordered list of rules evaluated uniformly.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Compile a built-in table. Built-in patterns are constants, so a
    /// failure here is a programming error.
    pub fn from_static(specs: &[(&str, &str)]) -> Self {
        let rules = specs
            .iter()
            .map(|(pattern, label)| {
                Rule::new(pattern, label)
                    .unwrap_or_else(|e| panic!("invalid built-in rule: {}", e))
            })
            .collect();
        Self { rules }
    }

    /// Compile user-supplied rules.
    pub fn from_specs(specs: &[RuleSpec]) -> anyhow::Result<Self> {
        let rules = specs
            .iter()
            .map(|s| Rule::new(&s.pattern, &s.label))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule once against `text`, returning matching labels in
    /// table order without duplicates.
    pub fn evaluate(&self, text: &str) -> Vec<String> {
        let mut labels = Vec::new();
        self.evaluate_into(text, &mut labels);
        labels
    }

    /// Like `evaluate`, appending to `labels` and skipping labels already
    /// present.
    pub fn evaluate_into(&self, text: &str, labels: &mut Vec<String>) {
        for rule in &self.rules {
            if rule.is_match(text) && !labels.iter().any(|l| l == rule.label()) {
                labels.push(rule.label.clone());
            }
        }
    }
}
