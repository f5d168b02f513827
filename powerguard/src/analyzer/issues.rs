//! Validation issue types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue severity. Declared most severe first so sorting ranks errors on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    Electrical,
    WireSizing,
    Layout,
    Terminal,
    AiQuality,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Electrical => "electrical",
            IssueCategory::WireSizing => "wire-sizing",
            IssueCategory::Layout => "layout",
            IssueCategory::Terminal => "terminal",
            IssueCategory::AiQuality => "ai-quality",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding from a validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Stable identifier, `<rule_id>:<subject>`.
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub category: IssueCategory,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wire_ids: Vec<String>,
}

impl Issue {
    pub fn new(
        rule_id: &str,
        subject: &str,
        severity: Severity,
        category: IssueCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{}:{}", rule_id, subject),
            rule_id: rule_id.to_string(),
            severity,
            category,
            message: message.into(),
            suggestion: None,
            component_ids: Vec::new(),
            wire_ids: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_components<S: AsRef<str>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.component_ids.extend(ids.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn with_wire(mut self, id: &str) -> Self {
        self.wire_ids.push(id.to_string());
        self
    }
}

/// Rank by severity, then category, then id.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then(a.category.cmp(&b.category))
            .then_with(|| a.id.cmp(&b.id))
    });
}
