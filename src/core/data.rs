//! Core data structures for grammar topics
//!
//! Topics are read-only once fetched. Rules and formulas have no identity
//! of their own; they are addressed by position inside their parent.

use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A top-level grammar subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Document key; never read from the document body
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub simple_rules: Vec<String>,
}

/// A single grammar statement inside a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formulas: Vec<Formula>,
}

/// A short symbolic pattern with an expandable explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub formula: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Topic {
    pub fn new(id: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order: None,
            theme: theme.into(),
            theme_formula: None,
            group_name: None,
            rules: Vec::new(),
            simple_rules: Vec::new(),
        }
    }

    /// Sort key; an absent or NaN order sorts as zero
    pub fn sort_order(&self) -> f64 {
        match self.order {
            // -0.0 ranks with 0.0 under total_cmp only if folded here
            Some(order) if !order.is_nan() && order != 0.0 => order,
            _ => 0.0,
        }
    }

    /// Decode a document body and attach its key as the id
    pub fn from_document(id: &str, body: serde_json::Value) -> AppResult<Self> {
        let mut topic: Topic = serde_json::from_value(body)
            .map_err(|e| AppError::Decode(format!("topic '{}': {}", id, e)))?;
        topic.id = id.to_string();
        Ok(topic)
    }

    pub fn formula(&self, rule_index: usize, formula_index: usize) -> Option<&Formula> {
        self.rules
            .get(rule_index)
            .and_then(|rule| rule.formulas.get(formula_index))
    }
}

impl Rule {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shape: None,
            formulas: Vec::new(),
        }
    }
}

impl Formula {
    pub fn new(formula: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            title: None,
            examples: Vec::new(),
            note: None,
        }
    }
}

/// Stable ascending sort by `order`.
///
/// Topics sharing an order, including those without one, keep their fetch order.
pub fn sort_topics(topics: &mut [Topic]) {
    topics.sort_by(|a, b| a.sort_order().total_cmp(&b.sort_order()));
}

/// Reject a topic set in which two documents share an id
pub fn ensure_unique_ids(topics: &[Topic]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(topics.len());
    for topic in topics {
        if !seen.insert(topic.id.as_str()) {
            return Err(AppError::Store(format!("duplicate topic id '{}'", topic.id)));
        }
    }
    Ok(())
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(formula) = &self.theme_formula {
            write!(f, "{} [{}]", self.theme, formula)
        } else {
            write!(f, "{}", self.theme)
        }
    }
}
