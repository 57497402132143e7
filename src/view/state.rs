//! Accordion view state
//!
//! `Loading -> {Empty | Populated}`. The phase changes exactly once; after
//! that only the expanded topic and the open formula set move, and only
//! through the toggle methods below. Nothing here performs I/O.

use crate::config::FormulaPolicy;
use crate::core::data::Topic;
use crate::utils::error::AppResult;
use crate::view::key::FormulaKey;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    /// Zero topics, or the fetch failed. Terminal.
    Empty,
    Populated(Vec<Topic>),
}

/// Outcome of [`ViewState::settle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Populated(usize),
    Empty,
    /// The view had already left `Loading`
    Ignored,
}

/// Formula keys whose detail block is visible
#[derive(Debug, Clone, PartialEq)]
pub struct OpenFormulas {
    policy: FormulaPolicy,
    keys: BTreeSet<FormulaKey>,
}

impl OpenFormulas {
    pub fn new(policy: FormulaPolicy) -> Self {
        Self {
            policy,
            keys: BTreeSet::new(),
        }
    }

    pub fn policy(&self) -> FormulaPolicy {
        self.policy
    }

    pub fn is_open(&self, key: &FormulaKey) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormulaKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Flip `key`. Under `Single` opening a key closes whichever was open.
    pub fn toggle(&mut self, key: &FormulaKey) {
        if self.keys.remove(key) {
            return;
        }
        if self.policy == FormulaPolicy::Single {
            self.keys.clear();
        }
        self.keys.insert(key.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    phase: Phase,
    expanded_topic: Option<String>,
    open_formulas: OpenFormulas,
    initial_topic: Option<String>,
}

impl ViewState {
    pub fn new(policy: FormulaPolicy) -> Self {
        Self {
            phase: Phase::Loading,
            expanded_topic: None,
            open_formulas: OpenFormulas::new(policy),
            initial_topic: None,
        }
    }

    /// Topic to expand once the fetch settles, if it turns out to exist
    pub fn with_initial_topic(mut self, topic_id: Option<String>) -> Self {
        self.initial_topic = topic_id;
        self
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// Topics in display order; empty unless populated
    pub fn topics(&self) -> &[Topic] {
        match &self.phase {
            Phase::Populated(topics) => topics,
            _ => &[],
        }
    }

    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics().iter().find(|t| t.id == topic_id)
    }

    pub fn expanded_topic(&self) -> Option<&str> {
        self.expanded_topic.as_deref()
    }

    pub fn is_expanded(&self, topic_id: &str) -> bool {
        self.expanded_topic.as_deref() == Some(topic_id)
    }

    pub fn open_formulas(&self) -> &OpenFormulas {
        &self.open_formulas
    }

    pub fn is_formula_open(&self, key: &FormulaKey) -> bool {
        self.open_formulas.is_open(key)
    }

    /// Leave `Loading` with the fetch result. A failure lands in `Empty`,
    /// the same place as an empty collection.
    pub fn settle(&mut self, result: AppResult<Vec<Topic>>) -> Settled {
        if !self.is_loading() {
            return Settled::Ignored;
        }

        match result {
            Ok(topics) if !topics.is_empty() => {
                let count = topics.len();
                self.phase = Phase::Populated(topics);
                if let Some(initial) = self.initial_topic.take()
                    && self.topic(&initial).is_some()
                {
                    self.expanded_topic = Some(initial);
                }
                Settled::Populated(count)
            }
            _ => {
                self.phase = Phase::Empty;
                Settled::Empty
            }
        }
    }

    /// Header click. Returns false when the id is unknown.
    pub fn toggle_topic(&mut self, topic_id: &str) -> bool {
        if self.topic(topic_id).is_none() {
            return false;
        }

        if self.is_expanded(topic_id) {
            self.expanded_topic = None;
        } else {
            self.expanded_topic = Some(topic_id.to_string());
        }
        true
    }

    /// Formula row click. Returns false when the key points at no formula.
    pub fn toggle_formula(&mut self, key: &FormulaKey) -> bool {
        let exists = self
            .topic(&key.topic_id)
            .and_then(|t| t.formula(key.rule_index, key.formula_index))
            .is_some();
        if !exists {
            return false;
        }

        self.open_formulas.toggle(key);
        true
    }
}
