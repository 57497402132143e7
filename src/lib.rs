//! Grammarbook - a terminal browser for grammar topics
//!
//! Topics (with their rules and formulas) are read from a Firestore
//! collection and shown as a single-expand accordion. The view state and
//! its transitions live in [`view`]; topic sources live in [`store`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod store;
pub mod utils;
pub mod view;

// Re-export core types and traits for easier use
pub use crate::core::{
    data::{Formula, Rule, Topic, sort_topics},
    traits::TopicRepository,
};
pub use view::{FormulaKey, TopicView, ViewState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
