//! Core domain layer
//!
//! This module contains the topic data model and the repository trait
//! that every topic source implements.

pub mod data;
pub mod traits;
