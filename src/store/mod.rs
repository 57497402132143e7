//! Topic sources
//!
//! Every source implements [`TopicRepository`]. Firestore is the default;
//! a JSON export on disk can stand in for it.

pub mod file;
pub mod firestore;
pub mod memory;

use crate::config::Config;
use crate::core::traits::TopicRepository;
use crate::utils::error::AppResult;
use std::path::Path;

pub use file::JsonFileRepository;
pub use firestore::FirestoreClient;
pub use memory::StaticRepository;

/// Pick the repository for this run
pub fn open_repository(config: &Config, file: Option<&Path>) -> AppResult<Box<dyn TopicRepository>> {
    let repo: Box<dyn TopicRepository> = match file {
        Some(path) => Box::new(JsonFileRepository::new(path)),
        None => Box::new(FirestoreClient::new(config.firestore.clone())?),
    };
    tracing::debug!(source = %repo.describe(), "opened topic repository");
    Ok(repo)
}
