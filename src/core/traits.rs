//! Core trait definitions for topic access
//!
//! The view never talks to a concrete store; it receives a repository
//! through its constructor so tests can substitute a fake.

use crate::core::data::Topic;
use crate::utils::error::AppResult;
use async_trait::async_trait;

/// Read-only access to the topic collection
///
/// Implementations return every topic in the collection, merged with its
/// document id and sorted with [`crate::core::data::sort_topics`].
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Fetch all topics
    async fn fetch_topics(&self) -> AppResult<Vec<Topic>>;

    /// Short label used in log lines
    fn describe(&self) -> String;
}

#[async_trait]
impl<R: TopicRepository + ?Sized> TopicRepository for Box<R> {
    async fn fetch_topics(&self) -> AppResult<Vec<Topic>> {
        (**self).fetch_topics().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
