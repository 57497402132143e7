use crate::core::data::{Topic, sort_topics};
use crate::core::traits::TopicRepository;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory repository with a fixed answer.
///
/// Counts calls so callers can check how many fetches were issued.
pub struct StaticRepository {
    outcome: Result<Vec<Topic>, AppError>,
    calls: AtomicUsize,
}

impl StaticRepository {
    /// Topics are returned in fetch order, then sorted like a real store
    pub fn with_topics(topics: Vec<Topic>) -> Self {
        Self {
            outcome: Ok(topics),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: AppError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TopicRepository for StaticRepository {
    async fn fetch_topics(&self) -> AppResult<Vec<Topic>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut topics = self.outcome.clone()?;
        sort_topics(&mut topics);
        Ok(topics)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
