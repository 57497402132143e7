use crate::core::data::{Topic, ensure_unique_ids, sort_topics};
use crate::core::traits::TopicRepository;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Topics read from a local JSON export.
///
/// Accepts either an array of topics carrying their own `id`, or an object
/// keyed by document id the way a collection export is laid out.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TopicRepository for JsonFileRepository {
    async fn fetch_topics(&self) -> AppResult<Vec<Topic>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::Io(format!("{}: {}", self.path.display(), e)))?;

        let mut topics = parse_export(&content)?;
        ensure_unique_ids(&topics)?;
        sort_topics(&mut topics);
        Ok(topics)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

fn parse_export(content: &str) -> AppResult<Vec<Topic>> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| AppError::Decode(format!("Invalid topics file: {}", e)))?;

    match root {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let id = item
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Decode(format!("Topic #{} has no id", index + 1)))?;
                Topic::from_document(&id, item)
            })
            .collect(),
        Value::Object(entries) => entries
            .into_iter()
            .map(|(id, body)| Topic::from_document(&id, body))
            .collect(),
        _ => Err(AppError::Decode(
            "Topics file must hold an array or an object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_array_export_is_sorted() {
        let file = write_file(
            r#"[
                {"id": "t1", "order": 2, "theme": "Present Simple",
                 "rules": [{"text": "Add -s", "formulas": [{"formula": "V+s"}]}]},
                {"id": "t2", "order": 1, "theme": "Past Simple"}
            ]"#,
        );
        let repo = JsonFileRepository::new(file.path());

        let topics = repo.fetch_topics().await.unwrap();
        let ids: Vec<_> = topics.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t1"]);
    }

    #[tokio::test]
    async fn test_object_export_uses_keys() {
        let file = write_file(r#"{"b": {"theme": "B", "order": 5}, "a": {"theme": "A", "order": 1}}"#);
        let topics = JsonFileRepository::new(file.path()).fetch_topics().await.unwrap();

        assert_eq!(topics[0].id, "a");
        assert_eq!(topics[1].id, "b");
    }

    #[tokio::test]
    async fn test_duplicate_ids_fail() {
        let file = write_file(r#"[{"id": "x", "theme": "A"}, {"id": "x", "theme": "B"}]"#);
        let err = JsonFileRepository::new(file.path()).fetch_topics().await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let repo = JsonFileRepository::new("/nonexistent/grammarbook/topics.json");
        assert!(matches!(repo.fetch_topics().await, Err(AppError::Io(_))));
    }

    #[test]
    fn test_parse_rejects_scalars_and_missing_ids() {
        assert!(parse_export("42").is_err());
        assert!(parse_export(r#"[{"theme": "No id"}]"#).is_err());
    }
}
