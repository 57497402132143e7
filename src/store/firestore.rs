use crate::config::FirestoreConfig;
use crate::core::data::{Topic, sort_topics};
use crate::core::traits::TopicRepository;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::future::Future;
use std::time::Duration;

/// One page of a Firestore `documents.list` response.
///
/// An empty collection comes back as `{}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}`
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

pub struct FirestoreClient {
    client: Client,
    config: FirestoreConfig,
    api_key: Option<String>,
}

impl FirestoreClient {
    pub fn new(config: FirestoreConfig) -> AppResult<Self> {
        let api_key = config.resolved_api_key();

        Ok(Self {
            client: Client::builder()
                .user_agent(concat!("grammarbook/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?,
            config,
            api_key,
        })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.project_id,
            self.config.database,
            self.config.collection
        )
    }

    async fn list_page(&self, page_token: Option<String>) -> AppResult<ListDocumentsResponse> {
        let url = self.collection_url();

        let mut query: Vec<(&str, String)> = vec![("pageSize", self.config.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }

        tracing::debug!(%url, "listing documents");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Failed to reach Firestore: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "Failed to list '{}': {} - {}",
                self.config.collection, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Decode(format!("Failed to parse Firestore response: {}", e)))
    }
}

#[async_trait]
impl TopicRepository for FirestoreClient {
    async fn fetch_topics(&self) -> AppResult<Vec<Topic>> {
        collect_topics(|token| self.list_page(token)).await
    }

    fn describe(&self) -> String {
        format!(
            "firestore:{}/{}",
            self.config.project_id, self.config.collection
        )
    }
}

/// Walk every page, decode each document and sort the result.
pub(crate) async fn collect_topics<F, Fut>(mut next_page: F) -> AppResult<Vec<Topic>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = AppResult<ListDocumentsResponse>>,
{
    let mut topics = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = next_page(token.clone()).await?;
        tracing::debug!(documents = page.documents.len(), "received page");

        for document in page.documents {
            topics.push(decode_document(document)?);
        }

        match page.next_page_token.filter(|t| !t.is_empty()) {
            Some(next) if token.as_deref() == Some(next.as_str()) => {
                return Err(AppError::Store(format!(
                    "Firestore returned the same page token twice: {}",
                    next
                )));
            }
            Some(next) => token = Some(next),
            None => break,
        }
    }

    sort_topics(&mut topics);
    Ok(topics)
}

fn decode_document(mut document: Document) -> AppResult<Topic> {
    let id = document_id(&document.name)?.to_string();

    // Plain JSON has no NaN or infinity, so `order` skips the Value detour
    let order = match document.fields.remove("order") {
        Some(value) => decode_order(&value)
            .map_err(|e| AppError::Decode(format!("topic '{}': {}", id, e)))?,
        None => None,
    };

    let body = decode_fields(&document.fields)?;
    let mut topic = Topic::from_document(&id, body)?;
    topic.order = order;
    Ok(topic)
}

/// Numeric `order` field, keeping non-finite doubles
pub(crate) fn decode_order(value: &Value) -> Result<Option<f64>, String> {
    let (kind, inner) = value
        .as_object()
        .and_then(|obj| obj.iter().next())
        .ok_or_else(|| format!("expected a typed order, got {}", value))?;

    match (kind.as_str(), inner) {
        ("nullValue", _) => Ok(None),
        ("integerValue" | "doubleValue", Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("order out of range: {}", n)),
        ("integerValue", Value::String(s)) => s
            .parse::<i64>()
            .map(|n| Some(n as f64))
            .map_err(|e| format!("bad integer order '{}': {}", s, e)),
        ("doubleValue", Value::String(s)) => match s.as_str() {
            "NaN" => Ok(Some(f64::NAN)),
            "Infinity" => Ok(Some(f64::INFINITY)),
            "-Infinity" => Ok(Some(f64::NEG_INFINITY)),
            other => other
                .parse::<f64>()
                .map(Some)
                .map_err(|e| format!("bad double order '{}': {}", other, e)),
        },
        (other, _) => Err(format!("order must be a number, got {}", other)),
    }
}

/// Last path segment of a document resource name
pub(crate) fn document_id(name: &str) -> AppResult<&str> {
    name.rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Decode(format!("Document name has no id: '{}'", name)))
}

fn decode_fields(fields: &Map<String, Value>) -> AppResult<Value> {
    let mut out = Map::with_capacity(fields.len());
    for (key, value) in fields {
        out.insert(key.clone(), decode_value(value)?);
    }
    Ok(Value::Object(out))
}

/// Convert Firestore's typed value encoding into plain JSON.
pub(crate) fn decode_value(value: &Value) -> AppResult<Value> {
    let (kind, inner) = value
        .as_object()
        .and_then(|obj| obj.iter().next())
        .ok_or_else(|| AppError::Decode(format!("Expected a typed value, got {}", value)))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "stringValue" | "timestampValue" | "referenceValue" | "bytesValue"
        | "geoPointValue" => Ok(inner.clone()),
        // int64 travels as a decimal string
        "integerValue" => match inner {
            Value::Number(n) => Ok(Value::Number(n.clone())),
            Value::String(s) => s
                .parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .map_err(|e| AppError::Decode(format!("Bad integerValue '{}': {}", s, e))),
            other => Err(AppError::Decode(format!("Bad integerValue {}", other))),
        },
        "doubleValue" => match inner {
            Value::Number(n) => Ok(Value::Number(n.clone())),
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| AppError::Decode(format!("Unsupported doubleValue '{}'", s))),
            other => Err(AppError::Decode(format!("Bad doubleValue {}", other))),
        },
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect::<AppResult<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => match inner.get("fields").and_then(Value::as_object) {
            Some(fields) => decode_fields(fields),
            None => Ok(Value::Object(Map::new())),
        },
        other => Err(AppError::Decode(format!("Unknown Firestore value type '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;

    fn page(body: Value) -> ListDocumentsResponse {
        serde_json::from_value(body).unwrap()
    }

    fn topic_doc(id: &str, order: i64, theme: &str) -> Value {
        json!({
            "name": format!("projects/p/databases/(default)/documents/topics/{}", id),
            "fields": {
                "order": { "integerValue": order.to_string() },
                "theme": { "stringValue": theme }
            }
        })
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode_value(&json!({ "stringValue": "V+s" })).unwrap(), json!("V+s"));
        assert_eq!(decode_value(&json!({ "integerValue": "42" })).unwrap(), json!(42));
        assert_eq!(decode_value(&json!({ "doubleValue": 1.5 })).unwrap(), json!(1.5));
        assert_eq!(decode_value(&json!({ "booleanValue": true })).unwrap(), json!(true));
        assert_eq!(decode_value(&json!({ "nullValue": null })).unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_rejects_unknown_and_malformed() {
        assert!(decode_value(&json!({ "vectorValue": {} })).is_err());
        assert!(decode_value(&json!({ "integerValue": "forty" })).is_err());
        assert!(decode_value(&json!({ "doubleValue": "NaN" })).is_err());
        assert!(decode_value(&json!("bare")).is_err());
    }

    #[test]
    fn test_decode_nested_rules() {
        let fields = json!({
            "theme": { "stringValue": "Present Simple" },
            "rules": { "arrayValue": { "values": [
                { "mapValue": { "fields": {
                    "text": { "stringValue": "Add -s" },
                    "formulas": { "arrayValue": { "values": [
                        { "mapValue": { "fields": {
                            "formula": { "stringValue": "V+s" },
                            "examples": { "arrayValue": {} }
                        } } }
                    ] } }
                } } }
            ] } },
            "simpleRules": { "arrayValue": {} }
        });

        let decoded = decode_fields(fields.as_object().unwrap()).unwrap();
        let topic = Topic::from_document("t1", decoded).unwrap();

        assert_eq!(topic.rules.len(), 1);
        assert_eq!(topic.rules[0].text, "Add -s");
        assert_eq!(topic.rules[0].formulas[0].formula, "V+s");
        assert!(topic.rules[0].formulas[0].examples.is_empty());
        assert!(topic.simple_rules.is_empty());
    }

    #[tokio::test]
    async fn test_non_finite_order_keeps_every_topic() {
        let doc = |id: &str, order: Value| {
            json!({
                "name": format!("projects/p/databases/(default)/documents/topics/{}", id),
                "fields": { "order": order, "theme": { "stringValue": id } }
            })
        };
        let body = json!({ "documents": [
            doc("one", json!({ "integerValue": "1" })),
            doc("nan", json!({ "doubleValue": "NaN" })),
            doc("inf", json!({ "doubleValue": "Infinity" })),
            doc("neg_inf", json!({ "doubleValue": "-Infinity" })),
            doc("half", json!({ "doubleValue": 0.5 })),
        ] });

        let topics = collect_topics(|_| {
            let next = page(body.clone());
            async move { Ok::<_, AppError>(next) }
        })
        .await
        .unwrap();

        let ids: Vec<_> = topics.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["neg_inf", "nan", "half", "one", "inf"]);
        assert!(topics[1].order.is_some_and(f64::is_nan));
        assert_eq!(topics[4].order, Some(f64::INFINITY));
    }

    #[test]
    fn test_decode_order_rejects_non_numbers() {
        assert_eq!(decode_order(&json!({ "nullValue": null })), Ok(None));
        assert!(decode_order(&json!({ "stringValue": "1" })).is_err());
        assert!(decode_order(&json!({ "doubleValue": "soon" })).is_err());
    }

    #[test]
    fn test_empty_map_value_has_no_fields() {
        assert_eq!(decode_value(&json!({ "mapValue": {} })).unwrap(), json!({}));
    }

    #[test]
    fn test_document_id_is_last_segment() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/topics/abc").unwrap(),
            "abc"
        );
        assert!(document_id("projects/p/documents/topics/").is_err());
    }

    #[tokio::test]
    async fn test_collect_topics_follows_pages_and_sorts() {
        let mut pages = VecDeque::from(vec![
            page(json!({
                "documents": [topic_doc("t1", 2, "Present Simple")],
                "nextPageToken": "p2"
            })),
            page(json!({ "documents": [topic_doc("t2", 1, "Past Simple")] })),
        ]);
        let mut seen_tokens = Vec::new();

        let topics = collect_topics(|token| {
            seen_tokens.push(token);
            let next = pages.pop_front().unwrap_or_default();
            async move { Ok::<_, AppError>(next) }
        })
        .await
        .unwrap();

        let ids: Vec<_> = topics.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t1"]);
        assert_eq!(seen_tokens, vec![None, Some("p2".to_string())]);
    }

    #[tokio::test]
    async fn test_collect_topics_empty_collection() {
        let topics = collect_topics(|_| async { Ok::<_, AppError>(page(json!({}))) }).await.unwrap();
        assert!(topics.is_empty());
    }

    #[tokio::test]
    async fn test_collect_topics_stops_on_repeated_token() {
        let result = collect_topics(|_| async {
            Ok::<_, AppError>(page(json!({ "documents": [], "nextPageToken": "same" })))
        })
        .await;
        assert!(matches!(result, Err(AppError::Store(_))));
    }

    #[tokio::test]
    async fn test_collect_topics_fails_on_malformed_document() {
        let result = collect_topics(|_| async {
            Ok::<_, AppError>(page(json!({ "documents": [{
                "name": "projects/p/databases/(default)/documents/topics/bad",
                "fields": { "order": { "integerValue": "1" } }
            }] })))
        })
        .await;
        assert!(matches!(result, Err(AppError::Decode(msg)) if msg.contains("bad")));
    }

    #[test]
    fn test_collection_url() {
        let client = FirestoreClient::new(crate::config::Config::default().firestore).unwrap();
        assert_eq!(
            client.collection_url(),
            "https://firestore.googleapis.com/v1/projects/english-71f5a/databases/(default)/documents/topics"
        );
        assert_eq!(client.describe(), "firestore:english-71f5a/topics");
    }
}
