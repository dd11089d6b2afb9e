//! Google Cloud Datastore client over the v1 REST API.
//!
//! Only `projects.runQuery` is used: one structured query per request,
//! ordered by `created` descending, resumed from an opaque cursor.

use std::collections::HashMap;
use std::time::Duration;

use gallery_common::config::Config;
use gallery_common::model::ImageRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::token::TokenSource;
use super::{ImageQuery, ImageStore, MoreResults, StoreError, StorePage};

const API_BASE: &str = "https://datastore.googleapis.com";

/// Thin `runQuery` client.  Holds one connection pool for the lifetime of
/// the server.
#[derive(Debug)]
pub struct DatastoreClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    database_id: String,
    kind: String,
    /// `None` when talking to the emulator.
    tokens: Option<TokenSource>,
}

impl DatastoreClient {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let (base, tokens) = match &config.emulator_host {
            Some(host) => (format!("http://{host}"), None),
            None => (
                API_BASE.to_string(),
                Some(TokenSource::new(
                    http.clone(),
                    config.access_token.clone(),
                    &config.metadata_host,
                )),
            ),
        };

        Ok(DatastoreClient {
            endpoint: format!("{base}/v1/projects/{}:runQuery", config.project_id),
            http,
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
            kind: config.kind.clone(),
            tokens,
        })
    }

    /// Request body for one page of the gallery query.
    fn request_body(&self, query: &ImageQuery) -> RunQueryRequest<'_> {
        let database_id = Some(self.database_id.as_str()).filter(|d| !d.is_empty());
        RunQueryRequest {
            partition_id: PartitionId {
                project_id: &self.project_id,
                database_id,
            },
            database_id,
            query: Query {
                kind: [KindExpression { name: &self.kind }],
                order: [PropertyOrder {
                    property: PropertyReference { name: "created" },
                    direction: "DESCENDING",
                }],
                limit: query.limit,
                start_cursor: query.cursor.clone(),
            },
        }
    }
}

impl ImageStore for DatastoreClient {
    async fn recent_images(&self, query: &ImageQuery) -> Result<StorePage, StoreError> {
        let mut request = self.http.post(&self.endpoint).json(&self.request_body(query));
        if let Some(tokens) = &self.tokens {
            request = request.bearer_auth(tokens.token().await?);
        }

        debug!(
            "runQuery kind={} limit={} cursor={:?}",
            self.kind, query.limit, query.cursor
        );
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        decode_response(&bytes)
    }
}

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest<'a> {
    partition_id: PartitionId<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_id: Option<&'a str>,
    query: Query<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PartitionId<'a> {
    project_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Query<'a> {
    kind: [KindExpression<'a>; 1],
    order: [PropertyOrder<'a>; 1],
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<String>,
}

#[derive(Serialize)]
struct KindExpression<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct PropertyOrder<'a> {
    property: PropertyReference<'a>,
    direction: &'a str,
}

#[derive(Serialize)]
struct PropertyReference<'a> {
    name: &'a str,
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RunQueryResponse {
    #[serde(default)]
    batch: Option<QueryResultBatch>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResultBatch {
    #[serde(default)]
    entity_results: Vec<EntityResult>,
    end_cursor: Option<String>,
    more_results: Option<MoreResults>,
}

#[derive(Deserialize)]
struct EntityResult {
    entity: Entity,
}

#[derive(Deserialize)]
struct Entity {
    #[serde(default)]
    properties: HashMap<String, Value>,
}

/// Decode a `runQuery` response body into a [`StorePage`].
fn decode_response(body: &[u8]) -> Result<StorePage, StoreError> {
    let resp: RunQueryResponse = serde_json::from_slice(body)?;
    let Some(batch) = resp.batch else {
        return Ok(StorePage::default());
    };

    Ok(StorePage {
        records: batch
            .entity_results
            .iter()
            .map(|r| decode_entity(&r.entity.properties))
            .collect(),
        end_cursor: batch.end_cursor,
        more_results: batch.more_results,
    })
}

/// Map entity properties onto an [`ImageRecord`], defaulting anything that
/// is missing or has an unexpected type.
fn decode_entity(props: &HashMap<String, Value>) -> ImageRecord {
    ImageRecord {
        public_url: props.get("public_url").and_then(string_value),
        haiku: props
            .get("haiku")
            .and_then(|v| v.get("arrayValue"))
            .map(|arr| {
                arr.get("values")
                    .and_then(Value::as_array)
                    .map(|values| values.iter().filter_map(string_value).collect::<Vec<_>>())
                    .unwrap_or_default()
            })
            .unwrap_or_default(),
        brightness: props.get("brightness").and_then(number_value).unwrap_or(0.0),
        created: props.get("created").and_then(string_value),
    }
}

/// `stringValue`, or `timestampValue` rendered as its RFC 3339 string.
fn string_value(v: &Value) -> Option<String> {
    v.get("stringValue")
        .or_else(|| v.get("timestampValue"))
        .and_then(Value::as_str)
        .map(String::from)
}

/// `doubleValue`, or `integerValue` (which the REST API encodes as a string).
fn number_value(v: &Value) -> Option<f64> {
    if let Some(d) = v.get("doubleValue") {
        return d.as_f64();
    }
    match v.get("integerValue")? {
        Value::String(s) => s.parse::<i64>().ok().map(|n| n as f64),
        other => other.as_f64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(database: &str) -> DatastoreClient {
        let config = Config {
            project_id: "demo-project".into(),
            database_id: database.into(),
            emulator_host: Some("localhost:8081".into()),
            ..Config::default()
        };
        DatastoreClient::new(&config).unwrap()
    }

    #[test]
    fn test_emulator_endpoint() {
        let c = client("");
        assert_eq!(
            c.endpoint,
            "http://localhost:8081/v1/projects/demo-project:runQuery"
        );
        assert!(c.tokens.is_none());
    }

    #[test]
    fn test_request_body_first_page() {
        let c = client("");
        let body = serde_json::to_value(c.request_body(&ImageQuery {
            limit: 20,
            cursor: None,
        }))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "partitionId": { "projectId": "demo-project" },
                "query": {
                    "kind": [{ "name": "Image" }],
                    "order": [{ "property": { "name": "created" }, "direction": "DESCENDING" }],
                    "limit": 20
                }
            })
        );
    }

    #[test]
    fn test_request_body_with_cursor_and_database() {
        let c = client("photos");
        let body = serde_json::to_value(c.request_body(&ImageQuery {
            limit: 5,
            cursor: Some("CiQS".into()),
        }))
        .unwrap();
        assert_eq!(body["query"]["startCursor"], "CiQS");
        assert_eq!(body["partitionId"]["databaseId"], "photos");
        assert_eq!(body["databaseId"], "photos");
    }

    #[test]
    fn test_decode_response() {
        let body = json!({
            "batch": {
                "entityResultType": "FULL",
                "entityResults": [
                    {
                        "entity": {
                            "key": { "path": [{ "kind": "Image", "id": "1" }] },
                            "properties": {
                                "public_url": { "stringValue": "https://cdn.example/1.jpg" },
                                "haiku": { "arrayValue": { "values": [
                                    { "stringValue": "autumn moonlight" },
                                    { "stringValue": "a worm digs silently" },
                                    { "stringValue": "into the chestnut" }
                                ] } },
                                "brightness": { "doubleValue": 0.61 },
                                "created": { "stringValue": "2024-05-01T10:00:00.000Z" }
                            }
                        },
                        "cursor": "Cg"
                    },
                    {
                        "entity": {
                            "properties": {
                                "haiku": { "stringValue": "not a list" },
                                "brightness": { "integerValue": "3" },
                                "created": { "timestampValue": "2023-01-02T03:04:05Z" }
                            }
                        }
                    }
                ],
                "endCursor": "CiQSHmoO",
                "moreResults": "MORE_RESULTS_AFTER_LIMIT"
            }
        });
        let page = decode_response(body.to_string().as_bytes()).unwrap();

        assert_eq!(page.records.len(), 2);
        let first = &page.records[0];
        assert_eq!(first.public_url.as_deref(), Some("https://cdn.example/1.jpg"));
        assert_eq!(first.haiku.len(), 3);
        assert_eq!(first.brightness, 0.61);

        let second = &page.records[1];
        assert_eq!(second.public_url, None);
        assert!(second.haiku.is_empty());
        assert_eq!(second.brightness, 3.0);
        assert_eq!(second.created.as_deref(), Some("2023-01-02T03:04:05Z"));

        assert_eq!(page.next_cursor().as_deref(), Some("CiQSHmoO"));
    }

    #[test]
    fn test_decode_empty_array_and_exhausted() {
        let body = json!({
            "batch": {
                "entityResults": [
                    { "entity": { "properties": { "haiku": { "arrayValue": {} } } } }
                ],
                "endCursor": "CiQS",
                "moreResults": "NO_MORE_RESULTS"
            }
        });
        let page = decode_response(body.to_string().as_bytes()).unwrap();
        assert!(page.records[0].haiku.is_empty());
        assert_eq!(page.records[0].brightness, 0.0);
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn test_decode_unknown_more_results() {
        let body = json!({
            "batch": {
                "entityResults": [],
                "endCursor": "CiQS",
                "moreResults": "SOMETHING_NEW"
            }
        });
        let page = decode_response(body.to_string().as_bytes()).unwrap();
        assert_eq!(page.more_results, Some(MoreResults::Unknown));
        assert_eq!(page.next_cursor().as_deref(), Some("CiQS"));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_response(b"<html>502</html>"),
            Err(StoreError::Decode(_))
        ));
    }
}
