/// TasteDive similarity API provider
///
/// API: `GET /api/similar?q=<term>&type=<category>&limit=5&info=1&k=<key>`
///
/// The response shape has drifted between API revisions (`Similar`/`Results`
/// with `Name`/`wTeaser` in older ones, lower-case keys with `description`
/// in newer ones), so items are read from a `serde_json::Value` by looking
/// keys up case-insensitively instead of through a fixed struct.
use crate::{
    error::{AppError, AppResult},
    models::{RecommendationItem, SimilarityQuery},
    services::providers::{SimilarityProvider, RESULT_LIMIT},
};
use reqwest::Client as HttpClient;
use serde_json::{Map, Value};
use std::time::Duration;

const NAME_KEYS: &[&str] = &["name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "wTeaser", "teaser"];
const LINK_KEYS: &[&str] = &["wUrl", "url", "yUrl"];

#[derive(Clone)]
pub struct TasteDiveProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TasteDiveProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }
}

/// Case-insensitive object lookup
fn field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object
        .get(key)
        .or_else(|| {
            object
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
}

/// First non-blank string among `keys`
fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| field(object, key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn normalize_item(value: &Value) -> Option<RecommendationItem> {
    let object = value.as_object()?;
    Some(RecommendationItem {
        name: text_field(object, NAME_KEYS).unwrap_or_default(),
        description: text_field(object, DESCRIPTION_KEYS),
        link: text_field(object, LINK_KEYS),
    })
}

/// Turns a raw API body into a fixed-shape item list
///
/// Missing `similar`/`results` yields an empty list. Non-object entries are
/// skipped. A top-level `error` string is reported as a service failure.
pub fn normalize_response(body: &Value) -> AppResult<Vec<RecommendationItem>> {
    let Some(root) = body.as_object() else {
        return Err(AppError::recommendation_service(
            "Unexpected response format: expected a JSON object",
        ));
    };

    if let Some(message) = field(root, "error").and_then(Value::as_str) {
        return Err(AppError::recommendation_service(message.to_string()));
    }

    let items = field(root, "similar")
        .and_then(Value::as_object)
        .and_then(|similar| field(similar, "results"))
        .and_then(Value::as_array)
        .map(|results| results.iter().filter_map(normalize_item).collect())
        .unwrap_or_default();

    Ok(items)
}

#[async_trait::async_trait]
impl SimilarityProvider for TasteDiveProvider {
    async fn similar(&self, query: &SimilarityQuery) -> AppResult<Vec<RecommendationItem>> {
        let limit = RESULT_LIMIT.to_string();

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("q", query.term.as_str()),
                ("type", query.category.as_str()),
                ("limit", limit.as_str()),
                ("info", "1"),
                ("k", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "TasteDive API request failed");
            return Err(AppError::recommendation_service(format!(
                "TasteDive API returned status {}",
                status
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw TasteDive API response");

        let body: Value = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, "Failed to deserialize TasteDive response");
            AppError::recommendation_service(format!("Failed to parse TasteDive response: {}", e))
        })?;

        let items = normalize_response(&body)?;

        tracing::info!(
            category = %query.category,
            results = items.len(),
            provider = "tastedive",
            "Similarity lookup completed"
        );

        Ok(items)
    }

    fn name(&self) -> &'static str {
        "tastedive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_normalize_current_format() {
        let body = json!({
            "similar": {
                "results": [
                    {
                        "name": "Pearl Jam",
                        "type": "music",
                        "description": "Pearl Jam is an American rock band.",
                        "wUrl": "https://en.wikipedia.org/wiki/Pearl_Jam"
                    },
                    { "name": "Soundgarden", "type": "music" }
                ]
            }
        });

        let items = normalize_response(&body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Pearl Jam");
        assert_eq!(
            items[0].description.as_deref(),
            Some("Pearl Jam is an American rock band.")
        );
        assert_eq!(
            items[0].link.as_deref(),
            Some("https://en.wikipedia.org/wiki/Pearl_Jam")
        );
        assert_eq!(items[1].name, "Soundgarden");
        assert_eq!(items[1].description, None);
        assert_eq!(items[1].link, None);
    }

    #[test]
    fn test_normalize_legacy_capitalized_format() {
        let body = json!({
            "Similar": {
                "Info": [{ "Name": "Nirvana", "Type": "music" }],
                "Results": [
                    {
                        "Name": "Hole",
                        "Type": "music",
                        "wTeaser": "Hole was an American rock band.",
                        "wUrl": "https://en.wikipedia.org/wiki/Hole_(band)"
                    }
                ]
            }
        });

        let items = normalize_response(&body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Hole");
        assert_eq!(
            items[0].description.as_deref(),
            Some("Hole was an American rock band.")
        );
        assert!(items[0].link.is_some());
    }

    #[test]
    fn test_normalize_blank_fields_become_absent() {
        let body = json!({
            "similar": { "results": [{ "description": "  ", "wUrl": "" }] }
        });

        let items = normalize_response(&body).unwrap();
        assert_eq!(items[0].name, "");
        assert_eq!(items[0].description, None);
        assert_eq!(items[0].link, None);
    }

    #[test]
    fn test_normalize_missing_results_is_empty() {
        assert!(normalize_response(&json!({})).unwrap().is_empty());
        assert!(normalize_response(&json!({ "similar": {} }))
            .unwrap()
            .is_empty());
        assert!(normalize_response(&json!({ "similar": { "results": [] } }))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_normalize_skips_non_object_items() {
        let body = json!({ "similar": { "results": ["oops", { "name": "Blur" }] } });
        let items = normalize_response(&body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Blur");
    }

    #[test]
    fn test_normalize_api_error() {
        let err = normalize_response(&json!({ "error": "Invalid API key" })).unwrap_err();
        assert!(matches!(err, AppError::RecommendationService(m) if m == "Invalid API key"));
    }

    #[test]
    fn test_normalize_rejects_non_object() {
        assert!(normalize_response(&json!([1, 2, 3])).is_err());
    }

    /// Serves `router` on an ephemeral local port and returns its base URL
    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api/similar", addr)
    }

    fn provider(url: String, timeout: Duration) -> TasteDiveProvider {
        TasteDiveProvider::new("test_key".to_string(), url, timeout).unwrap()
    }

    #[tokio::test]
    async fn test_similar_sends_expected_parameters() {
        let router = Router::new().route(
            "/api/similar",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "similar": {
                        "results": [{ "name": "echo", "description": serde_json::to_string(&params).unwrap() }]
                    }
                }))
            }),
        );
        let url = spawn_upstream(router).await;
        let provider = provider(url, Duration::from_secs(5));

        let query = SimilarityQuery {
            term: "Nirvana,Radiohead".to_string(),
            category: Category::Music,
        };
        let items = provider.similar(&query).await.unwrap();

        let params: HashMap<String, String> =
            serde_json::from_str(items[0].description.as_deref().unwrap()).unwrap();
        assert_eq!(params["q"], "Nirvana,Radiohead");
        assert_eq!(params["type"], "music");
        assert_eq!(params["limit"], "5");
        assert_eq!(params["info"], "1");
        assert_eq!(params["k"], "test_key");
    }

    #[tokio::test]
    async fn test_similar_non_success_status_is_service_error() {
        let router = Router::new().route(
            "/api/similar",
            get(|| async { (StatusCode::FORBIDDEN, "quota exceeded") }),
        );
        let url = spawn_upstream(router).await;
        let provider = provider(url, Duration::from_secs(5));

        let query = SimilarityQuery {
            term: "Nirvana".to_string(),
            category: Category::Music,
        };
        let err = provider.similar(&query).await.unwrap_err();
        assert!(matches!(&err, AppError::RecommendationService(m) if m.contains("403")));
        assert!(!err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_error_status_hides_upstream_html() {
        let router = Router::new().route(
            "/api/similar",
            get(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    "<html><body><h1>502 Bad Gateway</h1></body></html>",
                )
            }),
        );
        let url = spawn_upstream(router).await;
        let provider = provider(url, Duration::from_secs(5));

        let query = SimilarityQuery {
            term: "Nirvana".to_string(),
            category: Category::Music,
        };
        let err = provider.similar(&query).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Recommendation service error: TasteDive API returned status 502 Bad Gateway"
        );
    }

    #[tokio::test]
    async fn test_similar_invalid_json_is_service_error() {
        let router = Router::new().route("/api/similar", get(|| async { "<html>" }));
        let url = spawn_upstream(router).await;
        let provider = provider(url, Duration::from_secs(5));

        let query = SimilarityQuery {
            term: "Nirvana".to_string(),
            category: Category::Books,
        };
        let err = provider.similar(&query).await.unwrap_err();
        assert!(matches!(err, AppError::RecommendationService(_)));
    }

    #[tokio::test]
    async fn test_similar_times_out() {
        let router = Router::new().route(
            "/api/similar",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let url = spawn_upstream(router).await;
        let provider = provider(url, Duration::from_millis(100));

        let query = SimilarityQuery {
            term: "Nirvana".to_string(),
            category: Category::Movies,
        };
        let err = provider.similar(&query).await.unwrap_err();
        assert!(matches!(err, AppError::RecommendationService(_)));
    }

    #[tokio::test]
    async fn test_similar_unreachable_is_service_error() {
        let provider = TasteDiveProvider::new(
            "SECRET_KEY_123".to_string(),
            "http://127.0.0.1:1/api/similar".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();
        let query = SimilarityQuery {
            term: "Nirvana".to_string(),
            category: Category::Music,
        };

        let err = provider.similar(&query).await.unwrap_err();
        assert!(matches!(err, AppError::RecommendationService(_)));
        assert!(!err.to_string().contains("SECRET_KEY_123"));
    }

    #[tokio::test]
    async fn test_timeout_error_hides_api_key() {
        let router = Router::new().route(
            "/api/similar",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let url = spawn_upstream(router).await;
        let provider = provider(url, Duration::from_millis(100));

        let query = SimilarityQuery {
            term: "Nirvana".to_string(),
            category: Category::Music,
        };
        let err = provider.similar(&query).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert!(!err.to_string().contains("test_key"));
    }
}
