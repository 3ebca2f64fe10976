mod search;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use placefinder_search::{PlaceSearch, QueryRewriter};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<PlaceSearch>,
    pub rewriter: Option<Arc<QueryRewriter>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Machine-readable context for codes that carry any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    rewriter: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "validation_error" | "page_out_of_range" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn search_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/search", post(search::search))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(search_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            rewriter: if state.rewriter.is_some() {
                "enabled"
            } else {
                "disabled"
            },
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::search::map_search_error;
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use placefinder_search::{FetchLimits, PlacesClient, SearchConfig, SearchError};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer, rewriter: bool) -> Router {
        let client = PlacesClient::with_base_url("test-key", &server.uri(), 5, 0, 0)
            .expect("places client");
        let config = SearchConfig {
            limits: FetchLimits {
                page_token_delay: Duration::ZERO,
                ..FetchLimits::default()
            },
            ..SearchConfig::default()
        };
        let rewriter = rewriter.then(|| {
            Arc::new(
                QueryRewriter::with_base_url("sk-test", "gpt-4o-mini", &server.uri(), 5)
                    .expect("rewriter"),
            )
        });
        build_app(
            AppState {
                search: Arc::new(PlaceSearch::new(client, config)),
                rewriter,
            },
            default_rate_limit_state(),
        )
    }

    async fn mount_places(server: &MockServer, count: usize) {
        let results: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "place_id": format!("p{i}"),
                    "name": format!("Place {i}"),
                    "formatted_address": format!("{i} Main St"),
                    "rating": 4.5,
                    "geometry": { "location": { "lat": 40.0, "lng": -73.0 } }
                })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path("/place/textsearch/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "OK", "results": results })),
            )
            .mount(server)
            .await;
    }

    fn post_search(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("validation_error", StatusCode::BAD_REQUEST),
            ("page_out_of_range", StatusCode::BAD_REQUEST),
            ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
            ("upstream_timeout", StatusCode::GATEWAY_TIMEOUT),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, expected) in cases {
            let response = ApiError::new("req-1", code, "msg").into_response();
            assert_eq!(response.status(), expected, "code {code}");
        }
    }

    #[test]
    fn search_errors_map_to_api_codes() {
        let timeout = map_search_error("r".into(), &SearchError::Timeout { secs: 30 });
        assert_eq!(timeout.error.code, "upstream_timeout");

        let out_of_range = map_search_error(
            "r".into(),
            &SearchError::PageOutOfRange {
                page: 4,
                total_pages: 2,
            },
        );
        assert_eq!(out_of_range.error.code, "page_out_of_range");
        assert_eq!(
            out_of_range.error.details,
            Some(json!({ "page": 4, "total_pages": 2 }))
        );
        assert!(timeout.error.details.is_none());

        let other = map_search_error("r".into(), &SearchError::Rewrite("boom".into()));
        assert_eq!(other.error.code, "internal_error");
        assert_eq!(other.error.message, "search failed");
    }

    #[tokio::test]
    async fn health_reports_rewriter_state() {
        let server = MockServer::start().await;
        let request = Request::builder()
            .uri("/api/v1/health")
            .header("x-request-id", "health-1")
            .body(Body::empty())
            .expect("request");

        let (status, json) = send(app_for(&server, false), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["rewriter"], "disabled");
        assert_eq!(json["meta"]["request_id"], "health-1");
    }

    #[tokio::test]
    async fn search_returns_enveloped_page() {
        let server = MockServer::start().await;
        mount_places(&server, 7).await;

        let (status, json) = send(
            app_for(&server, false),
            post_search(r#"{"query":"pizza","top_n":5,"page":2}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "OK");
        assert_eq!(json["data"]["results"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["data"]["pagination"]["total_pages"], 2);
        assert_eq!(json["data"]["pagination"]["has_prev_page"], true);
        assert!(json["meta"]["request_id"].is_string());
        assert!(json["data"].get("processed_query").is_none());
    }

    #[tokio::test]
    async fn search_defaults_top_n_and_page() {
        let server = MockServer::start().await;
        mount_places(&server, 8).await;

        let (status, json) =
            send(app_for(&server, false), post_search(r#"{"query":"pizza"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["pagination"]["results_per_page"], 5);
        assert_eq!(json["data"]["pagination"]["current_page"], 1);
        assert_eq!(json["data"]["results"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn search_reports_rewritten_query() {
        let server = MockServer::start().await;
        mount_places(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "pizza restaurant Manhattan" } }]
            })))
            .mount(&server)
            .await;

        let (status, json) = send(
            app_for(&server, true),
            post_search(r#"{"query":"good pizza place in Manhattan?"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["original_query"], "good pizza place in Manhattan?");
        assert_eq!(json["data"]["processed_query"], "pizza restaurant Manhattan");
    }

    #[tokio::test]
    async fn blank_query_is_a_validation_error() {
        let server = MockServer::start().await;

        let (status, json) =
            send(app_for(&server, false), post_search(r#"{"query":"   "}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
        assert!(json["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let server = MockServer::start().await;

        let (status, json) =
            send(app_for(&server, false), post_search(r#"{"top_n":3}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn page_past_the_end_is_rejected() {
        let server = MockServer::start().await;
        mount_places(&server, 7).await;

        let (status, json) = send(
            app_for(&server, false),
            post_search(r#"{"query":"pizza","top_n":5,"page":3}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "page_out_of_range");
        assert_eq!(json["error"]["details"]["page"], 3);
        assert_eq!(json["error"]["details"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn upstream_outage_is_zero_results_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (status, json) =
            send(app_for(&server, false), post_search(r#"{"query":"pizza"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ZERO_RESULTS");
        assert_eq!(json["data"]["pagination"]["total_pages"], 0);
    }
}
