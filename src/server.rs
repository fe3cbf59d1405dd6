//! HTTP surface: routes, shared state and error mapping

use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::assistant::Assistant;
use crate::config::{Config, CorsOrigins};
use crate::error::{Error, Result};
use crate::features::{self, FeaturesResponse};
use crate::providers::CompletionProvider;
use crate::types::{
    ErrorBody, GrammarCheckRequest, GrammarCheckResponse, ModelsResponse, RootResponse,
    TextInsightRequest, TextInsightResponse,
};

pub const ROOT_MESSAGE: &str = "Grammar Bot API is running";

/// State shared by all handlers; read-only after startup
#[derive(Clone)]
pub struct AppState {
    assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            assistant: Arc::new(Assistant::new(provider)),
        }
    }
}

/// An error as the client sees it
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// Map a service error, prefixing upstream failures with `context`
    fn from_service(err: Error, context: &str) -> Self {
        match err {
            Error::InvalidInput(message) => Self::new(StatusCode::BAD_REQUEST, message),
            Error::EmptyResponse => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, Error::EmptyResponse.to_string())
            }
            other => {
                error!("{}: {}", context, other);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{}: {}", context, other),
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

/// Build the application router with CORS and request tracing
pub fn router(state: AppState, config: &Config) -> Result<Router> {
    Ok(routes(state)
        .layer(cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Bare routes, no middleware
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/features", get(list_features))
        .route("/models", get(list_models))
        .route("/check-grammar", post(check_grammar))
        .route("/text-insights", post(text_insights))
        .with_state(state)
}

pub fn cors_layer(origins: &CorsOrigins) -> Result<CorsLayer> {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => {
            let values = list
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin)
                        .map_err(|_| Error::Config(format!("Invalid CORS origin: {origin}")))
                })
                .collect::<Result<Vec<_>>>()?;
            AllowOrigin::list(values)
        }
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

async fn list_features() -> Json<FeaturesResponse> {
    Json(FeaturesResponse {
        features: features::catalog(),
    })
}

async fn list_models(
    State(state): State<AppState>,
) -> std::result::Result<Json<ModelsResponse>, ApiError> {
    state
        .assistant
        .list_models()
        .await
        .map(Json)
        .map_err(|err| ApiError::from_service(err, "Error listing models"))
}

async fn check_grammar(
    State(state): State<AppState>,
    body: std::result::Result<Json<GrammarCheckRequest>, JsonRejection>,
) -> std::result::Result<Json<GrammarCheckResponse>, ApiError> {
    let Json(request) = body?;

    state
        .assistant
        .check_grammar(&request)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_service(err, "Error processing grammar check request"))
}

async fn text_insights(
    State(state): State<AppState>,
    body: std::result::Result<Json<TextInsightRequest>, JsonRejection>,
) -> std::result::Result<Json<TextInsightResponse>, ApiError> {
    let Json(request) = body?;

    state
        .assistant
        .text_insight(&request)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_service(err, "Error processing text insights request"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_400() {
        let err = ApiError::from_service(Error::invalid_input("Text cannot be empty"), "ctx");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "Text cannot be empty");
    }

    #[test]
    fn test_empty_response_maps_to_500_without_prefix() {
        let err = ApiError::from_service(Error::EmptyResponse, "ctx");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail, "Failed to get response from AI model");
    }

    #[test]
    fn test_upstream_failure_is_prefixed() {
        let err = ApiError::from_service(
            Error::Completion("Gemini API error: 503".to_string()),
            "Error listing models",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.detail,
            "Error listing models: Completion failed: Gemini API error: 503"
        );
    }

    #[test]
    fn test_cors_rejects_bad_origin() {
        let bad = CorsOrigins::List(vec!["bad\norigin".to_string()]);
        assert!(cors_layer(&bad).is_err());
        assert!(cors_layer(&CorsOrigins::Any).is_ok());
    }
}
