pub mod auth;
pub mod profiles;
pub mod scenarios;

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::{header, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use common::types::OkResponse;
use serde_json::Value;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/api/ping", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::OkDoc)))]
pub async fn ping() -> Json<OkResponse> {
    Json(OkResponse::default())
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Not found: {}", uri.path()))
}

/// Known path, unsupported method: keep axum's status and `Allow` header, add the JSON body.
async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut out = ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    if let Some(allow) = allow {
        out.headers_mut().insert(header::ALLOW, allow);
    }
    out
}

/// Upsert bodies are opaque JSON; anything that does not parse is a 400.
pub(crate) fn parse_document(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Request body must be valid JSON: {e}")))
}

/// Build the full application router: public ping and docs, token-guarded API.
pub fn build_router(state: ServerState, cors: CorsLayer, max_body_bytes: usize) -> Router {
    // Public routes (health + docs)
    let public = Router::new()
        .route("/api/ping", get(ping))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Every route below resolves the caller's role first
    let api = Router::new()
        .route("/api/me", get(auth::me))
        .route("/api/scenarios", get(scenarios::list))
        .route(
            "/api/scenarios/:id/:version",
            get(scenarios::get).put(scenarios::upsert).delete(scenarios::delete),
        )
        .route("/api/profiles", get(profiles::list))
        .route(
            "/api/profiles/:id",
            get(profiles::get).put(profiles::upsert).delete(profiles::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    public
        .merge(api)
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::map_response(method_not_allowed))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx 以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
