use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use common::types::OkResponse;
use serde_json::Value;
use service::{auth::Role, file::scenarios::ScenarioMeta};

use super::{auth::{require_editor, ServerState}, parse_document};
use crate::errors::ApiError;

#[utoipa::path(
    get, path = "/api/scenarios", tag = "scenarios",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Metadata of all stored scenarios", body = [crate::openapi::ScenarioMetaDoc]),
        (status = 401, description = "Unauthorized", body = crate::openapi::MessageDoc),
        (status = 403, description = "Forbidden", body = crate::openapi::MessageDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ScenarioMeta>>, ApiError> {
    Ok(Json(state.scenarios.list().await?))
}

#[utoipa::path(
    get, path = "/api/scenarios/{id}/{version}", tag = "scenarios",
    security(("bearer" = [])),
    params(
        ("id" = String, Path, description = "Scenario id"),
        ("version" = String, Path, description = "Scenario version")
    ),
    responses(
        (status = 200, description = "Full stored scenario document"),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc),
        (status = 500, description = "Stored document unreadable", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path((id, version)) = path?;
    Ok(Json(state.scenarios.get(&id, &version).await?))
}

#[utoipa::path(
    put, path = "/api/scenarios/{id}/{version}", tag = "scenarios",
    security(("bearer" = [])),
    params(
        ("id" = String, Path, description = "Scenario id"),
        ("version" = String, Path, description = "Scenario version")
    ),
    request_body(content = Object, description = "Arbitrary JSON document, stored verbatim"),
    responses(
        (status = 200, description = "Saved", body = crate::openapi::OkDoc),
        (status = 400, description = "Body is not JSON or identifier invalid", body = crate::openapi::MessageDoc),
        (status = 403, description = "Editor role required", body = crate::openapi::MessageDoc)
    )
)]
pub async fn upsert(
    State(state): State<ServerState>,
    Extension(role): Extension<Role>,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    require_editor(role)?;
    let Path((id, version)) = path?;
    let document = parse_document(&body?)?;
    state.scenarios.upsert(&id, &version, &document).await?;
    Ok(Json(OkResponse::default()))
}

#[utoipa::path(
    delete, path = "/api/scenarios/{id}/{version}", tag = "scenarios",
    security(("bearer" = [])),
    params(
        ("id" = String, Path, description = "Scenario id"),
        ("version" = String, Path, description = "Scenario version")
    ),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::OkDoc),
        (status = 403, description = "Editor role required", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(role): Extension<Role>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    require_editor(role)?;
    let Path((id, version)) = path?;
    state.scenarios.delete(&id, &version).await?;
    Ok(Json(OkResponse::default()))
}
