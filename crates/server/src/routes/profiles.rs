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
use service::{auth::Role, file::profiles::ProfileMeta};

use super::{auth::{require_editor, ServerState}, parse_document};
use crate::errors::ApiError;

#[utoipa::path(
    get, path = "/api/profiles", tag = "profiles",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Metadata of all stored profiles", body = [crate::openapi::ProfileMetaDoc]),
        (status = 401, description = "Unauthorized", body = crate::openapi::MessageDoc),
        (status = 403, description = "Forbidden", body = crate::openapi::MessageDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ProfileMeta>>, ApiError> {
    Ok(Json(state.profiles.list().await?))
}

#[utoipa::path(
    get, path = "/api/profiles/{id}", tag = "profiles",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Full stored profile document"),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    Ok(Json(state.profiles.get(&id).await?))
}

#[utoipa::path(
    put, path = "/api/profiles/{id}", tag = "profiles",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Profile id")),
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
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    require_editor(role)?;
    let Path(id) = path?;
    let document = parse_document(&body?)?;
    state.profiles.upsert(&id, &document).await?;
    Ok(Json(OkResponse::default()))
}

#[utoipa::path(
    delete, path = "/api/profiles/{id}", tag = "profiles",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::OkDoc),
        (status = 403, description = "Editor role required", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(role): Extension<Role>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    require_editor(role)?;
    let Path(id) = path?;
    state.profiles.delete(&id).await?;
    Ok(Json(OkResponse::default()))
}
