use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde::Serialize;
use service::{
    auth::{self, AuthError, Role, TokenStore},
    file::{profiles::ProfileStore, scenarios::ScenarioStore},
};
use tracing::debug;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub tokens: Arc<TokenStore>,
    pub scenarios: Arc<ScenarioStore>,
    pub profiles: Arc<ProfileStore>,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub role: Role,
}

/// Middleware: resolve `Authorization: Bearer <token>` to a [`Role`] and stash
/// it in request extensions; 401 on a missing/malformed header, 403 on an
/// unknown token.
pub async fn require_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::InvalidHeader))
        .transpose()?;
    let role = auth::resolve_role(&state.tokens, header).map_err(|e| {
        debug!(path = %req.uri().path(), reason = %e, "request rejected");
        e
    })?;
    req.extensions_mut().insert(role);
    Ok(next.run(req).await)
}

/// Write/delete handlers call this before touching storage.
pub fn require_editor(role: Role) -> Result<Role, ApiError> {
    Ok(auth::require_editor(role)?)
}

#[utoipa::path(get, path = "/api/me", tag = "auth", security(("bearer" = [])), responses((status = 200, description = "Caller's role", body = crate::openapi::MeDoc), (status = 401, description = "Unauthorized", body = crate::openapi::MessageDoc), (status = 403, description = "Forbidden", body = crate::openapi::MessageDoc)))]
pub async fn me(Extension(role): Extension<Role>) -> Json<MeOutput> {
    Json(MeOutput { role })
}
