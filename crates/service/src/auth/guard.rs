use super::{domain::Role, errors::AuthError, token_store::TokenStore};

/// Extract the token from `Bearer <token>`.
///
/// The scheme is matched case-insensitively and everything after the first
/// space is taken as the token, unchanged.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    match header.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::InvalidHeader),
    }
}

/// Resolve the caller's role from the raw `Authorization` header value.
pub fn resolve_role(tokens: &TokenStore, authorization: Option<&str>) -> Result<Role, AuthError> {
    let header = authorization.ok_or(AuthError::MissingHeader)?;
    let token = parse_bearer(header)?;
    tokens.role_for(token).cloned().ok_or(AuthError::UnknownToken)
}

/// Pass the role through only if it is exactly `editor`.
pub fn require_editor(role: Role) -> Result<Role, AuthError> {
    if role.is_editor() {
        Ok(role)
    } else {
        Err(AuthError::EditorRequired)
    }
}
