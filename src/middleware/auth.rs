use axum::{
    extract::{Path, Request, State},
    http::{HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
};

use crate::action::Action;
use crate::app::AppState;
use crate::error::ApiError;
use crate::registry::NO_AUTH_ACTIONS;

/// Request header carrying the shared admin token.
pub const TOKEN_HEADER: &str = "bgmi-token";

/// Token authentication middleware for the dispatch route.
///
/// Runs before body parsing and registry lookup, so unauthenticated callers
/// can never reach a controller, not even for unknown action names. OPTIONS
/// passes through untouched: CORS preflight carries no credentials.
pub async fn token_auth(
    State(state): State<AppState>,
    Path(action): Path<String>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    authorize(
        &state.config.security.admin_token,
        &action,
        headers.get(TOKEN_HEADER),
    )?;

    Ok(next.run(request).await)
}

/// Core auth decision, kept free of framework types beyond the header value
/// so it can be tested in isolation.
pub fn authorize(
    admin_token: &str,
    action: &str,
    header: Option<&HeaderValue>,
) -> Result<(), ApiError> {
    // Allow-listed read-only actions need no credentials. Unknown actions do
    // not qualify; they are still gated on the token.
    if let Ok(action) = action.parse::<Action>() {
        if NO_AUTH_ACTIONS.contains(&action) {
            return Ok(());
        }
    }

    let Some(header) = header else {
        tracing::warn!(action, "rejected request without token");
        return Err(ApiError::unauthorized("admin token required"));
    };
    let token = header
        .to_str()
        .map_err(|_| ApiError::bad_request("malformed token header"))?;

    if admin_token.is_empty() || token != admin_token {
        tracing::warn!(action, "rejected request with invalid token");
        return Err(ApiError::unauthorized("invalid admin token"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "sekrit";

    fn header(value: &[u8]) -> HeaderValue {
        HeaderValue::from_bytes(value).unwrap()
    }

    #[test]
    fn test_no_auth_actions_pass_without_token() {
        assert!(authorize(TOKEN, "search", None).is_ok());
        assert!(authorize(TOKEN, "cal", None).is_ok());
        // Even a wrong token does not block the allow-list
        assert!(authorize(TOKEN, "cal", Some(&header(b"wrong"))).is_ok());
    }

    #[test]
    fn test_write_actions_require_exact_token() {
        assert!(authorize(TOKEN, "add", Some(&header(TOKEN.as_bytes()))).is_ok());

        let err = authorize(TOKEN, "add", None).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err = authorize(TOKEN, "add", Some(&header(b"wrong"))).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_unknown_actions_still_require_token() {
        let err = authorize(TOKEN, "frobnicate", None).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert!(authorize(TOKEN, "frobnicate", Some(&header(TOKEN.as_bytes()))).is_ok());
    }

    #[test]
    fn test_unreadable_header_is_bad_request() {
        let err = authorize(TOKEN, "add", Some(&header(b"\xff\xfe"))).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_empty_configured_token_authorizes_nothing() {
        let err = authorize("", "add", Some(&header(b""))).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
