// The dispatch endpoint: /api/:action with get, post, options.
//
// The auth middleware has already run for GET and POST by the time these
// handlers execute; per-request flow is lookup, invoke, format.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::action::Action;
use crate::app::AppState;
use crate::controllers::ActionArgs;
use crate::error::ApiError;
use crate::registry;
use crate::response::{apply_cors, json_response};

/// GET /api/:action — read-only actions, invoked with no arguments.
pub async fn api_get(State(state): State<AppState>, Path(action): Path<String>) -> Response {
    let handler = action
        .parse::<Action>()
        .ok()
        .and_then(registry::lookup_get);

    let Some(handler) = handler else {
        // Unrecognized GET actions fall through with no body, default status
        tracing::debug!(%action, "GET action not registered, empty response");
        return ().into_response();
    };

    let reply = handler(state.controllers.as_ref()).await;
    json_response(&reply, StatusCode::OK, state.config.is_development())
}

/// POST /api/:action — the request body is a JSON object whose keys become
/// the controller's named arguments.
pub async fn api_post(
    State(state): State<AppState>,
    Path(action): Path<String>,
    body: Bytes,
) -> Response {
    let args = match decode_args(&body) {
        Ok(args) => args,
        Err(e) => return e.into_response(),
    };

    let handler = match action.parse::<Action>() {
        Ok(action) => registry::lookup_post(action),
        Err(_) => None,
    };
    let Some(handler) = handler else {
        return ApiError::not_found(format!("unknown action '{}'", action)).into_response();
    };

    let reply = handler(state.controllers.as_ref(), args).await;
    // Controllers signal upstream failure in-band; surface it as 502
    let status = if reply.is_error() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    json_response(&reply, status, state.config.is_development())
}

/// OPTIONS /api/:action — CORS preflight. No auth, no body, headers always.
pub async fn api_options() -> Response {
    let mut response = StatusCode::OK.into_response();
    apply_cors(response.headers_mut());
    response
}

/// Decode the POST body into named arguments. Any decode failure, including
/// a body that is valid JSON but not an object, answers 502 to the client.
fn decode_args(body: &[u8]) -> Result<ActionArgs, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::bad_gateway("request body must be a JSON object")),
        Err(e) => Err(ApiError::bad_gateway(format!("invalid JSON body: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_args_accepts_object() {
        let args = decode_args(br#"{"name": "x", "episode": 3}"#).unwrap();
        assert_eq!(args.get("name").unwrap(), "x");
    }

    #[test]
    fn test_decode_args_rejects_garbage() {
        let err = decode_args(b"not json at all").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_decode_args_rejects_non_object() {
        let err = decode_args(b"[1, 2, 3]").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
