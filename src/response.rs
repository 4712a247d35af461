// Response formatting: JSON bodies plus the CORS headers the separate
// front-end needs during local development.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// Front-end dev server origin; fixed by the client contract.
pub const ALLOW_ORIGIN: &str = "http://localhost:8080";
pub const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
pub const ALLOW_HEADERS: &str =
    "Content-Type, Access-Control-Allow-Headers, Authorization, X-Requested-With";

/// Add the three permissive CORS headers for the local front-end.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// Serialize `value` to JSON text. serde_json leaves non-ASCII characters
/// unescaped, so UTF-8 titles reach the client byte-for-byte.
pub fn jsonify<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Build a JSON response with the given status; adds the CORS headers when
/// the process runs in development mode.
pub fn json_response<T: Serialize>(value: &T, status: StatusCode, dev: bool) -> Response {
    let body = match jsonify(value) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("failed to serialize response body: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response = (status, body).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    if dev {
        apply_cors(response.headers_mut());
    }
    response
}
