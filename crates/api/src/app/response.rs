use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::app::errors::ApiError;

/// Current time as an RFC 3339 UTC string.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// JSON response; object bodies get a `timestamp` field merged in.
pub fn json_response(status: StatusCode, mut body: Value) -> Response {
    if let Value::Object(map) = &mut body {
        map.insert("timestamp".to_string(), Value::String(timestamp()));
    }
    (status, Json(body)).into_response()
}

pub fn json_ok<T: Serialize>(status: StatusCode, body: &T) -> Result<Response, ApiError> {
    let value = serde_json::to_value(body).map_err(ApiError::unexpected)?;
    Ok(json_response(status, value))
}
