/// Request extractors whose rejections render as [`ApiError`]
///
/// axum's own `Json` and `Query` answer malformed input with a plain-text
/// body. These wrappers run the same extraction and convert the rejection, so
/// every client error shares the `{error, message, details?}` shape:
///
/// - a body or query string that parses but holds a wrong value (unknown enum
///   variant, wrong type) is `422 validation_error`
/// - anything else (bad syntax, missing content type) is `400 bad_request`
///
/// Responses keep using `axum::Json`.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);
