//! JSON:API response helpers: `application/vnd.api+json` bodies and 201 Created with `Location`.

use crate::document::JSON_API_MEDIA_TYPE;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Serializes `T` as a JSON:API body.
#[derive(Clone, Debug)]
pub struct JsonApi<T>(pub T);

impl<T: Serialize> IntoResponse for JsonApi<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_API_MEDIA_TYPE))],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize document");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
                    e.to_string(),
                )
                    .into_response()
            }
        }
    }
}

pub fn ok<T: Serialize>(document: T) -> JsonApi<T> {
    JsonApi(document)
}

/// 201 with the new resource's self link as `Location`, when there is one.
pub fn created<T: Serialize>(document: T, location: Option<&str>) -> Response {
    let mut response = (StatusCode::CREATED, JsonApi(document)).into_response();
    if let Some(value) = location.and_then(|l| HeaderValue::from_str(l).ok()) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}
