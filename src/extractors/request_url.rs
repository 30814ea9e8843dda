//! Absolute URL of the current request, used as the base of every link in a document.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::HOST, request::Parts},
};
use url::Url;

/// Header carrying the client-facing scheme behind a proxy. Default scheme: `http`.
pub const FORWARDED_PROTO_HEADER: &str = "X-Forwarded-Proto";

/// Absolute request URI when the request carries one, otherwise scheme from
/// `X-Forwarded-Proto` plus the `Host` header plus path and query.
#[derive(Clone, Debug)]
pub struct RequestUrl(pub Url);

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Links are only ever built over `http` or `https`.
fn web_scheme(scheme: &str) -> Result<&'static str, AppError> {
    if scheme.eq_ignore_ascii_case("https") {
        Ok("https")
    } else if scheme.eq_ignore_ascii_case("http") {
        Ok("http")
    } else {
        Err(AppError::BadRequest(format!("unsupported request scheme '{}'", scheme)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestUrl
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or("/");
        let raw = match (parts.uri.scheme_str(), parts.uri.authority()) {
            (Some(scheme), Some(authority)) => {
                format!("{}://{}{}", web_scheme(scheme)?, authority, path_and_query)
            }
            _ => {
                let host = header_str(parts, HOST.as_str())
                    .ok_or_else(|| AppError::BadRequest("request has no Host header".into()))?;
                let scheme = header_str(parts, FORWARDED_PROTO_HEADER)
                    .and_then(|s| s.split(',').next())
                    .map(str::trim)
                    .unwrap_or("http");
                format!("{}://{}{}", web_scheme(scheme)?, host, path_and_query)
            }
        };
        Url::parse(&raw)
            .map(RequestUrl)
            .map_err(|e| AppError::BadRequest(format!("request url '{}': {}", raw, e)))
    }
}
