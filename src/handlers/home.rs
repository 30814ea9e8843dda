//! `GET /`: the API entry point.

use crate::document::{Document, DocumentBuilder, JSON_API_VERSION};
use crate::domain::ApiEntryPoint;
use crate::error::AppError;
use crate::extractors::RequestUrl;
use crate::response::{ok, JsonApi};
use crate::state::AppState;
use axum::extract::State;
use url::Url;

const COLLECTIONS: [&str; 4] = ["blogs", "articles", "comments", "people"];

pub fn home_document(state: &AppState, url: &Url) -> Result<Document, AppError> {
    let entry_point = ApiEntryPoint {
        message: "Entry point into the Blogging Hypermedia API. Implements the JSON:API 1.0 specification.".into(),
        version: JSON_API_VERSION.into(),
    };
    let mut builder = DocumentBuilder::new(&state.model, url)?;
    builder.set_jsonapi_version(JSON_API_VERSION)?.links()?.add_self_link()?.end_links()?;
    let mut scope = builder.resource(&entry_point)?;
    scope.links()?;
    for collection in COLLECTIONS {
        scope.add_link(collection, [collection])?;
    }
    scope.end_links()?;
    scope.end()?;
    builder.finish()
}

pub async fn home(State(state): State<AppState>, RequestUrl(url): RequestUrl) -> Result<JsonApi<Document>, AppError> {
    home_document(&state, &url).map(ok)
}
