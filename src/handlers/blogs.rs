//! `/blogs` handlers.

use crate::document::Document;
use crate::error::AppError;
use crate::extractors::RequestUrl;
use crate::handlers::articles::ARTICLE_RELATIONSHIPS;
use crate::handlers::document::{optional_resource, parse_id, resource_collection, start_document};
use crate::response::{ok, JsonApi};
use crate::state::AppState;
use axum::extract::{Path, State};

pub(crate) const BLOG_RELATIONSHIPS: &[&str] = &["articles"];

pub async fn list(State(state): State<AppState>, RequestUrl(url): RequestUrl) -> Result<JsonApi<Document>, AppError> {
    let blogs = state.repository.read()?.blogs.clone();
    resource_collection(start_document(&state.model, &url)?, &blogs, BLOG_RELATIONSHIPS).map(ok)
}

pub async fn get(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let blog = state.repository.get_blog(parse_id("blogs", &id)?)?;
    optional_resource(start_document(&state.model, &url)?, Some(&blog), BLOG_RELATIONSHIPS).map(ok)
}

pub async fn articles(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let blog = state.repository.get_blog(parse_id("blogs", &id)?)?;
    let articles = state.repository.read()?.blog_articles(&blog);
    resource_collection(start_document(&state.model, &url)?, &articles, ARTICLE_RELATIONSHIPS).map(ok)
}
