//! `/comments` handlers.

use crate::document::Document;
use crate::error::AppError;
use crate::extractors::RequestUrl;
use crate::handlers::articles::ARTICLE_RELATIONSHIPS;
use crate::handlers::document::{optional_resource, parse_id, resource_collection, start_document};
use crate::handlers::people::PERSON_RELATIONSHIPS;
use crate::response::{ok, JsonApi};
use crate::state::AppState;
use axum::extract::{Path, State};

pub(crate) const COMMENT_RELATIONSHIPS: &[&str] = &["article", "author"];

pub async fn list(State(state): State<AppState>, RequestUrl(url): RequestUrl) -> Result<JsonApi<Document>, AppError> {
    let comments = state.repository.read()?.comments.clone();
    resource_collection(start_document(&state.model, &url)?, &comments, COMMENT_RELATIONSHIPS).map(ok)
}

pub async fn get(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let comment = state.repository.get_comment(parse_id("comments", &id)?)?;
    optional_resource(start_document(&state.model, &url)?, Some(&comment), COMMENT_RELATIONSHIPS).map(ok)
}

pub async fn article(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let comment = state.repository.get_comment(parse_id("comments", &id)?)?;
    let article = state.repository.read()?.comment_article(&comment);
    optional_resource(start_document(&state.model, &url)?, article.as_ref(), ARTICLE_RELATIONSHIPS).map(ok)
}

pub async fn author(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let comment = state.repository.get_comment(parse_id("comments", &id)?)?;
    let author = state.repository.read()?.comment_author(&comment);
    optional_resource(start_document(&state.model, &url)?, author.as_ref(), PERSON_RELATIONSHIPS).map(ok)
}
