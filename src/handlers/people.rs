//! `/people` handlers.

use crate::document::Document;
use crate::error::AppError;
use crate::extractors::RequestUrl;
use crate::handlers::articles::ARTICLE_RELATIONSHIPS;
use crate::handlers::comments::COMMENT_RELATIONSHIPS;
use crate::handlers::document::{optional_resource, parse_id, resource_collection, start_document};
use crate::response::{ok, JsonApi};
use crate::state::AppState;
use axum::extract::{Path, State};

pub(crate) const PERSON_RELATIONSHIPS: &[&str] = &["articles", "comments"];

pub async fn list(State(state): State<AppState>, RequestUrl(url): RequestUrl) -> Result<JsonApi<Document>, AppError> {
    let people = state.repository.read()?.people.clone();
    resource_collection(start_document(&state.model, &url)?, &people, PERSON_RELATIONSHIPS).map(ok)
}

pub async fn get(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let person = state.repository.get_person(parse_id("people", &id)?)?;
    optional_resource(start_document(&state.model, &url)?, Some(&person), PERSON_RELATIONSHIPS).map(ok)
}

pub async fn articles(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let person = state.repository.get_person(parse_id("people", &id)?)?;
    let articles = state.repository.read()?.person_articles(&person);
    resource_collection(start_document(&state.model, &url)?, &articles, ARTICLE_RELATIONSHIPS).map(ok)
}

pub async fn comments(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let person = state.repository.get_person(parse_id("people", &id)?)?;
    let comments = state.repository.read()?.person_comments(&person);
    resource_collection(start_document(&state.model, &url)?, &comments, COMMENT_RELATIONSHIPS).map(ok)
}
