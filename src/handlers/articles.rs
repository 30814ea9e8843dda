//! `/articles` handlers. Article documents are compound: blogs, authors, comments and comment
//! authors are included.

use crate::document::{
    read_to_one_id, Document, DocumentBuilder, DomainObject, Inclusion, Keyword, ResourceScope,
};
use crate::domain::{Article, Blog, Comment, Person};
use crate::error::AppError;
use crate::extractors::RequestUrl;
use crate::handlers::blogs::BLOG_RELATIONSHIPS;
use crate::handlers::comments::COMMENT_RELATIONSHIPS;
use crate::handlers::document::{optional_resource, parse_id, resource_collection, start_document};
use crate::handlers::people::PERSON_RELATIONSHIPS;
use crate::repository::BloggingData;
use crate::response::{created, ok, JsonApi};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};
use url::Url;

pub(crate) const ARTICLE_RELATIONSHIPS: &[&str] = &["blog", "author", "comments"];

fn article_relationships(scope: &mut ResourceScope<'_, '_, Article>, data: &BloggingData) -> Result<(), AppError> {
    scope
        .relationships()?
        .add_to_one("blog", &[Keyword::Related], Inclusion::Include, |a: &Article| data.article_blog(a))?
        .add_to_one("author", &[Keyword::Related], Inclusion::Include, |a: &Article| data.article_author(a))?
        .add_to_many("comments", &[Keyword::Related], Inclusion::LinkageOnly, |a: &Article| {
            data.article_comments(a)
        })?
        .end_relationships()?
        .links()?
        .add_self_link()?
        .end_links()?;
    Ok(())
}

/// Comments with their own `author` relationship; comment authors follow them in `included`.
fn include_comments(builder: &mut DocumentBuilder<'_>, data: &BloggingData, comments: &[Comment]) -> Result<(), AppError> {
    builder.included()?;
    let mut scope = builder.include(comments)?;
    scope
        .relationships()?
        .add_to_one("author", &[Keyword::Related], Inclusion::Include, |c: &Comment| data.comment_author(c))?
        .end_relationships()?
        .links()?
        .add_self_link()?
        .end_links()?;
    scope.end()?;
    builder.end_included()?;
    Ok(())
}

pub fn articles_document(state: &AppState, url: &Url) -> Result<Document, AppError> {
    let data = state.repository.read()?;
    let articles = data.articles.clone();
    let comments = data.comments_of_articles(&articles);
    let mut builder = start_document(&state.model, url)?;
    let mut scope = builder.resource_collection(&articles)?;
    article_relationships(&mut scope, &data)?;
    scope.end()?;
    include_comments(&mut builder, &data, &comments)?;
    builder.finish()
}

pub fn article_document(state: &AppState, url: &Url, id: i64) -> Result<Document, AppError> {
    let article = state.repository.get_article(id)?;
    let data = state.repository.read()?;
    let comments = data.article_comments(&article);
    let mut builder = start_document(&state.model, url)?;
    let mut scope = builder.resource(&article)?;
    article_relationships(&mut scope, &data)?;
    scope.end()?;
    include_comments(&mut builder, &data, &comments)?;
    builder.finish()
}

pub async fn list(State(state): State<AppState>, RequestUrl(url): RequestUrl) -> Result<JsonApi<Document>, AppError> {
    articles_document(&state, &url).map(ok)
}

pub async fn get(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    article_document(&state, &url, parse_id("articles", &id)?).map(ok)
}

pub async fn blog(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let article = state.repository.get_article(parse_id("articles", &id)?)?;
    let blog: Option<Blog> = state.repository.read()?.article_blog(&article);
    optional_resource(start_document(&state.model, &url)?, blog.as_ref(), BLOG_RELATIONSHIPS).map(ok)
}

pub async fn author(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let article = state.repository.get_article(parse_id("articles", &id)?)?;
    let author: Option<Person> = state.repository.read()?.article_author(&article);
    optional_resource(start_document(&state.model, &url)?, author.as_ref(), PERSON_RELATIONSHIPS).map(ok)
}

pub async fn comments(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(id): Path<String>,
) -> Result<JsonApi<Document>, AppError> {
    let article = state.repository.get_article(parse_id("articles", &id)?)?;
    let comments = state.repository.read()?.article_comments(&article);
    resource_collection(start_document(&state.model, &url)?, &comments, COMMENT_RELATIONSHIPS).map(ok)
}

fn linkage_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("resource linkage id '{}' is not numeric", raw)))
}

/// Article from an inbound document. `author` and `blog` linkage set the foreign ids; the id is
/// always assigned by the repository.
pub fn article_from_document(state: &AppState, document: &Document) -> Result<Article, AppError> {
    let resource = document
        .resource()
        .ok_or_else(|| AppError::BadRequest("expected a single article resource".into()))?;
    let mut article: Article = state.model.read_resource(resource)?;
    if let Some(author) = read_to_one_id(&state.model, resource, "author", Person::DOMAIN_TYPE)? {
        article.author_id = linkage_id(&author.id)?;
    }
    if let Some(blog) = read_to_one_id(&state.model, resource, "blog", Blog::DOMAIN_TYPE)? {
        article.blog_id = linkage_id(&blog.id)?;
    }
    Ok(article)
}

pub async fn create(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(inbound) = payload?;
    let article = state.repository.add_article(article_from_document(&state, &inbound)?)?;
    let document = optional_resource(start_document(&state.model, &url)?, Some(&article), ARTICLE_RELATIONSHIPS)?;
    let location = document
        .resource()
        .and_then(|r| r.self_link())
        .map(|l| l.href().to_string());
    Ok(created(document, location.as_deref()))
}
