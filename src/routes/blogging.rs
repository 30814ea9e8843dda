//! Blogging API routes with the JSON:API headers policy, body limit and panic handling.

use crate::document::{CorrelationId, ErrorsDocument, PanicFault, JSON_API_MEDIA_TYPE};
use crate::handlers::{articles, blogs, comments, home, people};
use crate::response::JsonApi;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer,
};

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let fault = PanicFault::from_payload(payload.as_ref());
    let correlation_id = CorrelationId::generate();
    tracing::error!(correlation_id = %correlation_id, error = %fault, "handler panicked");
    let document = ErrorsDocument::from_fault(&fault, &correlation_id);
    (StatusCode::INTERNAL_SERVER_ERROR, JsonApi(document)).into_response()
}

/// Turns handler panics into a 500 errors document.
pub fn fault_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

/// Every response from the API carries the JSON:API media type.
pub fn headers_policy() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::CONTENT_TYPE, HeaderValue::from_static(JSON_API_MEDIA_TYPE))
}

pub fn blogging_routes(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/blogs", get(blogs::list))
        .route("/blogs/:id", get(blogs::get))
        .route("/blogs/:id/articles", get(blogs::articles))
        .route("/articles", get(articles::list).post(articles::create))
        .route("/articles/:id", get(articles::get))
        .route("/articles/:id/blog", get(articles::blog))
        .route("/articles/:id/author", get(articles::author))
        .route("/articles/:id/comments", get(articles::comments))
        .route("/comments", get(comments::list))
        .route("/comments/:id", get(comments::get))
        .route("/comments/:id/article", get(comments::article))
        .route("/comments/:id/author", get(comments::author))
        .route("/people", get(people::list))
        .route("/people/:id", get(people::get))
        .route("/people/:id/articles", get(people::articles))
        .route("/people/:id/comments", get(people::comments))
        .layer(
            ServiceBuilder::new()
                .layer(headers_policy())
                .layer(fault_layer())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        .with_state(state)
}
