//! End-to-end tests against the router: links, media type, errors documents, article creation.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use blogging_jsonapi::domain::{Article, Blog, Person};
use blogging_jsonapi::routes::fault_layer;
use blogging_jsonapi::{
    app, blogging_service_model, AppState, BloggingData, BloggingRepository, JSON_API_MEDIA_TYPE,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const MAX_BODY_BYTES: usize = 64 * 1024;

fn router() -> Router {
    let state = AppState::new(blogging_service_model().unwrap(), BloggingRepository::seeded());
    app(state, MAX_BODY_BYTES)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "localhost:3000")
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Every href under any `links` object in the document.
fn hrefs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "links" {
                    if let Value::Object(links) = child {
                        out.extend(links.values().filter_map(|l| l.as_str().map(String::from)));
                    }
                } else {
                    hrefs(child, out);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| hrefs(item, out)),
        _ => {}
    }
}

#[tokio::test]
async fn test_links_follow_request_host_and_scheme() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("https://api.example.com/articles")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_API_MEDIA_TYPE);

    let body = body_json(response).await;
    let mut links = Vec::new();
    hrefs(&body, &mut links);
    assert!(!links.is_empty());
    for link in &links {
        assert!(link.starts_with("https://api.example.com/"), "{}", link);
    }
    assert_eq!(body["links"]["self"], "https://api.example.com/articles");
    assert_eq!(body["links"]["up"], "https://api.example.com/");
}

#[tokio::test]
async fn test_forwarded_proto_sets_scheme() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/blogs/1")
                .header(header::HOST, "blog.example.org")
                .header("x-forwarded-proto", "https")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["links"]["self"], "https://blog.example.org/blogs/1");
}

#[tokio::test]
async fn test_unsupported_forwarded_proto_is_bad_request() {
    for proto in ["foo", "javascript"] {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/articles")
                    .header(header::HOST, "localhost:3000")
                    .header("x-forwarded-proto", proto)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", proto);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["status"], "400");
    }
}

#[tokio::test]
async fn test_home_document() {
    let response = router().oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["jsonapi"]["version"], "1.0");
    assert_eq!(body["links"], json!({ "self": "http://localhost:3000/" }));
    assert_eq!(body["data"]["type"], "api-entry-points");
    assert!(body["data"].get("id").is_none());
    assert_eq!(body["data"]["links"]["people"], "http://localhost:3000/people");
}

#[tokio::test]
async fn test_article_is_compound() {
    let response = router().oneshot(get_request("/articles/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let data = &body["data"];
    assert_eq!(data["id"], "1");
    assert_eq!(data["attributes"], json!({ "title": "Compound documents", "text": "Primary data, relationships and the included section." }));
    assert_eq!(data["relationships"]["blog"]["data"], json!({ "type": "blogs", "id": "1" }));
    assert_eq!(
        data["relationships"]["author"]["links"]["related"],
        "http://localhost:3000/articles/1/author"
    );
    assert_eq!(
        data["relationships"]["comments"]["data"],
        json!([{ "type": "comments", "id": "1" }, { "type": "comments", "id": "2" }])
    );
    assert_eq!(body["links"]["up"], "http://localhost:3000/articles");

    let included: Vec<String> = body["included"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| format!("{}/{}", r["type"].as_str().unwrap(), r["id"].as_str().unwrap()))
        .collect();
    assert_eq!(
        included,
        vec!["blogs/1", "people/9", "comments/1", "comments/2", "people/2", "people/1"]
    );
}

#[tokio::test]
async fn test_related_collection_has_up_link() {
    let response = router().oneshot(get_request("/articles/1/comments")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["links"]["up"], "http://localhost:3000/articles/1");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_related_resource_is_null_data() {
    let data = BloggingData {
        blogs: vec![Blog {
            blog_id: 1,
            name: "Only".into(),
        }],
        articles: vec![Article {
            article_id: 5,
            blog_id: 77,
            author_id: 9,
            title: "Orphan".into(),
            text: String::new(),
        }],
        comments: Vec::new(),
        people: vec![Person {
            person_id: 9,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            twitter: None,
        }],
    };
    let state = AppState::new(blogging_service_model().unwrap(), BloggingRepository::new(data));
    let response = app(state, MAX_BODY_BYTES)
        .oneshot(get_request("/articles/5/blog"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"].is_null());
    assert!(body.as_object().unwrap().contains_key("data"));
}

#[tokio::test]
async fn test_unknown_article_is_not_found() {
    let response = router().oneshot(get_request("/articles/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_API_MEDIA_TYPE);
    let body = body_json(response).await;
    let error = &body["errors"][0];
    assert_eq!(error["status"], "404");
    assert_eq!(error["title"], "NotFoundFault");
    assert!(!error["code"].as_str().unwrap().is_empty());
    assert_ne!(error["id"], error["code"]);
}

#[tokio::test]
async fn test_create_article() {
    let router = router();
    let payload = json!({
        "data": {
            "type": "articles",
            "attributes": { "title": "Fresh", "text": "Just written." },
            "relationships": {
                "author": { "data": { "type": "people", "id": "1" } },
                "blog": { "data": { "type": "blogs", "id": "2" } }
            }
        }
    });
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/articles")
                .header(header::HOST, "localhost:3000")
                .header(header::CONTENT_TYPE, JSON_API_MEDIA_TYPE)
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("http://localhost:3000/articles/"));
    let body = body_json(response).await;
    assert_eq!(body["data"]["links"]["self"], location.as_str());

    let path = location.trim_start_matches("http://localhost:3000");
    let response = router.oneshot(get_request(path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["attributes"]["title"], "Fresh");
    assert_eq!(body["data"]["relationships"]["author"]["data"]["id"], "1");
    assert_eq!(body["data"]["relationships"]["blog"]["data"]["id"], "2");
}

#[tokio::test]
async fn test_create_with_wrong_type_is_bad_request() {
    let payload = json!({ "data": { "type": "people", "attributes": {} } });
    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/articles")
                .header(header::HOST, "localhost:3000")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["status"], "400");
}

#[tokio::test]
async fn test_panic_becomes_errors_document() {
    async fn boom() -> &'static str {
        panic!("boom")
    }
    let router = Router::new().route("/boom", get(boom)).layer(fault_layer());
    let response = router.oneshot(get_request("/boom")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    let error = &body["errors"][0];
    assert_eq!(error["status"], "500");
    assert_eq!(error["detail"], "boom");
    assert_eq!(error["title"], "InternalError");
}

#[tokio::test]
async fn test_health() {
    let response = router().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}
