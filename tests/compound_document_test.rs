//! Compound document properties: included dedup, linkage integrity, null linkage, determinism.

use blogging_jsonapi::document::{Document, DocumentBuilder, Inclusion, Keyword, Linkage, ResourceIdentifier};
use blogging_jsonapi::domain::{Article, Comment, Person};
use blogging_jsonapi::handlers::articles::articles_document;
use blogging_jsonapi::{blogging_service_model, AppState, BloggingRepository, ServiceModel};
use serde_json::json;
use std::collections::HashSet;
use url::Url;

fn model() -> ServiceModel {
    blogging_service_model().unwrap()
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn article(id: i64) -> Article {
    Article {
        article_id: id,
        blog_id: 1,
        author_id: 9,
        title: format!("Article {}", id),
        text: "text".into(),
    }
}

fn ada() -> Person {
    Person {
        person_id: 9,
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        twitter: None,
    }
}

fn comment(id: i64) -> Comment {
    Comment {
        comment_id: id,
        article_id: 1,
        author_id: 9,
        body: format!("comment {}", id),
    }
}

fn shared_comment() -> Comment {
    comment(5)
}

/// Two comments per article, every comment shared by two articles.
fn comments_of(article: &Article) -> Vec<Comment> {
    match article.article_id {
        1 => vec![comment(1), comment(2)],
        2 => vec![comment(2), comment(3)],
        _ => vec![comment(3), comment(1)],
    }
}

/// Three articles by the same author with overlapping comments.
fn fan_in_document(model: &ServiceModel) -> Document {
    let articles = vec![article(1), article(2), article(3)];
    let mut builder = DocumentBuilder::new(model, &url("http://localhost:3000/articles")).unwrap();
    let mut scope = builder.resource_collection(&articles).unwrap();
    scope
        .relationships()
        .unwrap()
        .add_to_one("author", &[Keyword::Related], Inclusion::Include, |_: &Article| Some(ada()))
        .unwrap()
        .add_to_many("comments", &[Keyword::Related], Inclusion::Include, comments_of)
        .unwrap()
        .end_relationships()
        .unwrap()
        .links()
        .unwrap()
        .add_self_link()
        .unwrap()
        .end_links()
        .unwrap();
    scope.end().unwrap();
    builder.finish().unwrap()
}

#[test]
fn test_fan_in_includes_each_resource_once() {
    let model = model();
    let doc = fan_in_document(&model);
    assert_eq!(doc.resources().len(), 3);

    let included: Vec<_> = doc.included().iter().map(|r| r.identifier().unwrap()).collect();
    assert_eq!(
        included,
        vec![
            ResourceIdentifier::new("people", "9"),
            ResourceIdentifier::new("comments", "1"),
            ResourceIdentifier::new("comments", "2"),
            ResourceIdentifier::new("comments", "3"),
        ]
    );

    for resource in doc.resources() {
        let author = resource.relationship("author").unwrap();
        assert_eq!(author.to_one_linkage().unwrap().unwrap().id, "9");
        let comments = resource.relationship("comments").unwrap();
        assert_eq!(comments.to_many_linkage().unwrap().len(), 2);
    }
    let second: Vec<_> = doc.resources()[1]
        .relationship("comments")
        .unwrap()
        .identifiers()
        .into_iter()
        .map(|i| i.id.clone())
        .collect();
    assert_eq!(second, vec!["2", "3"]);
}

#[test]
fn test_assembly_is_deterministic() {
    let model = model();
    let first = serde_json::to_string(&fan_in_document(&model)).unwrap();
    let second = serde_json::to_string(&fan_in_document(&model)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_primary_resources_never_included() {
    let model = model();
    let articles = vec![article(1), article(2)];
    let mut builder = DocumentBuilder::new(&model, &url("http://h/articles")).unwrap();
    let mut scope = builder.resource_collection(&articles).unwrap();
    scope
        .relationships()
        .unwrap()
        .add_to_many("comments", &[], Inclusion::LinkageOnly, |_: &Article| vec![shared_comment()])
        .unwrap()
        .end_relationships()
        .unwrap();
    scope.end().unwrap();
    builder.included().unwrap();
    let comments = vec![shared_comment()];
    let mut scope = builder.include(&comments).unwrap();
    scope
        .relationships()
        .unwrap()
        .add_to_one("article", &[Keyword::Related], Inclusion::Include, |c: &Comment| Some(article(c.article_id)))
        .unwrap()
        .end_relationships()
        .unwrap();
    scope.end().unwrap();
    builder.end_included().unwrap();
    let doc = builder.finish().unwrap();

    let included: Vec<_> = doc.included().iter().map(|r| r.identifier().unwrap()).collect();
    assert_eq!(included, vec![ResourceIdentifier::new("comments", "5")]);
    let back = doc.included()[0].relationship("article").unwrap();
    assert_eq!(back.to_one_linkage().unwrap().unwrap(), &ResourceIdentifier::new("articles", "1"));
}

#[test]
fn test_missing_to_one_serializes_null_data() {
    let model = model();
    let articles = vec![article(1)];
    let mut builder = DocumentBuilder::new(&model, &url("http://h/articles")).unwrap();
    let mut scope = builder.resource_collection(&articles).unwrap();
    scope
        .relationships()
        .unwrap()
        .add_to_one("author", &[], Inclusion::Include, |_: &Article| None::<Person>)
        .unwrap()
        .end_relationships()
        .unwrap();
    scope.end().unwrap();
    let doc = builder.finish().unwrap();

    assert_eq!(
        doc.resources()[0].relationship("author").unwrap().linkage(),
        Some(&Linkage::ToOne(None))
    );
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["data"][0]["relationships"]["author"], json!({ "data": null }));
    assert!(value.get("included").is_none());
}

#[test]
fn test_articles_document_linkage_resolves() {
    let state = AppState::new(model(), BloggingRepository::seeded());
    let doc = articles_document(&state, &url("http://localhost:3000/articles")).unwrap();

    let present: HashSet<_> = doc
        .resources()
        .iter()
        .chain(doc.included())
        .filter_map(|r| r.identifier())
        .collect();
    assert_eq!(present.len(), doc.resources().len() + doc.included().len(), "duplicate resource");
    for resource in doc.resources().iter().chain(doc.included()) {
        for relationship in resource.relationships().values() {
            for identifier in relationship.identifiers() {
                assert!(present.contains(identifier), "dangling linkage {}", identifier);
            }
        }
        assert!(resource.self_link().is_some(), "{:?} has no self link", resource.identifier());
    }

    let types: Vec<_> = doc.included().iter().map(|r| r.type_name()).collect();
    let first_comment = types.iter().position(|t| *t == "comments").unwrap();
    assert!(types[..first_comment].iter().all(|t| *t == "blogs" || *t == "people"));
}

#[test]
fn test_document_reparses_to_same_value() {
    let model = model();
    let doc = fan_in_document(&model);
    let json = serde_json::to_string(&doc).unwrap();
    let parsed: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, doc);
}
