//! Blogging domain objects and the built-in service model describing them.

use crate::config::{parse_config, resolve, ServiceModel};
use crate::document::DomainObject;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Built-in service model, used when `SERVICE_MODEL_PATH` is not set.
pub const BLOGGING_SERVICE_MODEL: &str = include_str!("../service_model/blogging.json");

pub fn blogging_service_model() -> Result<ServiceModel, ConfigError> {
    resolve(&parse_config(BLOGGING_SERVICE_MODEL)?)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEntryPoint {
    pub message: String,
    pub version: String,
}

impl DomainObject for ApiEntryPoint {
    const DOMAIN_TYPE: &'static str = "ApiEntryPoint";
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    pub blog_id: i64,
    pub name: String,
}

impl DomainObject for Blog {
    const DOMAIN_TYPE: &'static str = "Blog";
}

/// `blog_id` and `author_id` are exposed as relationships, not attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub article_id: i64,
    pub blog_id: i64,
    pub author_id: i64,
    pub title: String,
    pub text: String,
}

impl DomainObject for Article {
    const DOMAIN_TYPE: &'static str = "Article";
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub comment_id: i64,
    pub article_id: i64,
    pub author_id: i64,
    pub body: String,
}

impl DomainObject for Comment {
    const DOMAIN_TYPE: &'static str = "Comment";
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub person_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub twitter: Option<String>,
}

impl DomainObject for Person {
    const DOMAIN_TYPE: &'static str = "Person";
}
