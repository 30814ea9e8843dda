//! Projection of domain objects into resources, driven by the service model.

use crate::config::{ResourceType, ServiceModel};
use crate::document::link::{Keyword, LinkBuilder, UrlBuilderConfiguration};
use crate::document::{Link, Links, Relationship, Resource, ResourceIdentifier};
use crate::error::AppError;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// A domain type registered in the service model. Properties are read from its serde form.
pub trait DomainObject: Serialize {
    const DOMAIN_TYPE: &'static str;
}

/// Resource under construction: the builder adds relationships and links before freezing it.
#[derive(Debug)]
pub(crate) struct ResourceDraft {
    pub(crate) type_name: String,
    pub(crate) id: Option<String>,
    pub(crate) attributes: Map<String, Value>,
    pub(crate) relationships: IndexMap<String, Relationship>,
    pub(crate) links: Links,
}

impl ResourceDraft {
    pub(crate) fn identifier(&self) -> Option<ResourceIdentifier> {
        self.id
            .as_ref()
            .map(|id| ResourceIdentifier::new(self.type_name.clone(), id.clone()))
    }

    pub(crate) fn into_resource(self) -> Resource {
        Resource::from_parts(self.type_name, self.id, self.attributes, self.relationships, self.links)
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub struct ResourceFactory<'a> {
    model: &'a ServiceModel,
    urls: &'a UrlBuilderConfiguration,
}

impl<'a> ResourceFactory<'a> {
    pub fn new(model: &'a ServiceModel, urls: &'a UrlBuilderConfiguration) -> Self {
        Self { model, urls }
    }

    pub fn model(&self) -> &'a ServiceModel {
        self.model
    }

    pub fn urls(&self) -> &'a UrlBuilderConfiguration {
        self.urls
    }

    fn properties<T: DomainObject>(&self, object: &T) -> Result<(&'a ResourceType, Map<String, Value>), AppError> {
        let resource_type = self.model.resource_type(T::DOMAIN_TYPE)?;
        match serde_json::to_value(object)? {
            Value::Object(properties) => Ok((resource_type, properties)),
            other => Err(AppError::Internal(format!(
                "{} serialized to {} instead of an object",
                T::DOMAIN_TYPE,
                other
            ))),
        }
    }

    fn id_of(resource_type: &ResourceType, properties: &Map<String, Value>) -> Result<Option<String>, AppError> {
        match &resource_type.id_property {
            None => Ok(None),
            Some(property) => properties
                .get(property)
                .and_then(id_string)
                .map(Some)
                .ok_or_else(|| AppError::MissingIdentity(resource_type.domain_type.clone())),
        }
    }

    /// `(type, id)` of a domain object. Fails with `MissingIdentity` for id-less types.
    pub fn identify<T: DomainObject>(&self, object: &T) -> Result<ResourceIdentifier, AppError> {
        let (resource_type, properties) = self.properties(object)?;
        let id = Self::id_of(resource_type, &properties)?
            .ok_or_else(|| AppError::MissingIdentity(resource_type.domain_type.clone()))?;
        Ok(ResourceIdentifier::new(resource_type.type_name.clone(), id))
    }

    /// Attributes in model order; properties the object does not carry become `null`.
    pub(crate) fn draft<T: DomainObject>(&self, object: &T) -> Result<ResourceDraft, AppError> {
        let (resource_type, mut properties) = self.properties(object)?;
        let id = Self::id_of(resource_type, &properties)?;
        let mut attributes = Map::new();
        for attribute in &resource_type.attributes {
            let value = properties.remove(&attribute.property).unwrap_or(Value::Null);
            attributes.insert(attribute.name.clone(), value);
        }
        Ok(ResourceDraft {
            type_name: resource_type.type_name.clone(),
            id,
            attributes,
            relationships: IndexMap::new(),
            links: Links::new(),
        })
    }

    /// Stand-alone resource with the requested resource-level links and no relationships.
    pub fn build<T: DomainObject>(&self, object: &T, links: &[Keyword]) -> Result<Resource, AppError> {
        let mut draft = self.draft(object)?;
        for keyword in links {
            let link = self.resource_link(&draft.type_name, draft.id.as_deref(), *keyword)?;
            draft.links.insert(keyword.as_str().to_string(), link);
        }
        Ok(draft.into_resource())
    }

    /// `self` is `/{type}/{id}`; `up` is the type collection.
    pub fn resource_link(&self, type_name: &str, id: Option<&str>, keyword: Keyword) -> Result<Link, AppError> {
        match keyword {
            Keyword::SelfLink => {
                let id = id.ok_or_else(|| AppError::MissingIdentity(type_name.to_string()))?;
                LinkBuilder::build(self.urls, [type_name, id])
            }
            Keyword::Up => LinkBuilder::build(self.urls, [type_name]),
            Keyword::Related => Err(AppError::InvalidTransition(
                "'related' is a relationship link, not a resource link".into(),
            )),
        }
    }
}
