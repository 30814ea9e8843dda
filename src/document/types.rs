//! JSON:API document types (serde). Outbound documents are produced by `DocumentBuilder`; inbound ones are deserialized.

use crate::error::AppError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

pub const JSON_API_VERSION: &str = "1.0";
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(type_: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.id)
    }
}

/// Absolute URL. Serialized as a plain string; inbound links may also use the `{"href": ...}` object form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    href: String,
}

impl Link {
    pub(crate) fn new(href: String) -> Self {
        Self { href }
    }

    pub fn href(&self) -> &str {
        &self.href
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href)
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.href)
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Href(String),
            Object { href: String },
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Href(href) | Repr::Object { href } => Link { href },
        })
    }
}

pub type Links = IndexMap<String, Link>;

/// Resource linkage of a relationship. `ToOne(None)` serializes as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    ToMany(Vec<ResourceIdentifier>),
    ToOne(Option<ResourceIdentifier>),
}

/// `data` present (possibly null) vs absent.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Linkage>, D::Error> {
    Linkage::deserialize(deserializer).map(Some)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    links: Links,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    data: Option<Linkage>,
}

impl Relationship {
    pub fn to_one(linkage: Option<ResourceIdentifier>, links: Links) -> Self {
        Self {
            links,
            data: Some(Linkage::ToOne(linkage)),
        }
    }

    pub fn to_many(linkage: Vec<ResourceIdentifier>, links: Links) -> Self {
        Self {
            links,
            data: Some(Linkage::ToMany(linkage)),
        }
    }

    /// Relationship carrying links only; `data` is omitted.
    pub fn links_only(links: Links) -> Self {
        Self { links, data: None }
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    pub fn linkage(&self) -> Option<&Linkage> {
        self.data.as_ref()
    }

    pub fn is_linkage_null_or_empty(&self) -> bool {
        match &self.data {
            None | Some(Linkage::ToOne(None)) => true,
            Some(Linkage::ToMany(ids)) => ids.is_empty(),
            Some(Linkage::ToOne(Some(_))) => false,
        }
    }

    pub fn to_one_linkage(&self) -> Result<Option<&ResourceIdentifier>, AppError> {
        match &self.data {
            Some(Linkage::ToOne(id)) => Ok(id.as_ref()),
            None => Ok(None),
            Some(Linkage::ToMany(_)) => Err(AppError::BadRequest("expected to-one resource linkage, got to-many".into())),
        }
    }

    pub fn to_many_linkage(&self) -> Result<&[ResourceIdentifier], AppError> {
        match &self.data {
            Some(Linkage::ToMany(ids)) => Ok(ids),
            None => Ok(&[]),
            Some(Linkage::ToOne(_)) => Err(AppError::BadRequest("expected to-many resource linkage, got to-one".into())),
        }
    }

    /// All identifiers in the linkage, in order.
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match &self.data {
            Some(Linkage::ToOne(Some(id))) => vec![id],
            Some(Linkage::ToMany(ids)) => ids.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// A resource object. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    relationships: IndexMap<String, Relationship>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    links: Links,
}

impl Resource {
    pub(crate) fn from_parts(
        type_: String,
        id: Option<String>,
        attributes: Map<String, Value>,
        relationships: IndexMap<String, Relationship>,
        links: Links,
    ) -> Self {
        Self {
            type_,
            id,
            attributes,
            relationships,
            links,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn identifier(&self) -> Option<ResourceIdentifier> {
        self.id
            .as_ref()
            .map(|id| ResourceIdentifier::new(self.type_.clone(), id.clone()))
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn relationships(&self) -> &IndexMap<String, Relationship> {
        &self.relationships
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    pub fn self_link(&self) -> Option<&Link> {
        self.links.get("self")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Collection(Vec<Resource>),
    Resource(Box<Resource>),
    #[default]
    Null,
}

impl PrimaryData {
    pub fn resources(&self) -> &[Resource] {
        match self {
            PrimaryData::Collection(rs) => rs,
            PrimaryData::Resource(r) => std::slice::from_ref(r.as_ref()),
            PrimaryData::Null => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonApiObject {
    pub version: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jsonapi: Option<JsonApiObject>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    links: Links,
    #[serde(default)]
    data: PrimaryData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    included: Vec<Resource>,
}

impl Document {
    pub(crate) fn from_parts(
        jsonapi: Option<JsonApiObject>,
        links: Links,
        data: PrimaryData,
        included: Vec<Resource>,
    ) -> Self {
        Self {
            jsonapi,
            links,
            data,
            included,
        }
    }

    pub fn jsonapi_version(&self) -> Option<&str> {
        self.jsonapi.as_ref().map(|j| j.version.as_str())
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    pub fn data(&self) -> &PrimaryData {
        &self.data
    }

    /// The single primary resource, if `data` is a resource object.
    pub fn resource(&self) -> Option<&Resource> {
        match &self.data {
            PrimaryData::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Primary resources: the collection, the single resource, or nothing.
    pub fn resources(&self) -> &[Resource] {
        self.data.resources()
    }

    pub fn included(&self) -> &[Resource] {
        &self.included
    }

    pub fn is_null(&self) -> bool {
        matches!(self.data, PrimaryData::Null)
    }
}
