//! Raw service model config types matching the JSON layout of a service model file.

use serde::{Deserialize, Serialize};

/// How a domain identifier becomes a JSON:API member name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// `first_name` / `FirstName` -> `first-name`.
    #[default]
    StandardMember,
    /// Keep the domain name untouched.
    AsIs,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeNamingConfig {
    #[serde(default = "default_true")]
    pub plural: bool,
    #[serde(default)]
    pub naming: NamingConvention,
}

impl Default for TypeNamingConfig {
    fn default() -> Self {
        Self {
            plural: true,
            naming: NamingConvention::StandardMember,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConventionsConfig {
    #[serde(default)]
    pub attribute_naming: NamingConvention,
    #[serde(default)]
    pub type_naming: TypeNamingConfig,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    ToOne,
    ToMany,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelationshipConfig {
    /// Relationship member name as it appears in documents (e.g. "author").
    pub name: String,
    pub kind: RelationshipKind,
    /// Domain type of the related object (e.g. "Person").
    pub related_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceTypeConfig {
    /// Domain type name (e.g. "Article").
    pub domain_type: String,
    /// Explicit JSON:API type name; derived from `domain_type` by the conventions when absent.
    #[serde(default)]
    pub type_name: Option<String>,
    /// Domain property holding the resource id. None for singleton resources such as the home resource.
    #[serde(default)]
    pub id_property: Option<String>,
    /// Domain properties exposed as attributes, in discovery order.
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub relationships: Vec<RelationshipConfig>,
}

/// Whole service model config: conventions, home resource and resource types.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceModelConfig {
    #[serde(default)]
    pub conventions: ConventionsConfig,
    #[serde(default)]
    pub home_resource: Option<String>,
    pub resource_types: Vec<ResourceTypeConfig>,
}
