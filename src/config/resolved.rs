//! Resolved service model: config validated and flattened into lookup tables for document assembly.

use crate::config::RelationshipKind;
use crate::error::AppError;
use std::collections::HashMap;

/// Domain property exposed as a JSON:API attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeInfo {
    /// Property name on the serialized domain object (e.g. "first_name").
    pub property: String,
    /// Attribute name in documents (e.g. "first-name").
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipInfo {
    pub name: String,
    pub kind: RelationshipKind,
    /// Domain type of the related object.
    pub related_type: String,
}

#[derive(Clone, Debug)]
pub struct ResourceType {
    pub domain_type: String,
    pub type_name: String,
    pub id_property: Option<String>,
    /// Attributes in discovery order.
    pub attributes: Vec<AttributeInfo>,
    pub relationships: Vec<RelationshipInfo>,
}

impl ResourceType {
    pub fn attribute_by_name(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipInfo> {
        self.relationships.iter().find(|r| r.name == name)
    }
}

/// Read-only lookup from domain types to their JSON:API shape. Built once at startup, shared behind `Arc`.
#[derive(Clone, Debug)]
pub struct ServiceModel {
    pub(crate) types: Vec<ResourceType>,
    pub(crate) by_domain_type: HashMap<String, usize>,
    pub(crate) by_type_name: HashMap<String, usize>,
    pub(crate) home_resource: Option<String>,
}

impl ServiceModel {
    pub fn types(&self) -> &[ResourceType] {
        &self.types
    }

    pub fn resource_type(&self, domain_type: &str) -> Result<&ResourceType, AppError> {
        self.by_domain_type
            .get(domain_type)
            .map(|&i| &self.types[i])
            .ok_or_else(|| AppError::UnknownResourceType(domain_type.to_string()))
    }

    pub fn resource_type_by_name(&self, type_name: &str) -> Option<&ResourceType> {
        self.by_type_name.get(type_name).map(|&i| &self.types[i])
    }

    pub fn home_resource(&self) -> Option<&ResourceType> {
        self.home_resource
            .as_deref()
            .and_then(|d| self.by_domain_type.get(d))
            .map(|&i| &self.types[i])
    }

    pub fn resolve_type_name(&self, domain_type: &str) -> Result<&str, AppError> {
        Ok(self.resource_type(domain_type)?.type_name.as_str())
    }

    pub fn resolve_attribute_names(&self, domain_type: &str) -> Result<Vec<&str>, AppError> {
        Ok(self
            .resource_type(domain_type)?
            .attributes
            .iter()
            .map(|a| a.name.as_str())
            .collect())
    }

    pub fn resolve_relationship_names(&self, domain_type: &str) -> Result<Vec<&str>, AppError> {
        Ok(self
            .resource_type(domain_type)?
            .relationships
            .iter()
            .map(|r| r.name.as_str())
            .collect())
    }

    /// Relationship declared for `domain_type`, or `UnresolvedRelationship`.
    pub fn relationship(&self, domain_type: &str, name: &str) -> Result<&RelationshipInfo, AppError> {
        self.resource_type(domain_type)?
            .relationship(name)
            .ok_or_else(|| AppError::UnresolvedRelationship {
                domain_type: domain_type.to_string(),
                relationship: name.to_string(),
            })
    }
}
