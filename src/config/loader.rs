//! Load service model config from JSON and resolve it into a `ServiceModel`.

use crate::case::{pluralize, to_member_name};
use crate::config::resolved::{AttributeInfo, RelationshipInfo, ResourceType, ServiceModel};
use crate::config::types::*;
use crate::config::{member_name_regex, validate};
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

fn apply_naming(convention: NamingConvention, name: &str) -> String {
    match convention {
        NamingConvention::StandardMember => to_member_name(name),
        NamingConvention::AsIs => name.to_string(),
    }
}

fn resolve_type_name(conventions: &ConventionsConfig, t: &ResourceTypeConfig) -> String {
    if let Some(explicit) = &t.type_name {
        return explicit.clone();
    }
    let named = apply_naming(conventions.type_naming.naming, &t.domain_type);
    if conventions.type_naming.plural {
        pluralize(&named)
    } else {
        named
    }
}

/// Build resolved model from config (validates first).
pub fn resolve(config: &ServiceModelConfig) -> Result<ServiceModel, ConfigError> {
    validate(config)?;
    let member_name = member_name_regex()?;
    let conventions = &config.conventions;

    let mut types = Vec::with_capacity(config.resource_types.len());
    let mut by_domain_type = HashMap::new();
    let mut by_type_name = HashMap::new();

    for t in &config.resource_types {
        let type_name = resolve_type_name(conventions, t);
        if !member_name.is_match(&type_name) {
            return Err(ConfigError::InvalidMemberName(type_name));
        }
        if by_type_name.contains_key(&type_name) {
            return Err(ConfigError::Duplicate {
                kind: "type name",
                name: type_name,
            });
        }

        let mut attributes = Vec::with_capacity(t.attributes.len());
        for property in &t.attributes {
            let name = apply_naming(conventions.attribute_naming, property);
            if !member_name.is_match(&name) || name == "type" || name == "id" {
                return Err(ConfigError::InvalidMemberName(format!("{}.{}", t.domain_type, name)));
            }
            attributes.push(AttributeInfo {
                property: property.clone(),
                name,
            });
        }

        let mut relationships = Vec::with_capacity(t.relationships.len());
        for r in &t.relationships {
            if !member_name.is_match(&r.name) {
                return Err(ConfigError::InvalidMemberName(format!("{}.{}", t.domain_type, r.name)));
            }
            if attributes.iter().any(|a| a.name == r.name) {
                return Err(ConfigError::Duplicate {
                    kind: "member",
                    name: format!("{}.{}", t.domain_type, r.name),
                });
            }
            relationships.push(RelationshipInfo {
                name: r.name.clone(),
                kind: r.kind,
                related_type: r.related_type.clone(),
            });
        }

        tracing::debug!(domain_type = %t.domain_type, type_name = %type_name, "resolved resource type");
        by_domain_type.insert(t.domain_type.clone(), types.len());
        by_type_name.insert(type_name.clone(), types.len());
        types.push(ResourceType {
            domain_type: t.domain_type.clone(),
            type_name,
            id_property: t.id_property.clone(),
            attributes,
            relationships,
        });
    }

    Ok(ServiceModel {
        types,
        by_domain_type,
        by_type_name,
        home_resource: config.home_resource.clone(),
    })
}

/// Parse service model config from a JSON string.
pub fn parse_config(json: &str) -> Result<ServiceModelConfig, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))
}

/// Load service model config from a JSON file.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<ServiceModelConfig, ConfigError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading service model");
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    parse_config(&raw)
}
