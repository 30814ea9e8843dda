//! Config validation: referential integrity and naming consistency.

use crate::config::ServiceModelConfig;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;

/// JSON:API member names: alphanumeric at both ends, '-' and '_' allowed inside.
const MEMBER_NAME_PATTERN: &str = r"^[a-zA-Z0-9](?:[a-zA-Z0-9_-]*[a-zA-Z0-9])?$";

pub fn member_name_regex() -> Result<Regex, ConfigError> {
    Regex::new(MEMBER_NAME_PATTERN).map_err(|e| ConfigError::Validation(format!("member name pattern: {}", e)))
}

pub fn validate(config: &ServiceModelConfig) -> Result<(), ConfigError> {
    if config.resource_types.is_empty() {
        return Err(ConfigError::Validation("at least one resource type required".into()));
    }

    let mut domain_types = HashSet::new();
    for t in &config.resource_types {
        if t.domain_type.trim().is_empty() {
            return Err(ConfigError::Validation("resource type with empty domain_type".into()));
        }
        if !domain_types.insert(t.domain_type.as_str()) {
            return Err(ConfigError::Duplicate {
                kind: "domain type",
                name: t.domain_type.clone(),
            });
        }
    }

    for t in &config.resource_types {
        if let Some(id) = &t.id_property {
            if t.attributes.iter().any(|a| a == id) {
                return Err(ConfigError::Validation(format!(
                    "{}: id property '{}' cannot also be an attribute",
                    t.domain_type, id
                )));
            }
        }
        let mut attributes = HashSet::new();
        for a in &t.attributes {
            if !attributes.insert(a.as_str()) {
                return Err(ConfigError::Duplicate {
                    kind: "attribute",
                    name: format!("{}.{}", t.domain_type, a),
                });
            }
        }
        let mut relationship_names = HashSet::new();
        for r in &t.relationships {
            if !relationship_names.insert(r.name.as_str()) {
                return Err(ConfigError::Duplicate {
                    kind: "relationship",
                    name: format!("{}.{}", t.domain_type, r.name),
                });
            }
            if !domain_types.contains(r.related_type.as_str()) {
                return Err(ConfigError::MissingReference {
                    kind: "related type",
                    id: r.related_type.clone(),
                });
            }
        }
    }

    if let Some(home) = &config.home_resource {
        if !domain_types.contains(home.as_str()) {
            return Err(ConfigError::MissingReference {
                kind: "home resource",
                id: home.clone(),
            });
        }
    }

    Ok(())
}
