//! Reading inbound resources back into domain objects.

use crate::config::ServiceModel;
use crate::document::resource::DomainObject;
use crate::document::{Resource, ResourceIdentifier};
use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Ids are strings on the wire; numeric ones go back to the domain as numbers.
fn id_value(id: &str) -> Value {
    id.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}

/// Map a resource's id and attributes back to domain property names and deserialize.
/// Relationships are left to the caller.
pub fn read_resource<T>(model: &ServiceModel, resource: &Resource) -> Result<T, AppError>
where
    T: DomainObject + DeserializeOwned,
{
    let resource_type = model.resource_type(T::DOMAIN_TYPE)?;
    if resource.type_name() != resource_type.type_name {
        return Err(AppError::BadRequest(format!(
            "expected resource of type '{}', got '{}'",
            resource_type.type_name,
            resource.type_name()
        )));
    }

    let mut properties = Map::new();
    if let (Some(property), Some(id)) = (&resource_type.id_property, resource.id()) {
        properties.insert(property.clone(), id_value(id));
    }
    for (name, value) in resource.attributes() {
        let attribute = resource_type.attribute_by_name(name).ok_or_else(|| {
            AppError::BadRequest(format!(
                "unknown attribute '{}' for type '{}'",
                name, resource_type.type_name
            ))
        })?;
        properties.insert(attribute.property.clone(), value.clone());
    }

    serde_json::from_value(Value::Object(properties))
        .map_err(|e| AppError::BadRequest(format!("invalid {} resource: {}", resource_type.type_name, e)))
}

impl ServiceModel {
    pub fn read_resource<T>(&self, resource: &Resource) -> Result<T, AppError>
    where
        T: DomainObject + DeserializeOwned,
    {
        read_resource(self, resource)
    }
}

/// Id of a to-one relationship's linkage, checked against the expected domain type.
pub fn read_to_one_id<'r>(
    model: &ServiceModel,
    resource: &'r Resource,
    name: &str,
    related_domain_type: &str,
) -> Result<Option<&'r ResourceIdentifier>, AppError> {
    let Some(relationship) = resource.relationship(name) else {
        return Ok(None);
    };
    let Some(identifier) = relationship.to_one_linkage()? else {
        return Ok(None);
    };
    let expected = model.resolve_type_name(related_domain_type)?;
    if identifier.type_ != expected {
        return Err(AppError::BadRequest(format!(
            "relationship '{}' expects type '{}', got '{}'",
            name, expected, identifier.type_
        )));
    }
    Ok(Some(identifier))
}
