//! Deduplicated `included` section, keyed by resource identity in first-registration order.

use crate::document::{Resource, ResourceIdentifier};
use crate::error::AppError;
use indexmap::map::Entry;
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct IncludedSet {
    resources: IndexMap<ResourceIdentifier, Resource>,
}

impl IncludedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource. Returns `false` when one with the same identity is already present;
    /// the first registration wins.
    pub fn register(&mut self, resource: Resource) -> Result<bool, AppError> {
        let identifier = resource
            .identifier()
            .ok_or_else(|| AppError::MissingIdentity(resource.type_name().to_string()))?;
        match self.resources.entry(identifier) {
            Entry::Occupied(entry) => {
                tracing::trace!(resource = %entry.key(), "already included");
                Ok(false)
            }
            Entry::Vacant(entry) => {
                entry.insert(resource);
                Ok(true)
            }
        }
    }

    pub fn contains(&self, identifier: &ResourceIdentifier) -> bool {
        self.resources.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Resource> {
        self.resources.values().cloned().collect()
    }

    pub fn into_resources(self) -> Vec<Resource> {
        self.resources.into_values().collect()
    }
}
