//! Document scaffolding shared by the blogging handlers.

use crate::config::ServiceModel;
use crate::document::{Document, DocumentBuilder, DomainObject, Keyword, ResourceScope, JSON_API_VERSION};
use crate::error::AppError;
use url::Url;

/// Builder with `jsonapi` version and top-level `up` and `self` links already written.
pub fn start_document<'m>(model: &'m ServiceModel, url: &Url) -> Result<DocumentBuilder<'m>, AppError> {
    let mut builder = DocumentBuilder::new(model, url)?;
    builder
        .set_jsonapi_version(JSON_API_VERSION)?
        .links()?
        .add_up_link()?
        .add_self_link()?
        .end_links()?;
    Ok(builder)
}

/// Path ids are numeric; anything else cannot name a resource.
pub fn parse_id(type_name: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(format!("{}/{}", type_name, raw)))
}

/// Links-only relationships (each with a `related` link) plus the resource `self` link.
pub fn related_links_and_self<T: DomainObject>(
    scope: &mut ResourceScope<'_, '_, T>,
    relationships: &[&str],
) -> Result<(), AppError> {
    scope.relationships()?;
    for name in relationships {
        scope.add_relationship(name, &[Keyword::Related])?;
    }
    scope.end_relationships()?.links()?.add_self_link()?.end_links()?;
    Ok(())
}

/// Single resource, or `data: null` when absent.
pub fn optional_resource<T: DomainObject>(
    mut builder: DocumentBuilder<'_>,
    object: Option<&T>,
    relationships: &[&str],
) -> Result<Document, AppError> {
    match object {
        Some(object) => {
            let mut scope = builder.resource(object)?;
            related_links_and_self(&mut scope, relationships)?;
            scope.end()?;
        }
        None => {
            builder.null_resource()?;
        }
    }
    builder.finish()
}

pub fn resource_collection<T: DomainObject>(
    mut builder: DocumentBuilder<'_>,
    objects: &[T],
    relationships: &[&str],
) -> Result<Document, AppError> {
    let mut scope = builder.resource_collection(objects)?;
    related_links_and_self(&mut scope, relationships)?;
    scope.end()?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("articles", "42").unwrap(), 42);
        assert!(matches!(parse_id("articles", "abc"), Err(AppError::NotFound(_))));
    }
}
