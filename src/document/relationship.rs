//! Relationship resolution: linkage, relationship links and related resources for inclusion.

use crate::config::{RelationshipInfo, RelationshipKind, ServiceModel};
use crate::document::link::{Keyword, LinkBuilder, UrlBuilderConfiguration};
use crate::document::resource::{DomainObject, ResourceFactory};
use crate::document::{Links, Relationship, Resource, ResourceIdentifier};
use crate::error::AppError;

/// Whether related resources go into `included` or only appear as linkage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Inclusion {
    #[default]
    Include,
    LinkageOnly,
}

#[derive(Debug)]
pub struct ResolvedRelationship {
    pub relationship: Relationship,
    /// Related resources to register in `included`; empty for `LinkageOnly`.
    pub related: Vec<Resource>,
}

pub struct RelationshipResolver<'a> {
    factory: ResourceFactory<'a>,
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(model: &'a ServiceModel, urls: &'a UrlBuilderConfiguration) -> Self {
        Self {
            factory: ResourceFactory::new(model, urls),
        }
    }

    fn declared<S: DomainObject>(&self, name: &str) -> Result<&'a RelationshipInfo, AppError> {
        self.factory.model().relationship(S::DOMAIN_TYPE, name)
    }

    fn check<S: DomainObject, R: DomainObject>(
        &self,
        name: &str,
        kind: RelationshipKind,
    ) -> Result<&'a RelationshipInfo, AppError> {
        let info = self.declared::<S>(name)?;
        if info.kind != kind {
            return Err(AppError::RelationshipMismatch(format!(
                "{}.{} is declared {:?}, resolved as {:?}",
                S::DOMAIN_TYPE,
                name,
                info.kind,
                kind
            )));
        }
        if info.related_type != R::DOMAIN_TYPE {
            return Err(AppError::RelationshipMismatch(format!(
                "{}.{} relates to {}, not {}",
                S::DOMAIN_TYPE,
                name,
                info.related_type,
                R::DOMAIN_TYPE
            )));
        }
        Ok(info)
    }

    /// `self` is `/{type}/{id}/relationships/{name}`, `related` is `/{type}/{id}/{name}`.
    fn relationship_links<S: DomainObject>(&self, source: &S, name: &str, keywords: &[Keyword]) -> Result<Links, AppError> {
        let mut links = Links::new();
        if keywords.is_empty() {
            return Ok(links);
        }
        let source_id = self.factory.identify(source)?;
        for keyword in keywords {
            let link = match keyword {
                Keyword::SelfLink => LinkBuilder::build(
                    self.factory.urls(),
                    [source_id.type_.as_str(), source_id.id.as_str(), "relationships", name],
                )?,
                Keyword::Related => LinkBuilder::build(
                    self.factory.urls(),
                    [source_id.type_.as_str(), source_id.id.as_str(), name],
                )?,
                Keyword::Up => {
                    return Err(AppError::InvalidTransition(
                        "'up' is not a relationship link".into(),
                    ))
                }
            };
            links.insert(keyword.as_str().to_string(), link);
        }
        Ok(links)
    }

    /// Links-only relationship (no `data`).
    pub fn resolve_links<S: DomainObject>(&self, source: &S, name: &str, keywords: &[Keyword]) -> Result<Relationship, AppError> {
        self.declared::<S>(name)?;
        Ok(Relationship::links_only(self.relationship_links(source, name, keywords)?))
    }

    pub fn resolve_to_one<S, R, F>(
        &self,
        source: &S,
        name: &str,
        keywords: &[Keyword],
        inclusion: Inclusion,
        lookup: F,
    ) -> Result<ResolvedRelationship, AppError>
    where
        S: DomainObject,
        R: DomainObject,
        F: FnOnce(&S) -> Option<R>,
    {
        self.check::<S, R>(name, RelationshipKind::ToOne)?;
        let links = self.relationship_links(source, name, keywords)?;
        let (linkage, related) = match lookup(source) {
            None => (None, Vec::new()),
            Some(object) => {
                let (identifier, resource) = self.related(&object, inclusion)?;
                (Some(identifier), resource.into_iter().collect())
            }
        };
        Ok(ResolvedRelationship {
            relationship: Relationship::to_one(linkage, links),
            related,
        })
    }

    pub fn resolve_to_many<S, R, F>(
        &self,
        source: &S,
        name: &str,
        keywords: &[Keyword],
        inclusion: Inclusion,
        lookup: F,
    ) -> Result<ResolvedRelationship, AppError>
    where
        S: DomainObject,
        R: DomainObject,
        F: FnOnce(&S) -> Vec<R>,
    {
        self.check::<S, R>(name, RelationshipKind::ToMany)?;
        let links = self.relationship_links(source, name, keywords)?;
        let objects = lookup(source);
        let mut linkage = Vec::with_capacity(objects.len());
        let mut related = Vec::new();
        for object in &objects {
            let (identifier, resource) = self.related(object, inclusion)?;
            linkage.push(identifier);
            related.extend(resource);
        }
        Ok(ResolvedRelationship {
            relationship: Relationship::to_many(linkage, links),
            related,
        })
    }

    fn related<R: DomainObject>(&self, object: &R, inclusion: Inclusion) -> Result<(ResourceIdentifier, Option<Resource>), AppError> {
        match inclusion {
            Inclusion::LinkageOnly => Ok((self.factory.identify(object)?, None)),
            Inclusion::Include => {
                let resource = self.factory.build(object, &[Keyword::SelfLink])?;
                let identifier = resource
                    .identifier()
                    .ok_or_else(|| AppError::MissingIdentity(R::DOMAIN_TYPE.to_string()))?;
                Ok((identifier, Some(resource)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, resolve};
    use crate::document::Linkage;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Article {
        article_id: i64,
        author_id: i64,
        title: String,
    }

    impl DomainObject for Article {
        const DOMAIN_TYPE: &'static str = "Article";
    }

    #[derive(Serialize)]
    struct Person {
        person_id: i64,
        first_name: String,
    }

    impl DomainObject for Person {
        const DOMAIN_TYPE: &'static str = "Person";
    }

    fn model() -> ServiceModel {
        resolve(
            &parse_config(
                r#"{
                "resource_types": [
                    { "domain_type": "Article", "id_property": "article_id", "attributes": ["title"],
                      "relationships": [
                        { "name": "author", "kind": "to_one", "related_type": "Person" },
                        { "name": "contributors", "kind": "to_many", "related_type": "Person" }
                      ] },
                    { "domain_type": "Person", "id_property": "person_id", "attributes": ["first_name"] }
                ]
            }"#,
            )
            .unwrap(),
        )
        .unwrap()
    }

    fn article() -> Article {
        Article {
            article_id: 1,
            author_id: 9,
            title: "JSON:API".into(),
        }
    }

    fn person(id: i64) -> Person {
        Person {
            person_id: id,
            first_name: format!("p{}", id),
        }
    }

    #[test]
    fn test_to_one_include() {
        let model = model();
        let urls = UrlBuilderConfiguration::new("http", "h", None);
        let resolver = RelationshipResolver::new(&model, &urls);
        let resolved = resolver
            .resolve_to_one(&article(), "author", &[Keyword::SelfLink, Keyword::Related], Inclusion::Include, |a| {
                Some(person(a.author_id))
            })
            .unwrap();
        assert_eq!(
            resolved.relationship.to_one_linkage().unwrap(),
            Some(&ResourceIdentifier::new("people", "9"))
        );
        assert_eq!(
            resolved.relationship.link("self").unwrap().href(),
            "http://h/articles/1/relationships/author"
        );
        assert_eq!(resolved.relationship.link("related").unwrap().href(), "http://h/articles/1/author");
        assert_eq!(resolved.related.len(), 1);
        assert_eq!(resolved.related[0].self_link().unwrap().href(), "http://h/people/9");
    }

    #[test]
    fn test_to_one_absent_is_null_linkage() {
        let model = model();
        let urls = UrlBuilderConfiguration::new("http", "h", None);
        let resolver = RelationshipResolver::new(&model, &urls);
        let resolved = resolver
            .resolve_to_one(&article(), "author", &[], Inclusion::Include, |_| None::<Person>)
            .unwrap();
        assert_eq!(resolved.relationship.linkage(), Some(&Linkage::ToOne(None)));
        assert!(resolved.related.is_empty());
    }

    #[test]
    fn test_to_many_keeps_lookup_order() {
        let model = model();
        let urls = UrlBuilderConfiguration::new("http", "h", None);
        let resolver = RelationshipResolver::new(&model, &urls);
        let resolved = resolver
            .resolve_to_many(&article(), "contributors", &[], Inclusion::LinkageOnly, |_| {
                vec![person(2), person(3), person(2)]
            })
            .unwrap();
        let ids: Vec<_> = resolved
            .relationship
            .to_many_linkage()
            .unwrap()
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "3", "2"]);
        assert!(resolved.related.is_empty());
    }

    #[test]
    fn test_undeclared_relationship_fails() {
        let model = model();
        let urls = UrlBuilderConfiguration::new("http", "h", None);
        let resolver = RelationshipResolver::new(&model, &urls);
        let err = resolver
            .resolve_to_one(&article(), "editor", &[], Inclusion::Include, |_| None::<Person>)
            .unwrap_err();
        assert!(matches!(err, AppError::UnresolvedRelationship { .. }));
    }

    #[test]
    fn test_cardinality_mismatch_fails() {
        let model = model();
        let urls = UrlBuilderConfiguration::new("http", "h", None);
        let resolver = RelationshipResolver::new(&model, &urls);
        let err = resolver
            .resolve_to_many(&article(), "author", &[], Inclusion::Include, |_| Vec::<Person>::new())
            .unwrap_err();
        assert!(matches!(err, AppError::RelationshipMismatch(_)));
    }

    #[test]
    fn test_links_only() {
        let model = model();
        let urls = UrlBuilderConfiguration::new("http", "h", None);
        let resolver = RelationshipResolver::new(&model, &urls);
        let relationship = resolver.resolve_links(&article(), "author", &[Keyword::Related]).unwrap();
        assert!(relationship.linkage().is_none());
        assert_eq!(relationship.link("related").unwrap().href(), "http://h/articles/1/author");
    }
}
