//! Staged document assembly.
//!
//! A document is built forward only: optional `jsonapi` version, optional top-level links,
//! primary data (one resource, a collection or null), then optional included resources.
//! Each section is opened and closed explicitly; anything left open makes `finish` fail
//! with `IncompleteDocument`, and calls out of order fail with `InvalidTransition`.
//!
//! ```ignore
//! let mut builder = DocumentBuilder::new(&model, &request_url)?;
//! builder.set_jsonapi_version(JSON_API_VERSION)?.links()?.add_self_link()?.end_links()?;
//! let mut scope = builder.resource(&article)?;
//! scope
//!     .relationships()?
//!     .add_to_one("author", &[Keyword::Related], Inclusion::Include, |a| people.get(a.author_id))?
//!     .end_relationships()?
//!     .links()?
//!     .add_self_link()?
//!     .end_links()?;
//! scope.end()?;
//! let document = builder.finish()?;
//! ```

use crate::config::ServiceModel;
use crate::document::included::IncludedSet;
use crate::document::link::{Keyword, LinkBuilder, UrlBuilderConfiguration};
use crate::document::relationship::{Inclusion, RelationshipResolver};
use crate::document::resource::{DomainObject, ResourceDraft, ResourceFactory};
use crate::document::{
    Document, JsonApiObject, Link, Links, PrimaryData, Relationship, Resource, ResourceIdentifier,
};
use crate::error::AppError;
use std::collections::HashSet;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Start,
    TopLevelLinks,
    PrimaryData,
    Included,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpenScope {
    Links,
    PrimaryData,
    Included,
    IncludedResources,
}

impl OpenScope {
    fn name(self) -> &'static str {
        match self {
            OpenScope::Links => "top-level links",
            OpenScope::PrimaryData => "primary data",
            OpenScope::Included => "included",
            OpenScope::IncludedResources => "included resources",
        }
    }
}

pub struct DocumentBuilder<'m> {
    model: &'m ServiceModel,
    urls: UrlBuilderConfiguration,
    request_url: Url,
    stage: Stage,
    open: Vec<OpenScope>,
    version: Option<String>,
    links: Links,
    data: Option<PrimaryData>,
    primary_ids: HashSet<ResourceIdentifier>,
    included: IncludedSet,
    verify_linkage: bool,
}

impl<'m> DocumentBuilder<'m> {
    /// Links in the document are rooted at the scheme, host and port of `request_url`.
    pub fn new(model: &'m ServiceModel, request_url: &Url) -> Result<Self, AppError> {
        Ok(Self {
            model,
            urls: UrlBuilderConfiguration::from_url(request_url)?,
            request_url: request_url.clone(),
            stage: Stage::Start,
            open: Vec::new(),
            version: None,
            links: Links::new(),
            data: None,
            primary_ids: HashSet::new(),
            included: IncludedSet::new(),
            verify_linkage: false,
        })
    }

    /// Reject, at `finish`, linkage that points at resources absent from the document.
    pub fn verify_linkage(mut self, enabled: bool) -> Self {
        self.verify_linkage = enabled;
        self
    }

    fn invalid(&self, operation: &str) -> AppError {
        let open = self.open.last().map(|s| s.name()).unwrap_or("nothing");
        AppError::InvalidTransition(format!(
            "{} at stage {:?} with {} open",
            operation, self.stage, open
        ))
    }

    fn require(&self, allowed: bool, operation: &str) -> Result<(), AppError> {
        if allowed {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn top_is(&self, scope: OpenScope) -> bool {
        self.open.last() == Some(&scope)
    }

    pub fn set_jsonapi_version(&mut self, version: &str) -> Result<&mut Self, AppError> {
        self.require(
            self.stage == Stage::Start && self.open.is_empty() && self.version.is_none(),
            "set_jsonapi_version",
        )?;
        self.version = Some(version.to_string());
        Ok(self)
    }

    pub fn links(&mut self) -> Result<&mut Self, AppError> {
        self.require(self.stage == Stage::Start && self.open.is_empty(), "links")?;
        self.stage = Stage::TopLevelLinks;
        self.open.push(OpenScope::Links);
        Ok(self)
    }

    /// `self`: the request URL.
    pub fn add_self_link(&mut self) -> Result<&mut Self, AppError> {
        self.require(self.top_is(OpenScope::Links), "add_self_link")?;
        let mut url = self.request_url.clone();
        url.set_fragment(None);
        self.links.insert(Keyword::SelfLink.as_str().to_string(), Link::new(url.to_string()));
        Ok(self)
    }

    /// `up`: the request path minus its last segment. Omitted at the root.
    pub fn add_up_link(&mut self) -> Result<&mut Self, AppError> {
        self.require(self.top_is(OpenScope::Links), "add_up_link")?;
        if self.request_url.path() == "/" {
            tracing::trace!("no up link at root");
            return Ok(self);
        }
        let mut url = self.request_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| AppError::InvalidConfiguration(format!("{} has no path", self.request_url)))?
            .pop_if_empty()
            .pop();
        self.links.insert(Keyword::Up.as_str().to_string(), Link::new(url.to_string()));
        Ok(self)
    }

    pub fn add_link(&mut self, name: &str, link: Link) -> Result<&mut Self, AppError> {
        self.require(self.top_is(OpenScope::Links), "add_link")?;
        self.links.insert(name.to_string(), link);
        Ok(self)
    }

    pub fn end_links(&mut self) -> Result<&mut Self, AppError> {
        self.require(self.top_is(OpenScope::Links), "end_links")?;
        self.open.pop();
        Ok(self)
    }

    fn begin_primary(&mut self, operation: &str) -> Result<(), AppError> {
        self.require(self.stage <= Stage::TopLevelLinks && self.open.is_empty(), operation)?;
        self.stage = Stage::PrimaryData;
        Ok(())
    }

    fn drafts<'b, T: DomainObject>(&self, objects: &[&'b T]) -> Result<Vec<ResourceDraft>, AppError> {
        let factory = ResourceFactory::new(self.model, &self.urls);
        objects.iter().map(|object| factory.draft(*object)).collect()
    }

    /// Single primary resource.
    pub fn resource<'b, T: DomainObject>(&'b mut self, object: &'b T) -> Result<ResourceScope<'b, 'm, T>, AppError> {
        self.begin_primary("resource")?;
        let objects = vec![object];
        let drafts = self.drafts(&objects)?;
        self.primary_scope(objects, drafts, Role::Single)
    }

    pub fn resource_collection<'b, T: DomainObject>(
        &'b mut self,
        objects: &'b [T],
    ) -> Result<ResourceScope<'b, 'm, T>, AppError> {
        self.begin_primary("resource_collection")?;
        let objects: Vec<&T> = objects.iter().collect();
        let drafts = self.drafts(&objects)?;
        self.primary_scope(objects, drafts, Role::Collection)
    }

    fn primary_scope<'b, T: DomainObject>(
        &'b mut self,
        objects: Vec<&'b T>,
        drafts: Vec<ResourceDraft>,
        role: Role,
    ) -> Result<ResourceScope<'b, 'm, T>, AppError> {
        let pending: HashSet<_> = drafts.iter().filter_map(ResourceDraft::identifier).collect();
        self.primary_ids.extend(pending.iter().cloned());
        self.open.push(OpenScope::PrimaryData);
        Ok(ResourceScope {
            builder: self,
            objects,
            drafts,
            pending,
            deferred: Vec::new(),
            role,
            section: Section::Open,
        })
    }

    /// `data: null`.
    pub fn null_resource(&mut self) -> Result<&mut Self, AppError> {
        self.begin_primary("null_resource")?;
        self.data = Some(PrimaryData::Null);
        Ok(self)
    }

    pub fn included(&mut self) -> Result<&mut Self, AppError> {
        let has_resources = matches!(
            self.data,
            Some(PrimaryData::Resource(_)) | Some(PrimaryData::Collection(_))
        );
        self.require(
            self.stage == Stage::PrimaryData && self.open.is_empty() && has_resources,
            "included",
        )?;
        self.stage = Stage::Included;
        self.open.push(OpenScope::Included);
        Ok(self)
    }

    /// Resources to include, each with its own relationships and links. Objects that are
    /// primary data or already included are skipped.
    pub fn include<'b, R: DomainObject>(&'b mut self, objects: &'b [R]) -> Result<ResourceScope<'b, 'm, R>, AppError> {
        self.require(self.top_is(OpenScope::Included), "include")?;
        let factory = ResourceFactory::new(self.model, &self.urls);
        let mut kept = Vec::new();
        let mut drafts = Vec::new();
        let mut pending = HashSet::new();
        for object in objects {
            let draft = factory.draft(object)?;
            let identifier = draft
                .identifier()
                .ok_or_else(|| AppError::MissingIdentity(R::DOMAIN_TYPE.to_string()))?;
            if self.primary_ids.contains(&identifier)
                || self.included.contains(&identifier)
                || !pending.insert(identifier)
            {
                continue;
            }
            kept.push(object);
            drafts.push(draft);
        }
        self.open.push(OpenScope::IncludedResources);
        Ok(ResourceScope {
            builder: self,
            objects: kept,
            drafts,
            pending,
            deferred: Vec::new(),
            role: Role::Included,
            section: Section::Open,
        })
    }

    pub fn end_included(&mut self) -> Result<&mut Self, AppError> {
        self.require(self.top_is(OpenScope::Included), "end_included")?;
        self.open.pop();
        Ok(self)
    }

    pub fn finish(self) -> Result<Document, AppError> {
        if let Some(scope) = self.open.last() {
            return Err(AppError::IncompleteDocument(format!("{} not closed", scope.name())));
        }
        let data = self
            .data
            .ok_or_else(|| AppError::IncompleteDocument("primary data never set".into()))?;
        let included = self.included.into_resources();
        if self.verify_linkage {
            verify_linkage(&data, &included)?;
        }
        let document = Document::from_parts(
            self.version.map(|version| JsonApiObject { version }),
            self.links,
            data,
            included,
        );
        tracing::debug!(
            resource_type = primary_type(&document),
            primary = document.resources().len(),
            included = document.included().len(),
            "document finalized"
        );
        Ok(document)
    }
}

/// Type of the primary data, `null` for `data: null`.
fn primary_type(document: &Document) -> &str {
    document.resources().first().map(Resource::type_name).unwrap_or("null")
}

/// Every identifier in every relationship must name a resource in the document.
fn verify_linkage(data: &PrimaryData, included: &[Resource]) -> Result<(), AppError> {
    let present: HashSet<ResourceIdentifier> = data
        .resources()
        .iter()
        .chain(included)
        .filter_map(Resource::identifier)
        .collect();
    for resource in data.resources().iter().chain(included) {
        for relationship in resource.relationships().values() {
            for identifier in relationship.identifiers() {
                if !present.contains(identifier) {
                    return Err(AppError::DanglingLinkage {
                        type_: identifier.type_.clone(),
                        id: identifier.id.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Single,
    Collection,
    Included,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Open,
    Relationships,
    RelationshipsClosed,
    Links,
    LinksClosed,
}

/// Open scope over one or more resources of the same domain type. Relationships and links
/// added here apply to every resource in the scope. Must be closed with `end`.
pub struct ResourceScope<'b, 'm, T: DomainObject> {
    builder: &'b mut DocumentBuilder<'m>,
    objects: Vec<&'b T>,
    drafts: Vec<ResourceDraft>,
    /// Identities in this scope; relationship targets matching them are not included again.
    pending: HashSet<ResourceIdentifier>,
    /// Related resources of included scopes, registered after the scope's own resources.
    deferred: Vec<Resource>,
    role: Role,
    section: Section,
}

impl<'b, 'm, T: DomainObject> ResourceScope<'b, 'm, T> {
    fn require(&self, allowed: bool, operation: &str) -> Result<(), AppError> {
        if allowed {
            Ok(())
        } else {
            Err(AppError::InvalidTransition(format!(
                "{} on {} resource scope at {:?}",
                operation,
                T::DOMAIN_TYPE,
                self.section
            )))
        }
    }

    pub fn relationships(&mut self) -> Result<&mut Self, AppError> {
        self.require(self.section == Section::Open, "relationships")?;
        self.section = Section::Relationships;
        Ok(self)
    }

    /// Links-only relationship.
    pub fn add_relationship(&mut self, name: &str, links: &[Keyword]) -> Result<&mut Self, AppError> {
        self.require(self.section == Section::Relationships, "add_relationship")?;
        let resolver = RelationshipResolver::new(self.builder.model, &self.builder.urls);
        for (object, draft) in self.objects.iter().zip(self.drafts.iter_mut()) {
            let relationship = resolver.resolve_links(*object, name, links)?;
            insert_relationship(draft, name, relationship)?;
        }
        Ok(self)
    }

    pub fn add_to_one<R, F>(
        &mut self,
        name: &str,
        links: &[Keyword],
        inclusion: Inclusion,
        mut lookup: F,
    ) -> Result<&mut Self, AppError>
    where
        R: DomainObject,
        F: FnMut(&T) -> Option<R>,
    {
        self.require(self.section == Section::Relationships, "add_to_one")?;
        let mut related = Vec::new();
        {
            let resolver = RelationshipResolver::new(self.builder.model, &self.builder.urls);
            for (object, draft) in self.objects.iter().zip(self.drafts.iter_mut()) {
                let resolved = resolver.resolve_to_one(*object, name, links, inclusion, |s| lookup(s))?;
                insert_relationship(draft, name, resolved.relationship)?;
                related.extend(resolved.related);
            }
        }
        self.register_related(related)?;
        Ok(self)
    }

    pub fn add_to_many<R, F>(
        &mut self,
        name: &str,
        links: &[Keyword],
        inclusion: Inclusion,
        mut lookup: F,
    ) -> Result<&mut Self, AppError>
    where
        R: DomainObject,
        F: FnMut(&T) -> Vec<R>,
    {
        self.require(self.section == Section::Relationships, "add_to_many")?;
        let mut related = Vec::new();
        {
            let resolver = RelationshipResolver::new(self.builder.model, &self.builder.urls);
            for (object, draft) in self.objects.iter().zip(self.drafts.iter_mut()) {
                let resolved = resolver.resolve_to_many(*object, name, links, inclusion, |s| lookup(s))?;
                insert_relationship(draft, name, resolved.relationship)?;
                related.extend(resolved.related);
            }
        }
        self.register_related(related)?;
        Ok(self)
    }

    fn register_related(&mut self, related: Vec<Resource>) -> Result<(), AppError> {
        for resource in related {
            let identifier = resource
                .identifier()
                .ok_or_else(|| AppError::MissingIdentity(resource.type_name().to_string()))?;
            if self.builder.primary_ids.contains(&identifier) || self.pending.contains(&identifier) {
                continue;
            }
            if self.role == Role::Included {
                self.deferred.push(resource);
            } else {
                self.builder.included.register(resource)?;
            }
        }
        Ok(())
    }

    pub fn end_relationships(&mut self) -> Result<&mut Self, AppError> {
        self.require(self.section == Section::Relationships, "end_relationships")?;
        self.section = Section::RelationshipsClosed;
        Ok(self)
    }

    pub fn links(&mut self) -> Result<&mut Self, AppError> {
        self.require(
            matches!(self.section, Section::Open | Section::RelationshipsClosed),
            "links",
        )?;
        self.section = Section::Links;
        Ok(self)
    }

    fn add_resource_link(&mut self, keyword: Keyword) -> Result<&mut Self, AppError> {
        self.require(self.section == Section::Links, keyword.as_str())?;
        let factory = ResourceFactory::new(self.builder.model, &self.builder.urls);
        for draft in &mut self.drafts {
            let link = factory.resource_link(&draft.type_name, draft.id.as_deref(), keyword)?;
            draft.links.insert(keyword.as_str().to_string(), link);
        }
        Ok(self)
    }

    /// `/{type}/{id}` on every resource in the scope.
    pub fn add_self_link(&mut self) -> Result<&mut Self, AppError> {
        self.add_resource_link(Keyword::SelfLink)
    }

    pub fn add_up_link(&mut self) -> Result<&mut Self, AppError> {
        self.add_resource_link(Keyword::Up)
    }

    /// Named link rooted at the document's host, the same for every resource in the scope.
    pub fn add_link<I, S>(&mut self, name: &str, segments: I) -> Result<&mut Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.require(self.section == Section::Links, "add_link")?;
        let link = LinkBuilder::build(&self.builder.urls, segments)?;
        for draft in &mut self.drafts {
            draft.links.insert(name.to_string(), link.clone());
        }
        Ok(self)
    }

    pub fn end_links(&mut self) -> Result<&mut Self, AppError> {
        self.require(self.section == Section::Links, "end_links")?;
        self.section = Section::LinksClosed;
        Ok(self)
    }

    /// Freeze the resources and hand them to the document.
    pub fn end(mut self) -> Result<(), AppError> {
        if matches!(self.section, Section::Relationships | Section::Links) {
            return Err(AppError::IncompleteDocument(format!(
                "{} resource scope ended with {:?} open",
                T::DOMAIN_TYPE,
                self.section
            )));
        }
        let resources: Vec<Resource> = std::mem::take(&mut self.drafts)
            .into_iter()
            .map(ResourceDraft::into_resource)
            .collect();
        match self.role {
            Role::Single => {
                let resource = resources
                    .into_iter()
                    .next()
                    .ok_or_else(|| AppError::Internal("single resource scope is empty".into()))?;
                self.builder.data = Some(PrimaryData::Resource(Box::new(resource)));
            }
            Role::Collection => {
                self.builder.data = Some(PrimaryData::Collection(resources));
            }
            Role::Included => {
                for resource in resources.into_iter().chain(std::mem::take(&mut self.deferred)) {
                    self.builder.included.register(resource)?;
                }
            }
        }
        self.builder.open.pop();
        Ok(())
    }
}

fn insert_relationship(draft: &mut ResourceDraft, name: &str, relationship: Relationship) -> Result<(), AppError> {
    if draft.relationships.contains_key(name) {
        return Err(AppError::InvalidTransition(format!(
            "relationship '{}' already added to {}",
            name, draft.type_name
        )));
    }
    draft.relationships.insert(name.to_string(), relationship);
    Ok(())
}
