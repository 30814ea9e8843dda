pub mod builder;
pub mod errors;
pub mod included;
pub mod link;
pub mod reader;
pub mod relationship;
pub mod resource;
pub mod types;

pub use builder::{DocumentBuilder, ResourceScope};
pub use errors::{CorrelationId, ErrorObject, ErrorsDocument, Fault, PanicFault};
pub use included::IncludedSet;
pub use link::{Keyword, LinkBuilder, UrlBuilderConfiguration};
pub use reader::{read_resource, read_to_one_id};
pub use relationship::{Inclusion, RelationshipResolver, ResolvedRelationship};
pub use resource::{DomainObject, ResourceFactory};
pub use types::*;
