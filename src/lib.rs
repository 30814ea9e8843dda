//! Blogging JSON:API: compound document engine plus a blogging hypermedia service built on it.

pub mod case;
pub mod config;
pub mod document;
pub mod domain;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod repository;
pub mod response;
pub mod routes;
pub mod state;

pub use config::{load_from_path, parse_config, resolve, ServerConfig, ServiceModel, ServiceModelConfig};
pub use document::{
    Document, DocumentBuilder, DomainObject, ErrorsDocument, Inclusion, Keyword, JSON_API_MEDIA_TYPE,
    JSON_API_VERSION,
};
pub use domain::blogging_service_model;
pub use error::{AppError, ConfigError};
pub use repository::{BloggingData, BloggingRepository};
pub use routes::{app, blogging_routes, common_routes};
pub use state::AppState;
