//! Typed errors and HTTP mapping.

use crate::document::errors::{CorrelationId, ErrorsDocument, Fault};
use crate::response::JsonApi;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("duplicate {kind}: {name}")]
    Duplicate { kind: &'static str, name: String },
    #[error("invalid member name: {0}")]
    InvalidMemberName(String),
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid url configuration: {0}")]
    InvalidConfiguration(String),
    #[error("incomplete document: {0}")]
    IncompleteDocument(String),
    #[error("invalid document transition: {0}")]
    InvalidTransition(String),
    #[error("unresolved relationship '{relationship}' on {domain_type}")]
    UnresolvedRelationship {
        domain_type: String,
        relationship: String,
    },
    #[error("relationship mismatch: {0}")]
    RelationshipMismatch(String),
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
    #[error("resource of type {0} has no identity")]
    MissingIdentity(String),
    #[error("linkage {type_}/{id} does not resolve to a resource in the document")]
    DanglingLinkage { type_: String, id: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::UnresolvedRelationship { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl Fault for AppError {
    fn kind(&self) -> &str {
        match self {
            AppError::Config(_) => "ConfigError",
            AppError::InvalidConfiguration(_) => "InvalidConfigurationError",
            AppError::IncompleteDocument(_) => "IncompleteDocumentError",
            AppError::InvalidTransition(_) => "InvalidTransitionError",
            AppError::UnresolvedRelationship { .. } => "UnresolvedRelationshipError",
            AppError::RelationshipMismatch(_) => "RelationshipMismatchError",
            AppError::UnknownResourceType(_) => "UnknownResourceTypeError",
            AppError::MissingIdentity(_) => "MissingIdentityError",
            AppError::DanglingLinkage { .. } => "DanglingLinkageError",
            AppError::NotFound(_) => "NotFoundFault",
            AppError::BadRequest(_) => "BadRequestError",
            AppError::PayloadTooLarge(_) => "PayloadTooLargeError",
            AppError::Serialization(_) => "SerializationError",
            AppError::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let correlation_id = CorrelationId::generate();
        if status.is_server_error() {
            tracing::error!(correlation_id = %correlation_id, kind = self.kind(), error = %self, "request failed");
        } else {
            tracing::warn!(correlation_id = %correlation_id, kind = self.kind(), error = %self, "request rejected");
        }
        let document = ErrorsDocument::from_fault_with_status(&self, status.as_u16(), &correlation_id);
        (status, JsonApi(document)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound("articles/7".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::UnresolvedRelationship {
                domain_type: "Article".into(),
                relationship: "editor".into()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::IncompleteDocument("links".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_bare() {
        assert_eq!(AppError::Internal("boom".into()).to_string(), "boom");
    }
}
