//! Errors documents built from faults, tagged with a correlation id shared with the log line.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Anything that can be reported as a JSON:API error object.
pub trait Fault: fmt::Display {
    /// Short error class name, reported as `title`.
    fn kind(&self) -> &str;
}

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique id: monotonic sequence plus a random suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn generate() -> Self {
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let suffix: u32 = rand::thread_rng().gen();
        Self(format!("{:012x}-{:08x}", sequence, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `id` is unique per error object; `code` carries the correlation id written to the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub id: String,
    pub status: String,
    pub title: String,
    pub detail: String,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorsDocument {
    errors: Vec<ErrorObject>,
}

impl ErrorsDocument {
    /// Unhandled fault: status 500.
    pub fn from_fault<F: Fault + ?Sized>(fault: &F, correlation_id: &CorrelationId) -> Self {
        Self::from_fault_with_status(fault, 500, correlation_id)
    }

    pub fn from_fault_with_status<F: Fault + ?Sized>(fault: &F, status: u16, correlation_id: &CorrelationId) -> Self {
        Self {
            errors: vec![ErrorObject {
                id: Uuid::new_v4().to_string(),
                status: status.to_string(),
                title: fault.kind().to_string(),
                detail: fault.to_string(),
                code: correlation_id.to_string(),
            }],
        }
    }

    pub fn errors(&self) -> &[ErrorObject] {
        &self.errors
    }
}

/// Fault raised from a caught panic.
#[derive(Debug)]
pub struct PanicFault {
    message: String,
}

impl PanicFault {
    pub fn from_payload(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic".to_string()
        };
        Self { message }
    }
}

impl fmt::Display for PanicFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Fault for PanicFault {
    fn kind(&self) -> &str {
        "InternalError"
    }
}
