//! Store error taxonomy shared by every repository and service.

use crate::model::validation::ValidationError;
use crate::repo::concurrency::GateRejection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a rejected store operation. No variant leaves partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Payload failed field validation.
    Validation(ValidationError),
    /// No record with this identity.
    NotFound(String),
    /// Natural key already owned by another record.
    Conflict(String),
    /// Record is referenced and deletion was not forced.
    InUse(String),
    /// Version token missing or stale.
    PreconditionFailed(GateRejection),
}

impl StoreError {
    /// HTTP status an outer layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) | Self::InUse(_) => 409,
            Self::PreconditionFailed(_) => 412,
        }
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InUse(_) => "in_use",
            Self::PreconditionFailed(_) => "precondition_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Conflict(key) => write!(f, "`{key}` is already in use"),
            Self::InUse(key) => write!(f, "`{key}` is referenced and cannot be deleted"),
            Self::PreconditionFailed(rejection) => write!(f, "precondition failed: {rejection}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::PreconditionFailed(rejection) => Some(rejection),
            Self::NotFound(_) | Self::Conflict(_) | Self::InUse(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<GateRejection> for StoreError {
    fn from(value: GateRejection) -> Self {
        Self::PreconditionFailed(value)
    }
}
