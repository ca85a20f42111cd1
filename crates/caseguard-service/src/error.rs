use thiserror::Error;

use crate::auth::decision::DenyDiagnostics;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] caseguard_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] caseguard_core::error::CoreError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Forbidden: {}", .0.message)]
    Forbidden(Box<DenyDiagnostics>),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
