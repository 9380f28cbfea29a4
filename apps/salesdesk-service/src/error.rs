//! # Service Error Type
//!
//! Unified error type for sale commands and queries.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in SalesDesk                              │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, ServiceError>                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command invalid? ──── ValidationReport ─────────┐                     │
//! │         │                                        │                     │
//! │         ▼                                        ▼                     │
//! │  Rule broken? ──────── DomainError ───────── ServiceError ──► caller   │
//! │         │                                        ▲                     │
//! │         ▼                                        │                     │
//! │  Storage failed? ───── DbError ──────────────────┘                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ──────────────────────────────────────────────────► caller    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage details are logged, never returned: callers only see a generic
//! database message.

use serde::Serialize;
use tracing::{error, warn};

use salesdesk_core::{DomainError, ValidationReport};
use salesdesk_db::DbError;

/// Error returned from sale commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "BUSINESS_RULE",
///   "message": "Sale 5f0c… is cancelled, cannot add items",
///   "reason": "SALE_CANCELLED"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Domain reason code, present for `BUSINESS_RULE` errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Sale not found (404)
    NotFound,

    /// Command failed validation (400)
    ValidationError,

    /// The aggregate refused the operation (422)
    BusinessRule,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ServiceError {
    /// Creates a new service error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
            reason: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ServiceError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to service errors.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ServiceError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                error!("Database migration failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                error!("Database query failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                error!("Foreign key violation: {}", message);
                ServiceError::new(ErrorCode::DatabaseError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ServiceError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::CorruptRow { column, value } => {
                error!(column = %column, value = %value, "Stored sale data is corrupt");
                ServiceError::new(ErrorCode::DatabaseError, "Stored sale data is unreadable")
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts aggregate rule violations to service errors.
impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        let reason = err.kind().as_str();
        warn!(reason, "{}", err);
        ServiceError {
            code: ErrorCode::BusinessRule,
            message: err.to_string(),
            reason: Some(reason),
        }
    }
}

/// Converts a failed validation report to a service error.
impl From<ValidationReport> for ServiceError {
    fn from(report: ValidationReport) -> Self {
        ServiceError::validation(report.message())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Turns a validation report into `Err` when any rule failed.
pub(crate) fn ensure_valid(operation: &str, report: ValidationReport) -> ServiceResult<()> {
    if report.is_valid {
        return Ok(());
    }
    warn!(operation, errors = report.errors.len(), "Command rejected: {}", report.message());
    Err(report.into())
}
