//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Web Server                         │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                    │
//! │       │                                                                 │
//! │       ├── ValidationError (form fields)      ──┐                       │
//! │       ├── CoreError (cart, stock)            ──┼──► ApiError           │
//! │       └── DbError (sqlx, Domain(CoreError))  ──┘      │                 │
//! │                                                       ▼                 │
//! │                            HTTP status + { "code", "message" }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database failures are logged with their details and reported to the client
//! with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pharmacy_core::{CoreError, ValidationError};
use pharmacy_db::DbError;
use serde::Serialize;
use tracing::{error, warn};

/// Error body returned by every failing endpoint.
///
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Paracetamol 500mg: available 3, requested 5"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// Stable code a client can branch on; the HTTP status follows from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,

    /// Cart payload missing or empty (400)
    EmptyCart,

    /// Not enough stock to bill the cart (409)
    InsufficientStock,

    /// Unique value already taken (409)
    Duplicate,

    /// The database failed; details are logged, not returned.
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::EmptyCart => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock | ErrorCode::Duplicate => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// `404 NOT_FOUND` with `"<resource> not found: <id>"`.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            warn!(code = ?self.code, message = %self.message, "Request rejected");
        }
        (status, Json(self)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Duplicate { .. } => {
                ApiError::new(ErrorCode::Duplicate, err.to_string())
            }
            _ => ApiError::validation(err.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MedicineNotFound(_) => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, err.to_string()),
            CoreError::CartTooLarge { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Duplicate,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Domain(e) => e.into(),
            other => {
                let public = match other {
                    DbError::ConnectionFailed(_) => "Database connection failed",
                    DbError::MigrationFailed(_) => "Database migration failed",
                    DbError::TransactionFailed(_) => "Database transaction failed",
                    DbError::PoolExhausted => "Database is busy, try again",
                    _ => "Database operation failed",
                };
                // Details stay in the log
                error!(error = %other, "{}", public);
                ApiError::new(ErrorCode::DatabaseError, public)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorCode::NotFound, StatusCode::NOT_FOUND),
            (ErrorCode::ValidationError, StatusCode::BAD_REQUEST),
            (ErrorCode::EmptyCart, StatusCode::BAD_REQUEST),
            (ErrorCode::InsufficientStock, StatusCode::CONFLICT),
            (ErrorCode::Duplicate, StatusCode::CONFLICT),
            (ErrorCode::DatabaseError, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            assert_eq!(code.status(), status);
        }
    }

    #[test]
    fn test_domain_error_unwrapped() {
        let err: ApiError = DbError::Domain(CoreError::InsufficientStock {
            name: "ORS".to_string(),
            available: 1,
            requested: 2,
        })
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("ORS"));
    }

    #[test]
    fn test_query_failure_hides_details() {
        let err: ApiError =
            DbError::QueryFailed("CHECK constraint failed: stock_quantity >= 0".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(ApiError::new(ErrorCode::EmptyCart, "Cart is empty")).unwrap();
        assert_eq!(json["code"], "EMPTY_CART");
        assert_eq!(json["message"], "Cart is empty");
    }
}
