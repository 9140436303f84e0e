use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Path and body disagree on which product is being updated
    #[error("Path id {path_id} does not match body id {body_id}")]
    IdentityMismatch { path_id: i32, body_id: i32 },

    #[error("Product {0} not found")]
    NotFound(i32),

    /// The row changed between the caller's read and this write
    #[error("Product {0} was modified concurrently")]
    Conflict(i32),

    #[error("Store error: {0}")]
    Store(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

impl From<sea_orm::DbErr> for InventoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            // unknown type_id or product_id
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(msg)) => {
                InventoryError::Validation(msg)
            }
            _ => InventoryError::Store(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for InventoryError {
    fn from(err: validator::ValidationErrors) -> Self {
        InventoryError::Validation(err.to_string())
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Validation(msg) => AppError::BadRequest(msg),
            mismatch @ InventoryError::IdentityMismatch { .. } => {
                AppError::BadRequest(mismatch.to_string())
            }
            not_found @ InventoryError::NotFound(_) => AppError::NotFound(not_found.to_string()),
            conflict @ InventoryError::Conflict(_) => AppError::Conflict(conflict.to_string()),
            InventoryError::Store(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
