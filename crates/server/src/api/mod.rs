//! HTTP API handlers.

pub mod health;
pub mod hooks;
pub mod settings;

pub use health::health;
pub use hooks::{backup_config, cached_page_put, critical_error, update_email};
pub use settings::{settings_get, settings_put, settings_test_mail};

use serde::Serialize;

/// Shared error envelope for API responses.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
