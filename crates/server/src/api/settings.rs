//! Settings record CRUD and mail-transport verification.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use wartung_core::{MaintainSettings, SETTINGS_KEY};
use wartung_notify::Mailer;

use crate::api::ErrorResponse;
use crate::state::AppState;

/// API mirror of the persisted settings record. Missing request fields fill
/// from defaults, so a PUT always persists a complete record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct SettingsPayload {
    pub error_mail: String,
    pub warning_mail: String,
    pub success_mail: String,
    pub backup_mail: String,
    pub send_success_mail: bool,
    pub prevent_critical_error_page_from_user: bool,
}

impl From<MaintainSettings> for SettingsPayload {
    fn from(s: MaintainSettings) -> Self {
        Self {
            error_mail: s.error_mail,
            warning_mail: s.warning_mail,
            success_mail: s.success_mail,
            backup_mail: s.backup_mail,
            send_success_mail: s.send_success_mail,
            prevent_critical_error_page_from_user: s.prevent_critical_error_page_from_user,
        }
    }
}

impl From<SettingsPayload> for MaintainSettings {
    fn from(p: SettingsPayload) -> Self {
        Self {
            error_mail: p.error_mail,
            warning_mail: p.warning_mail,
            success_mail: p.success_mail,
            backup_mail: p.backup_mail,
            send_success_mail: p.send_success_mail,
            prevent_critical_error_page_from_user: p.prevent_critical_error_page_from_user,
        }
    }
}

/// Read the settings record (absent fields resolved to defaults).
#[utoipa::path(
    get,
    path = "/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Current settings record", body = SettingsPayload),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn settings_get(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsPayload>, (axum::http::StatusCode, Json<ErrorResponse>)> {
    let settings: MaintainSettings = state.store.get(SETTINGS_KEY).map_err(|e| {
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to read settings: {}", e),
            }),
        )
    })?;
    Ok(Json(settings.into()))
}

/// Replace the settings record in full.
#[utoipa::path(
    put,
    path = "/settings",
    tag = "Settings",
    request_body = SettingsPayload,
    responses(
        (status = 200, description = "Settings record saved", body = SettingsPayload),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn settings_put(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SettingsPayload>,
) -> Result<Json<SettingsPayload>, (axum::http::StatusCode, Json<ErrorResponse>)> {
    let settings: MaintainSettings = payload.into();
    state.store.put(SETTINGS_KEY, &settings).map_err(|e| {
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to save settings: {}", e),
            }),
        )
    })?;
    Ok(Json(settings.into()))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TestMailRequest {
    pub to: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TestMailResponse {
    pub sent: bool,
    pub transport: String,
}

/// Send a sample message to verify the mail transport.
#[utoipa::path(
    post,
    path = "/settings/test-mail",
    tag = "Settings",
    request_body = TestMailRequest,
    responses(
        (status = 200, description = "Test mail handed to the transport", body = TestMailResponse),
        (status = 502, description = "Transport rejected the message", body = ErrorResponse)
    )
)]
pub async fn settings_test_mail(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TestMailRequest>,
) -> Result<Json<TestMailResponse>, (axum::http::StatusCode, Json<ErrorResponse>)> {
    state.mailer.test(&req.to).await.map_err(|e| {
        (
            axum::http::StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: format!("Test mail failed: {}", e),
            }),
        )
    })?;
    Ok(Json(TestMailResponse {
        sent: true,
        transport: state.mailer.transport_name().to_string(),
    }))
}
