//! Lifecycle-event endpoints: the host hands its event payloads in here and
//! receives the mutated value (or the terminal page) back.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use wartung_core::{CriticalError, PageBranch, RenderedPage, UpdateEmail, UpdateOutcome};
use wartung_hooks::{CRITICAL_ERROR_PAGE_KEY, ErrorRenderer as _};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: UpdateEmail,
    pub outcome: UpdateOutcome,
}

/// Run the update-completion payload through the registered filters and
/// return the mutated payload for the host to dispatch.
pub async fn update_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateEmailRequest>,
) -> Json<UpdateEmail> {
    Json(state.hooks.apply_update_email(req.email, &req.outcome))
}

/// Resolve the die handler and render the terminal page for a fatal error.
/// The host emits the returned page and halts its request.
pub async fn critical_error(
    State(state): State<Arc<AppState>>,
    Json(error): Json<CriticalError>,
) -> Json<RenderedPage> {
    match state.hooks.die_renderer() {
        Some(renderer) => Json(renderer.render(&error).await),
        // No handler installed: fall through to the host's own page.
        None => Json(RenderedPage {
            title: error.title.clone(),
            html: error.message.clone(),
            branch: PageBranch::Diagnostic,
        }),
    }
}

/// Fire the backup integration's configuration hooks. Fire-and-forget; the
/// host consumes no return value.
pub async fn backup_config(State(state): State<Arc<AppState>>) -> axum::http::StatusCode {
    state.hooks.fire_backup_config().await;
    axum::http::StatusCode::NO_CONTENT
}

/// Store the pre-rendered critical-error page served to shielded visitors.
pub async fn cached_page_put(
    State(state): State<Arc<AppState>>,
    body: String,
) -> axum::http::StatusCode {
    match state.pages.put(CRITICAL_ERROR_PAGE_KEY, &body) {
        Ok(()) => axum::http::StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::warn!(error = %e, "failed to store cached error page");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
