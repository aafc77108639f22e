//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single `Router`.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::state::AppState;
use crate::{admin, api};

#[derive(OpenApi)]
#[openapi(
    paths(
        api::settings::settings_get,
        api::settings::settings_put,
        api::settings::settings_test_mail,
    ),
    components(schemas(
        api::settings::SettingsPayload,
        api::settings::TestMailRequest,
        api::settings::TestMailResponse,
        api::ErrorResponse,
    )),
    tags((name = "Settings", description = "Update-maintenance settings record"))
)]
struct ApiDoc;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/settings", get(api::settings_get).put(api::settings_put))
        .route("/settings/test-mail", post(api::settings_test_mail))
        .route(
            "/admin/settings",
            get(admin::settings_form).post(admin::settings_save),
        )
        .route("/admin/cached-page", put(api::cached_page_put))
        .route("/hooks/update-email", post(api::update_email))
        .route("/hooks/critical-error", post(api::critical_error))
        .route("/hooks/backup-config", post(api::backup_config))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
