//! Administrative settings form (HTML, POST-to-self).

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use tracing::warn;
use wartung_core::{MaintainSettings, SETTINGS_KEY};

use crate::state::AppState;

const FORM_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>Update Maintenance Settings</title>
</head>
<body>
  <h1>Update Maintenance</h1>
  {% if saved %}<p class="notice">Settings saved.</p>{% endif %}
  {% if updated_at %}<p class="meta">Last saved: {{ updated_at }}</p>{% endif %}
  <form method="post" action="/admin/settings">
    <p><label>Error mail
      <input type="email" name="error_mail" value="{{ settings.error_mail }}"></label></p>
    <p><label>Warning mail
      <input type="email" name="warning_mail" value="{{ settings.warning_mail }}"></label></p>
    <p><label>Success mail
      <input type="email" name="success_mail" value="{{ settings.success_mail }}"></label></p>
    <p><label>Backup mail
      <input type="email" name="backup_mail" value="{{ settings.backup_mail }}"></label></p>
    <p><label><input type="checkbox" name="send_success_mail"
      {% if settings.send_success_mail %}checked{% endif %}> Send success mail</label></p>
    <p><label><input type="checkbox" name="prevent_critical_error_page_from_user"
      {% if settings.prevent_critical_error_page_from_user %}checked{% endif %}>
      Hide critical error page from visitors</label></p>
    <p><button type="submit">Save</button></p>
  </form>
</body>
</html>
"#;

/// Checkbox fields arrive only when ticked, so they decode as `Option`.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub error_mail: String,
    #[serde(default)]
    pub warning_mail: String,
    #[serde(default)]
    pub success_mail: String,
    #[serde(default)]
    pub backup_mail: String,
    #[serde(default)]
    pub send_success_mail: Option<String>,
    #[serde(default)]
    pub prevent_critical_error_page_from_user: Option<String>,
}

impl From<SettingsForm> for MaintainSettings {
    fn from(f: SettingsForm) -> Self {
        Self {
            error_mail: f.error_mail,
            warning_mail: f.warning_mail,
            success_mail: f.success_mail,
            backup_mail: f.backup_mail,
            send_success_mail: f.send_success_mail.is_some(),
            prevent_critical_error_page_from_user: f
                .prevent_critical_error_page_from_user
                .is_some(),
        }
    }
}

fn render_form(state: &AppState, settings: &MaintainSettings, saved: bool) -> Html<String> {
    let updated_at = state.store.updated_at(SETTINGS_KEY).unwrap_or_default();
    let env = minijinja::Environment::new();
    let html = env
        .render_str(
            FORM_TEMPLATE,
            minijinja::context! {
                settings => settings,
                saved => saved,
                updated_at => updated_at,
            },
        )
        .unwrap_or_else(|e| {
            warn!(error = %e, "settings form template failed");
            "<p>Settings form unavailable.</p>".to_string()
        });
    Html(html)
}

/// Display the settings form with current values bound.
pub async fn settings_form(State(state): State<Arc<AppState>>) -> Html<String> {
    let settings: MaintainSettings = state.store.get(SETTINGS_KEY).unwrap_or_else(|e| {
        warn!(error = %e, "failed to read settings for form, showing defaults");
        MaintainSettings::default()
    });
    render_form(&state, &settings, false)
}

/// Persist the submitted record in full and re-render the form.
pub async fn settings_save(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SettingsForm>,
) -> Html<String> {
    let settings: MaintainSettings = form.into();
    let saved = match state.store.put(SETTINGS_KEY, &settings) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "failed to save settings from form");
            false
        }
    };
    render_form(&state, &settings, saved)
}
