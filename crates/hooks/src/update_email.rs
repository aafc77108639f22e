//! Update-completion email routing.
//!
//! Rewrites the subject with the site marker, a bracketed status tag, and
//! the update-type tag, then picks the recipient from the settings record.

use std::sync::Arc;

use tracing::warn;
use wartung_core::{
    MaintainSettings, UpdateEmail, UpdateOutcome, UpdateStatus, SETTINGS_KEY,
};
use wartung_store::SettingsStore;

use crate::bus::UpdateEmailHook;

/// Update-type tag used when the payload carries none.
const DEFAULT_UPDATE_TYPE: &str = "general";

/// Pick the recipient for a status. `None` means the notice is dropped.
///
/// Update outcomes never derive `Warning` today (they only carry a success
/// flag), so that arm is dead; it stays so every status routes somewhere.
fn recipient_for(status: UpdateStatus, settings: &MaintainSettings) -> Option<String> {
    match status {
        UpdateStatus::Error => Some(settings.error_mail.clone()),
        UpdateStatus::Warning => Some(settings.warning_mail.clone()),
        UpdateStatus::Success => {
            if settings.send_success_mail {
                Some(settings.success_mail.clone())
            } else {
                None
            }
        }
    }
}

/// Rewrite an update-completion payload against a settings record.
///
/// Pure transform: always succeeds and returns the mutated payload for the
/// host to dispatch.
pub fn route_update_email(
    settings: &MaintainSettings,
    site_tag: &str,
    mut email: UpdateEmail,
    outcome: &UpdateOutcome,
) -> UpdateEmail {
    let status = UpdateStatus::from_outcome(outcome);
    let update_type = email
        .update_type
        .clone()
        .unwrap_or_else(|| DEFAULT_UPDATE_TYPE.to_string());

    email.subject = format!(
        "[{}] {} [{}] [{}]",
        site_tag, email.subject, status, update_type
    );
    email.to = recipient_for(status, settings);
    email
}

/// Hook wiring [`route_update_email`] to the settings store. The record is
/// re-read on every event; store failures fall back to defaults.
pub struct UpdateEmailRouter {
    store: Arc<SettingsStore>,
    site_tag: String,
}

impl UpdateEmailRouter {
    pub fn new(store: Arc<SettingsStore>, site_tag: &str) -> Self {
        Self {
            store,
            site_tag: site_tag.to_string(),
        }
    }
}

impl UpdateEmailHook for UpdateEmailRouter {
    fn filter(&self, email: UpdateEmail, outcome: &UpdateOutcome) -> UpdateEmail {
        let settings: MaintainSettings = self.store.get(SETTINGS_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "failed to read settings, routing with defaults");
            MaintainSettings::default()
        });
        route_update_email(&settings, &self.site_tag, email, outcome)
    }
}
