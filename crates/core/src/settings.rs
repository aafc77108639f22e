//! The persisted maintenance-settings record.

use serde::{Deserialize, Serialize};

/// Store key the settings record is persisted under.
pub const SETTINGS_KEY: &str = "update-maintain";

/// Recipient addresses and behavioral toggles for update maintenance.
///
/// Every read resolves to a complete record: fields absent from the stored
/// JSON fill from defaults, and saves always replace the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintainSettings {
    /// Recipient for failed-update notices and critical-error reports.
    pub error_mail: String,
    /// Recipient for warning-status notices.
    pub warning_mail: String,
    /// Recipient for successful-update notices.
    pub success_mail: String,
    /// Address pushed into the backup integration's own settings.
    pub backup_mail: String,
    /// When false, successful updates produce no mail at all.
    pub send_success_mail: bool,
    /// When true, visitors get a cached or generic error page instead of
    /// the diagnostic page, and no error mail is sent.
    pub prevent_critical_error_page_from_user: bool,
}
