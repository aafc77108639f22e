//! Backup-integration recipient sync.
//!
//! On the backup module's configuration event, its own settings record gets
//! this service's `backup_mail` pushed into its `email` field. Everything
//! else in that record belongs to the module and is preserved.

use std::sync::Arc;

use tracing::{debug, warn};
use wartung_core::{MaintainSettings, SETTINGS_KEY};
use wartung_store::SettingsStore;

use crate::bus::{BackupConfigHook, ModuleRegistry};

/// Name the backup integration registers under when present.
pub const BACKUP_MODULE: &str = "tresor";

/// Store key of the backup integration's own settings record.
pub const BACKUP_SETTINGS_KEY: &str = "tresor";

pub struct BackupConfigurator {
    store: Arc<SettingsStore>,
}

impl BackupConfigurator {
    pub fn new(store: Arc<SettingsStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl BackupConfigHook for BackupConfigurator {
    async fn configure(&self, modules: &ModuleRegistry) {
        if !modules.contains(BACKUP_MODULE) {
            debug!("backup module not present, skipping recipient sync");
            return;
        }

        let settings: MaintainSettings = match self.store.get(SETTINGS_KEY) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to read settings, skipping recipient sync");
                return;
            }
        };

        let mut record = match self.store.get_value(BACKUP_SETTINGS_KEY) {
            Ok(Some(serde_json::Value::Object(map))) => map,
            Ok(Some(other)) => {
                warn!(found = %other, "backup settings record is not an object, replacing");
                serde_json::Map::new()
            }
            Ok(None) => serde_json::Map::new(),
            Err(e) => {
                warn!(error = %e, "failed to read backup settings, leaving store unchanged");
                return;
            }
        };

        record.insert(
            "email".to_string(),
            serde_json::Value::String(settings.backup_mail.clone()),
        );

        if let Err(e) = self
            .store
            .put_value(BACKUP_SETTINGS_KEY, serde_json::Value::Object(record))
        {
            warn!(error = %e, "failed to persist backup settings");
        }
    }
}
