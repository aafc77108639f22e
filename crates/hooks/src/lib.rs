//! Lifecycle hooks for update maintenance.
//!
//! This crate provides:
//! - `HookBus` — typed observer registry for host lifecycle events
//! - Update-completion email routing
//! - Critical-error interception (cached page / generic page / report mail)
//! - Backup-integration recipient sync

pub mod backup;
pub mod bus;
pub mod critical_error;
pub mod update_email;

use std::sync::Arc;

use wartung_notify::Mailer;
use wartung_store::{PageCache, SettingsStore};

pub use backup::{BackupConfigurator, BACKUP_MODULE, BACKUP_SETTINGS_KEY};
pub use bus::{BackupConfigHook, ErrorRenderer, HookBus, ModuleRegistry, UpdateEmailHook};
pub use critical_error::{CriticalErrorHandler, CRITICAL_ERROR_PAGE_KEY};
pub use update_email::{route_update_email, UpdateEmailRouter};

/// Register the maintenance component's handlers on the bus. Called once
/// at process start.
pub fn register_maintain_hooks(
    bus: &mut HookBus,
    store: Arc<SettingsStore>,
    pages: Arc<PageCache>,
    mailer: Arc<dyn Mailer>,
    site_tag: &str,
) {
    bus.on_update_email(Arc::new(UpdateEmailRouter::new(store.clone(), site_tag)));
    bus.set_die_handler(Arc::new(CriticalErrorHandler::new(
        store.clone(),
        pages,
        mailer,
    )));
    bus.on_backup_config(Arc::new(BackupConfigurator::new(store)));
}
