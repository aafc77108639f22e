//! Typed hook bus for host lifecycle events.
//!
//! The host's event-name-keyed callback registration becomes an explicit
//! observer interface: components register against typed slots at process
//! start, and dispatch walks the registered handlers in order.

use std::collections::HashSet;
use std::sync::Arc;

use wartung_core::{CriticalError, RenderedPage, UpdateEmail, UpdateOutcome};

/// Filter hook for the update-completion email. Each registered hook
/// receives the payload (possibly already rewritten by earlier hooks) and
/// returns it.
pub trait UpdateEmailHook: Send + Sync {
    fn filter(&self, email: UpdateEmail, outcome: &UpdateOutcome) -> UpdateEmail;
}

/// Terminal renderer for critical errors. Invoked once per fatal error;
/// request processing halts after the returned page.
#[async_trait::async_trait]
pub trait ErrorRenderer: Send + Sync {
    async fn render(&self, error: &CriticalError) -> RenderedPage;
}

/// Action hook fired on the backup integration's configuration event.
#[async_trait::async_trait]
pub trait BackupConfigHook: Send + Sync {
    async fn configure(&self, modules: &ModuleRegistry);
}

/// Names of optional host modules present in this deployment. Stands in
/// for the host's plugin-presence check.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    names: HashSet<String>,
}

impl ModuleRegistry {
    pub fn register(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Registry of lifecycle hooks, built once at startup.
#[derive(Default)]
pub struct HookBus {
    update_email: Vec<Arc<dyn UpdateEmailHook>>,
    die_handler: Option<Arc<dyn ErrorRenderer>>,
    backup_config: Vec<Arc<dyn BackupConfigHook>>,
    modules: ModuleRegistry,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_update_email(&mut self, hook: Arc<dyn UpdateEmailHook>) {
        self.update_email.push(hook);
    }

    /// Install the die handler. The last registration wins, matching the
    /// host's filter semantics for handler replacement.
    pub fn set_die_handler(&mut self, renderer: Arc<dyn ErrorRenderer>) {
        self.die_handler = Some(renderer);
    }

    pub fn on_backup_config(&mut self, hook: Arc<dyn BackupConfigHook>) {
        self.backup_config.push(hook);
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// Run the update-email payload through all registered filters in
    /// registration order.
    pub fn apply_update_email(&self, email: UpdateEmail, outcome: &UpdateOutcome) -> UpdateEmail {
        self.update_email
            .iter()
            .fold(email, |payload, hook| hook.filter(payload, outcome))
    }

    /// Resolve the installed die handler, if any.
    pub fn die_renderer(&self) -> Option<Arc<dyn ErrorRenderer>> {
        self.die_handler.clone()
    }

    /// Fire all backup-config hooks. Fire-and-forget: hooks log their own
    /// failures and nothing is returned to the caller.
    pub async fn fire_backup_config(&self) {
        for hook in &self.backup_config {
            hook.configure(&self.modules).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SuffixHook(&'static str);

    impl UpdateEmailHook for SuffixHook {
        fn filter(&self, mut email: UpdateEmail, _outcome: &UpdateOutcome) -> UpdateEmail {
            email.subject.push_str(self.0);
            email
        }
    }

    fn email(subject: &str) -> UpdateEmail {
        UpdateEmail {
            to: None,
            subject: subject.to_string(),
            body: String::new(),
            update_type: None,
        }
    }

    #[test]
    fn filters_run_in_registration_order() {
        let mut bus = HookBus::new();
        bus.on_update_email(Arc::new(SuffixHook("-a")));
        bus.on_update_email(Arc::new(SuffixHook("-b")));

        let out = bus.apply_update_email(email("s"), &UpdateOutcome { success: true });
        assert_eq!(out.subject, "s-a-b");
    }

    #[test]
    fn no_filters_passes_payload_through() {
        let bus = HookBus::new();
        let out = bus.apply_update_email(email("unchanged"), &UpdateOutcome { success: false });
        assert_eq!(out.subject, "unchanged");
    }

    #[tokio::test]
    async fn die_handler_last_registration_wins() {
        use wartung_core::PageBranch;

        struct FixedPage(&'static str);

        #[async_trait::async_trait]
        impl ErrorRenderer for FixedPage {
            async fn render(&self, _error: &CriticalError) -> RenderedPage {
                RenderedPage {
                    title: self.0.to_string(),
                    html: String::new(),
                    branch: PageBranch::Diagnostic,
                }
            }
        }

        let mut bus = HookBus::new();
        bus.set_die_handler(Arc::new(FixedPage("first")));
        bus.set_die_handler(Arc::new(FixedPage("second")));

        let renderer = bus.die_renderer().unwrap();
        let page = renderer
            .render(&CriticalError {
                message: "m".to_string(),
                title: "t".to_string(),
                args: serde_json::Map::new(),
            })
            .await;
        assert_eq!(page.title, "second");
    }

    #[test]
    fn module_registry_lookup() {
        let mut bus = HookBus::new();
        assert!(!bus.modules().contains("tresor"));
        bus.modules_mut().register("tresor");
        assert!(bus.modules().contains("tresor"));
    }
}
