//! Shared application state.

use std::sync::Arc;

use tracing::{info, warn};
use wartung_core::Config;
use wartung_hooks::{register_maintain_hooks, HookBus};
use wartung_notify::{Mailer, NoopMailer, SmtpMailer};
use wartung_store::{PageCache, SettingsStore};

pub struct AppState {
    pub config: Config,
    pub store: Arc<SettingsStore>,
    pub pages: Arc<PageCache>,
    pub mailer: Arc<dyn Mailer>,
    pub hooks: HookBus,
}

impl AppState {
    /// Build state from config, selecting the SMTP transport when configured
    /// and falling back to the no-op transport otherwise.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let mailer: Arc<dyn Mailer> = if config.smtp.is_configured() {
            let mailer = SmtpMailer::from_config(&config.smtp)?;
            info!("SMTP transport ready");
            Arc::new(mailer)
        } else {
            warn!("SMTP_HOST not set, outbound mail disabled");
            Arc::new(NoopMailer)
        };
        Ok(Self::with_mailer(config, mailer))
    }

    /// Build state with an explicit mail transport (tests inject mocks here).
    pub fn with_mailer(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let store = Arc::new(SettingsStore::new(&config.storage.data_dir));
        let pages = Arc::new(PageCache::new(&config.storage.data_dir));

        let mut hooks = HookBus::new();
        for module in &config.site.modules {
            hooks.modules_mut().register(module);
        }
        register_maintain_hooks(
            &mut hooks,
            store.clone(),
            pages.clone(),
            mailer.clone(),
            &config.site.tag,
        );

        Self {
            config,
            store,
            pages,
            mailer,
            hooks,
        }
    }
}
