use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    env_opt(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub smtp: SmtpConfig,
    pub site: SiteConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            storage: StorageConfig::from_env(),
            smtp: SmtpConfig::from_env(),
            site: SiteConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server:   port={}", self.server.port);
        tracing::info!("  storage:  data_dir={}", self.storage.data_dir.display());
        tracing::info!(
            "  smtp:     host={}, from={}",
            self.smtp.host.as_deref().unwrap_or("(none)"),
            self.smtp.from
        );
        tracing::info!(
            "  site:     tag={}, modules=[{}]",
            self.site.tag,
            self.site.modules.join(", ")
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 3007),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            data_dir: PathBuf::from(env_or("DATA_DIR", "data")),
        }
    }
}

// ── SMTP transport ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay hostname. Mail dispatch is disabled when unset.
    pub host: Option<String>,
    pub port: u16,
    /// STARTTLS toggle; port 465 always uses implicit TLS.
    pub tls: bool,
    /// Sender address for all outbound mail.
    pub from: String,
}

impl SmtpConfig {
    fn from_env() -> Self {
        Self {
            host: env_opt("SMTP_HOST"),
            port: env_u16("SMTP_PORT", 587),
            tls: env_bool("SMTP_TLS", true),
            from: env_or("SMTP_FROM", "wartung@localhost"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }
}

// ── Site identity ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Marker embedded in rewritten subjects, rendered as `[tag]`.
    pub tag: String,
    /// Optional host modules present in this deployment (comma-separated
    /// in `HOST_MODULES`), e.g. the backup integration.
    pub modules: Vec<String>,
}

impl SiteConfig {
    fn from_env() -> Self {
        Self {
            tag: env_or("SITE_TAG", "site"),
            modules: env_opt("HOST_MODULES")
                .map(|v| {
                    v.split(',')
                        .map(|m| m.trim().to_string())
                        .filter(|m| !m.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
