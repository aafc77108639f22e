//! Critical-error interception.
//!
//! Replaces the host's error page flow: visitors get a cached or generic
//! page when the shield toggle is on, otherwise the error is reported to
//! the configured address and the default diagnostic page renders.

use std::sync::Arc;

use tracing::warn;
use wartung_core::{CriticalError, MaintainSettings, PageBranch, RenderedPage, SETTINGS_KEY};
use wartung_notify::{Mailer, OutboundMail, TemplateRenderer};
use wartung_store::{PageCache, SettingsStore};

use crate::bus::ErrorRenderer;

/// Fixed cache key for the pre-rendered critical-error page.
pub const CRITICAL_ERROR_PAGE_KEY: &str = "critical-error";

const MAIL_BODY_TEMPLATE: &str = "Message: {{ message }}\n\nDetails:\n{{ details }}";

const FALLBACK_PAGE_TEMPLATE: &str = "\
<!doctype html>
<html><head><title>{{ title }}</title></head>
<body><h1>{{ title }}</h1><p>An error occurred. Please try again later.</p></body>
</html>
";

const DIAGNOSTIC_PAGE_TEMPLATE: &str = "\
<!doctype html>
<html><head><title>{{ title }}</title></head>
<body><h1>{{ title }}</h1><p>{{ message }}</p></body>
</html>
";

/// Terminal handler for fatal errors. Settings are re-read per invocation;
/// exactly one page is returned per call.
pub struct CriticalErrorHandler {
    store: Arc<SettingsStore>,
    pages: Arc<PageCache>,
    mailer: Arc<dyn Mailer>,
    renderer: TemplateRenderer,
}

impl CriticalErrorHandler {
    pub fn new(store: Arc<SettingsStore>, pages: Arc<PageCache>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            store,
            pages,
            mailer,
            renderer: TemplateRenderer::new(),
        }
    }

    fn render_page(&self, template: &str, title: &str, message: &str) -> String {
        self.renderer
            .render(
                template,
                &serde_json::json!({ "title": title, "message": message }),
            )
            .unwrap_or_else(|e| {
                warn!(error = %e, "page template failed, emitting plain text");
                format!("{title}: {message}")
            })
    }

    fn fallback_page(&self) -> RenderedPage {
        RenderedPage {
            title: "Error".to_string(),
            html: self.render_page(FALLBACK_PAGE_TEMPLATE, "Error", ""),
            branch: PageBranch::Fallback,
        }
    }

    fn diagnostic_page(&self, error: &CriticalError) -> RenderedPage {
        RenderedPage {
            title: error.title.clone(),
            html: self.render_page(DIAGNOSTIC_PAGE_TEMPLATE, &error.title, &error.message),
            branch: PageBranch::Diagnostic,
        }
    }

    /// Mail the error details to the configured address. Failures are
    /// logged and never reach the requester.
    async fn send_report(&self, settings: &MaintainSettings, error: &CriticalError) {
        if settings.error_mail.is_empty() {
            warn!("no error_mail configured, skipping critical-error report");
            return;
        }

        let details = serde_json::to_string_pretty(&error.args)
            .unwrap_or_else(|_| "(unprintable)".to_string());
        let body = match self.renderer.render(
            MAIL_BODY_TEMPLATE,
            &serde_json::json!({ "message": error.message, "details": details }),
        ) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "mail body template failed, sending raw message");
                error.message.clone()
            }
        };

        let mail = OutboundMail {
            to: settings.error_mail.clone(),
            subject: format!("[Critical Error] {}", error.title),
            body,
        };
        if let Err(e) = self.mailer.send(&mail).await {
            warn!(error = %e, to = %mail.to, "critical-error report not delivered");
        }
    }
}

#[async_trait::async_trait]
impl ErrorRenderer for CriticalErrorHandler {
    async fn render(&self, error: &CriticalError) -> RenderedPage {
        let settings: MaintainSettings = self.store.get(SETTINGS_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "failed to read settings, handling error with defaults");
            MaintainSettings::default()
        });

        if settings.prevent_critical_error_page_from_user {
            // Shielded: serve the cached rendition when one exists, the
            // generic page otherwise. No mail in either case.
            match self.pages.get(CRITICAL_ERROR_PAGE_KEY) {
                Ok(Some(html)) => {
                    return RenderedPage {
                        title: error.title.clone(),
                        html,
                        branch: PageBranch::Cached,
                    };
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "page cache lookup failed, treating as miss");
                }
            }
            return self.fallback_page();
        }

        self.send_report(&settings, error).await;
        self.diagnostic_page(error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use wartung_notify::NotifyError;

    use super::*;

    /// Records every send; optionally fails.
    struct MockMailer {
        sent: Mutex<Vec<OutboundMail>>,
        should_fail: bool,
    }

    impl MockMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                should_fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                should_fail: true,
            }
        }
    }

    #[async_trait::async_trait]
    impl Mailer for MockMailer {
        async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(mail.clone());
            if self.should_fail {
                Err(NotifyError::Smtp("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
        fn transport_name(&self) -> &str {
            "mock"
        }
    }

    struct Fixture {
        _tmp: tempfile::TempDir,
        store: Arc<SettingsStore>,
        pages: Arc<PageCache>,
        mailer: Arc<MockMailer>,
        handler: CriticalErrorHandler,
    }

    fn fixture(mailer: MockMailer) -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(SettingsStore::new(tmp.path()));
        let pages = Arc::new(PageCache::new(tmp.path()));
        let mailer = Arc::new(mailer);
        let handler =
            CriticalErrorHandler::new(store.clone(), pages.clone(), mailer.clone());
        Fixture {
            _tmp: tmp,
            store,
            pages,
            mailer,
            handler,
        }
    }

    fn save_settings(fx: &Fixture, prevent: bool) {
        fx.store
            .put(
                SETTINGS_KEY,
                &MaintainSettings {
                    error_mail: "err@example.com".to_string(),
                    prevent_critical_error_page_from_user: prevent,
                    ..MaintainSettings::default()
                },
            )
            .unwrap();
    }

    fn error() -> CriticalError {
        let mut args = serde_json::Map::new();
        args.insert("response".to_string(), serde_json::json!(500));
        CriticalError {
            message: "database connection refused".to_string(),
            title: "Database Error".to_string(),
            args,
        }
    }

    #[tokio::test]
    async fn shielded_without_cache_serves_generic_page() {
        let fx = fixture(MockMailer::new());
        save_settings(&fx, true);

        let page = fx.handler.render(&error()).await;
        assert_eq!(page.branch, PageBranch::Fallback);
        assert!(page.html.contains("try again later"));
        assert!(fx.mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn shielded_with_cache_serves_cached_rendition_verbatim() {
        let fx = fixture(MockMailer::new());
        save_settings(&fx, true);
        let cached = "<html><body>maintenance window</body></html>";
        fx.pages.put(CRITICAL_ERROR_PAGE_KEY, cached).unwrap();

        let page = fx.handler.render(&error()).await;
        assert_eq!(page.branch, PageBranch::Cached);
        assert_eq!(page.html, cached);
        assert!(fx.mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unshielded_sends_one_report_and_diagnostic_page() {
        let fx = fixture(MockMailer::new());
        save_settings(&fx, false);

        let page = fx.handler.render(&error()).await;
        assert_eq!(page.branch, PageBranch::Diagnostic);
        assert!(page.html.contains("Database Error"));
        assert!(page.html.contains("database connection refused"));

        let sent = fx.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "err@example.com");
        assert!(sent[0].subject.contains("Database Error"));
        assert!(sent[0].body.contains("database connection refused"));
        assert!(sent[0].body.contains("response"));
    }

    #[tokio::test]
    async fn empty_error_mail_skips_report() {
        let fx = fixture(MockMailer::new());
        // No settings saved at all: full defaults.
        let page = fx.handler.render(&error()).await;
        assert_eq!(page.branch, PageBranch::Diagnostic);
        assert!(fx.mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mail_failure_still_renders_diagnostic_page() {
        let fx = fixture(MockMailer::failing());
        save_settings(&fx, false);

        let page = fx.handler.render(&error()).await;
        assert_eq!(page.branch, PageBranch::Diagnostic);
        assert_eq!(fx.mailer.sent.lock().unwrap().len(), 1);
    }
}
