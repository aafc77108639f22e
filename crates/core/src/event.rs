//! Transient lifecycle-event payloads handed in by the host.

use serde::{Deserialize, Serialize};

/// Outcome of an update run, as reported by the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub success: bool,
}

/// Status derived from an [`UpdateOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    Success,
    Warning,
    Error,
}

impl UpdateStatus {
    /// Outcomes only carry a success flag, so this never yields `Warning`;
    /// the variant exists to keep the recipient table total.
    pub fn from_outcome(outcome: &UpdateOutcome) -> Self {
        if outcome.success {
            UpdateStatus::Success
        } else {
            UpdateStatus::Error
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStatus::Success => "success",
            UpdateStatus::Warning => "warning",
            UpdateStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Update-completion email payload. The router mutates `to` and `subject`
/// before the payload goes back to the host for dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmail {
    #[serde(default)]
    pub to: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub body: String,
    /// Update-type tag embedded in the subject, e.g. "core" or "plugin".
    #[serde(default)]
    pub update_type: Option<String>,
}

/// A fatal error intercepted before the host renders its error page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalError {
    pub message: String,
    pub title: String,
    /// Free-form detail arguments, dumped verbatim into the report mail.
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

/// Which branch of the critical-error handler produced the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageBranch {
    /// Previously cached rendition, served verbatim.
    Cached,
    /// Generic "try again later" page.
    Fallback,
    /// The default diagnostic page (title + message).
    Diagnostic,
}

/// Terminal page emitted by the critical-error handler. Exactly one of
/// these is rendered per invocation; request processing halts after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedPage {
    pub title: String,
    pub html: String,
    pub branch: PageBranch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_success_outcome() {
        let s = UpdateStatus::from_outcome(&UpdateOutcome { success: true });
        assert_eq!(s, UpdateStatus::Success);
    }

    #[test]
    fn status_from_failed_outcome() {
        let s = UpdateStatus::from_outcome(&UpdateOutcome { success: false });
        assert_eq!(s, UpdateStatus::Error);
    }

    #[test]
    fn status_display_is_lowercase() {
        assert_eq!(UpdateStatus::Success.to_string(), "success");
        assert_eq!(UpdateStatus::Warning.to_string(), "warning");
        assert_eq!(UpdateStatus::Error.to_string(), "error");
    }

    #[test]
    fn update_email_optional_fields_default() {
        let e: UpdateEmail = serde_json::from_str(r#"{"subject":"Updates finished"}"#).unwrap();
        assert!(e.to.is_none());
        assert_eq!(e.body, "");
        assert!(e.update_type.is_none());
    }
}
