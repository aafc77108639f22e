//! Minijinja rendering for mail bodies and error pages.
//!
//! Templates are plain strings (not pre-registered files), so a fresh
//! [`minijinja::Environment`] is created per render call.

use serde::Serialize;

use crate::traits::NotifyError;

/// Renders string templates using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Render a template string with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is invalid or
    /// rendering fails.
    pub fn render<C: Serialize>(&self, template_str: &str, ctx: &C) -> Result<String, NotifyError> {
        let env = minijinja::Environment::new();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}
