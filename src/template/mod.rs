//! Template rendering
//!
//! Each supported template resolves to three content blocks: subject, plain
//! body and HTML body. Sources live under `templates/` and are compiled into
//! the binary; the registry is built once at engine construction.

use handlebars::Handlebars;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::TemplateId;

/// The three rendered content blocks of a message
#[derive(Debug, Clone)]
pub struct RenderedContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Handlebars-backed renderer over the closed template set
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

// (template, subject source, plain body source, HTML body source)
const SOURCES: [(TemplateId, &str, &str, &str); 6] = [
    (
        TemplateId::UserWelcome,
        include_str!("../../templates/user_welcome/subject.hbs"),
        include_str!("../../templates/user_welcome/text.hbs"),
        include_str!("../../templates/user_welcome/html.hbs"),
    ),
    (
        TemplateId::PasswordReset,
        include_str!("../../templates/password_reset/subject.hbs"),
        include_str!("../../templates/password_reset/text.hbs"),
        include_str!("../../templates/password_reset/html.hbs"),
    ),
    (
        TemplateId::EmailVerification,
        include_str!("../../templates/email_verification/subject.hbs"),
        include_str!("../../templates/email_verification/text.hbs"),
        include_str!("../../templates/email_verification/html.hbs"),
    ),
    (
        TemplateId::Notification,
        include_str!("../../templates/notification/subject.hbs"),
        include_str!("../../templates/notification/text.hbs"),
        include_str!("../../templates/notification/html.hbs"),
    ),
    (
        TemplateId::Invoice,
        include_str!("../../templates/invoice/subject.hbs"),
        include_str!("../../templates/invoice/text.hbs"),
        include_str!("../../templates/invoice/html.hbs"),
    ),
    (
        TemplateId::BookingConfirmation,
        include_str!("../../templates/booking_confirmation/subject.hbs"),
        include_str!("../../templates/booking_confirmation/text.hbs"),
        include_str!("../../templates/booking_confirmation/html.hbs"),
    ),
];

impl TemplateEngine {
    /// Build the registry from the embedded template sources
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();

        for (id, subject, text, html) in SOURCES {
            registry.register_template_string(&subject_key(id), subject)?;
            registry.register_template_string(&text_key(id), text)?;
            registry.register_template_string(&html_key(id), html)?;
        }

        Ok(Self { registry })
    }

    /// Render a template against the supplied data bag
    ///
    /// A non-empty `subject_override` replaces the template's subject block;
    /// the plain and HTML bodies are always rendered from the template.
    pub fn render(
        &self,
        template: TemplateId,
        subject_override: Option<&str>,
        data: &Map<String, Value>,
    ) -> Result<RenderedContent> {
        let subject = match subject_override {
            Some(subject) if !subject.is_empty() => subject.to_string(),
            _ => self.registry.render(&subject_key(template), data)?.trim().to_string(),
        };

        let text = self.registry.render(&text_key(template), data)?;
        let html = self.registry.render(&html_key(template), data)?;

        Ok(RenderedContent { subject, text, html })
    }
}

fn subject_key(id: TemplateId) -> String {
    format!("{}:subject", id.as_str())
}

fn text_key(id: TemplateId) -> String {
    format!("{}:text", id.as_str())
}

fn html_key(id: TemplateId) -> String {
    format!("{}:html", id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn test_render_substitutes_data() {
        let engine = TemplateEngine::new().unwrap();
        let content = engine
            .render(
                TemplateId::UserWelcome,
                None,
                &data(&[("name", "Ada"), ("activation_link", "https://example.com/a/1")]),
            )
            .unwrap();

        assert!(content.subject.contains("Ada"));
        assert!(content.text.contains("Ada"));
        assert!(content.text.contains("https://example.com/a/1"));
        assert!(content.html.contains("Ada"));
        assert!(content.html.contains("<html>"));
    }

    #[test]
    fn test_subject_override_skips_template_subject() {
        let engine = TemplateEngine::new().unwrap();
        let content = engine
            .render(
                TemplateId::UserWelcome,
                Some("Custom subject"),
                &data(&[("name", "Ada")]),
            )
            .unwrap();

        assert_eq!(content.subject, "Custom subject");
        assert!(content.text.contains("Ada"));
    }

    #[test]
    fn test_empty_subject_override_falls_back_to_template() {
        let engine = TemplateEngine::new().unwrap();
        let content = engine
            .render(TemplateId::UserWelcome, Some(""), &data(&[("name", "Ada")]))
            .unwrap();

        assert!(!content.subject.is_empty());
        assert!(content.subject.contains("Ada"));
    }

    #[test]
    fn test_all_templates_render() {
        let engine = TemplateEngine::new().unwrap();
        for id in TemplateId::ALL {
            let content = engine.render(id, None, &Map::new()).unwrap();
            assert!(!content.subject.is_empty(), "empty subject for {}", id);
            assert!(!content.text.is_empty(), "empty text body for {}", id);
            assert!(!content.html.is_empty(), "empty html body for {}", id);
        }
    }

    #[test]
    fn test_subject_has_no_trailing_newline() {
        let engine = TemplateEngine::new().unwrap();
        let content = engine
            .render(TemplateId::Notification, None, &data(&[("title", "Heads up")]))
            .unwrap();

        assert_eq!(content.subject, content.subject.trim());
    }
}
