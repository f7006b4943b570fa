use std::sync::Arc;

use anyhow::Context;
use relay_templates_contracts::{RenderedTemplate, Template, TemplateService, TEMPLATES};
use tera::Tera;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    tera: Arc<Tera>,
}

impl TemplateServiceImpl {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();

        for &(name, text, html) in TEMPLATES {
            tera.add_raw_templates([(text_name(name), text), (html_name(name), html)])
                .with_context(|| format!("Failed to load template {name}"))?;
        }

        Ok(Self { tera: tera.into() })
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<RenderedTemplate> {
        let context = tera::Context::from_serialize(template)?;
        Ok(RenderedTemplate {
            text: self.tera.render(&text_name(T::NAME), &context)?,
            html: self.tera.render(&html_name(T::NAME), &context)?,
        })
    }
}

// Tera only autoescapes templates whose name ends with `.html`.
fn text_name(name: &str) -> String {
    format!("{name}.txt")
}

fn html_name(name: &str) -> String {
    format!("{name}.html")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use relay_templates_contracts::ContactTemplate;

    use super::*;

    fn render(template: ContactTemplate) -> RenderedTemplate {
        TemplateServiceImpl::new().unwrap().render(&template).unwrap()
    }

    #[test]
    fn contact_text() {
        let rendered = render(ContactTemplate {
            name: "Max Mustermann".into(),
            email: "max.mustermann@example.de".into(),
            phone: "+49 123 456".into(),
            message: "Hello\nWorld!".into(),
        });

        assert_eq!(
            rendered.text,
            concat!(
                "Name: Max Mustermann\n",
                "Email: max.mustermann@example.de\n",
                "Phone: +49 123 456\n",
                "\n",
                "Message:\n",
                "Hello\nWorld!\n",
            )
        );
    }

    #[test]
    fn missing_phone() {
        let rendered = render(ContactTemplate {
            name: "A".into(),
            email: "a@b.com".into(),
            phone: "".into(),
            message: "hi".into(),
        });

        assert!(rendered.text.contains("Phone: N/A\n"));
        assert!(rendered.html.contains("<strong>Phone:</strong> N/A</p>"));
    }

    #[test]
    fn html_newlines() {
        let rendered = render(ContactTemplate {
            name: "A".into(),
            email: "a@b.com".into(),
            phone: "".into(),
            message: "line 1\nline 2\r\nline 3".into(),
        });

        assert!(rendered.html.contains("<p>line 1<br>line 2<br>line 3</p>"));
        assert!(rendered.text.contains("line 1\nline 2\r\nline 3"));
    }

    #[test]
    fn html_is_escaped() {
        let payload = r#"<script>alert("x" & 'y')</script>"#;
        let rendered = render(ContactTemplate {
            name: payload.into(),
            email: payload.into(),
            phone: "<b>1</b>".into(),
            message: format!("{payload}\n{payload}"),
        });

        assert!(!rendered.html.contains("<script>"));
        assert!(!rendered.html.contains("<b>"));
        assert!(!rendered.html.contains(r#""x""#));
        assert!(!rendered.html.contains("'y'"));
        assert!(!rendered.html.contains("\" & '"));
        assert!(rendered.html.contains("&lt;script&gt;"));
        assert!(rendered.html.contains("&amp;"));
        assert!(rendered.html.contains("&quot;x&quot;"));
        assert!(rendered.html.contains("&#x27;y&#x27;"));

        // the plain text variant is not escaped
        assert!(rendered.text.contains(payload));
    }
}
