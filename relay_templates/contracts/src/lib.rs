use relay_models::contact::ContactSubmission;
use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the plain text and html variant of the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<RenderedTemplate>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub text: String,
    pub html: String,
}

/// A template with a plain text and an html variant.
///
/// Values interpolated into the html variant are escaped.
pub trait Template: Serialize {
    const NAME: &'static str;
    const TEXT: &'static str;
    const HTML: &'static str;
}

macro_rules! templates {
    ($( $ident:ident ( $name:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $name;
                const TEXT: &'static str = include_str!(concat!("../templates/", $name, ".txt"));
                const HTML: &'static str = include_str!(concat!("../templates/", $name, ".html"));
            }
        )*

        /// `(name, text, html)` of every template.
        pub const TEMPLATES: &[(&str, &str, &str)] = &[
            $((
                <$ident as Template>::NAME,
                <$ident as Template>::TEXT,
                <$ident as Template>::HTML,
            ),)*
        ];
    };
}

templates! {
    ContactTemplate("contact"),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactTemplate {
    pub name: String,
    pub email: String,
    /// Empty if the submitter did not provide a phone number.
    pub phone: String,
    pub message: String,
}

impl From<&ContactSubmission> for ContactTemplate {
    fn from(value: &ContactSubmission) -> Self {
        Self {
            name: value.name.to_string(),
            email: value.email.to_string(),
            phone: value.phone.to_string(),
            message: value.message.to_string(),
        }
    }
}
