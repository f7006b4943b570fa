//! Validation of raw contact form bodies

use relay_models::{
    contact::{
        ContactMessageContent, ContactMessageContentError, ContactName, ContactNameError,
        ContactPhone, ContactSubmission,
    },
    email_address::EmailAddress,
};
use serde_json::{Map, Value};
use thiserror::Error;

const FIELDS: [&str; 4] = ["name", "email", "phone", "message"];

/// First violation found in a contact form body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("\"value\" must be of type object")]
    NotAnObject,
    #[error("\"{0}\" is required")]
    Required(&'static str),
    #[error("\"{0}\" must be a string")]
    NotAString(&'static str),
    #[error("\"{0}\" is not allowed to be empty")]
    Empty(&'static str),
    #[error("\"{field}\" length must be less than or equal to {max} characters long")]
    TooLong { field: &'static str, max: usize },
    #[error("\"email\" must be a valid email")]
    InvalidEmail,
    #[error("\"{0}\" is not allowed")]
    UnknownField(String),
}

/// Check the fields of `body` in the order name, email, phone, message and
/// reject unknown keys afterwards. Stops at the first violation.
pub fn validate(body: &Value) -> Result<ContactSubmission, ContactValidationError> {
    use ContactValidationError as E;

    let Value::Object(fields) = body else {
        return Err(E::NotAnObject);
    };

    let name = ContactName::try_new(required_string(fields, "name")?).map_err(|err| match err {
        ContactNameError::NotEmptyViolated => E::Empty("name"),
        ContactNameError::LenCharMaxViolated => E::TooLong {
            field: "name",
            max: ContactName::MAX_LENGTH,
        },
    })?;

    let email = required_string(fields, "email")?;
    if email.is_empty() {
        return Err(E::Empty("email"));
    }
    let email = email.parse::<EmailAddress>().map_err(|_| E::InvalidEmail)?;

    let phone = optional_string(fields, "phone")?.unwrap_or_default();
    let phone = ContactPhone::try_new(phone).map_err(|_| E::TooLong {
        field: "phone",
        max: ContactPhone::MAX_LENGTH,
    })?;

    let message = ContactMessageContent::try_new(required_string(fields, "message")?).map_err(
        |err| match err {
            ContactMessageContentError::NotEmptyViolated => E::Empty("message"),
            ContactMessageContentError::LenCharMaxViolated => E::TooLong {
                field: "message",
                max: ContactMessageContent::MAX_LENGTH,
            },
        },
    )?;

    if let Some(key) = fields.keys().find(|key| !FIELDS.contains(&key.as_str())) {
        return Err(E::UnknownField(key.clone()));
    }

    Ok(ContactSubmission {
        name,
        email,
        phone,
        message,
    })
}

fn required_string<'a>(
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ContactValidationError> {
    optional_string(fields, field)?.ok_or(ContactValidationError::Required(field))
}

fn optional_string<'a>(
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, ContactValidationError> {
    match fields.get(field) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(ContactValidationError::NotAString(field)),
    }
}
