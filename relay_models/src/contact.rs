use nutype::nutype;

use crate::email_address::EmailAddress;

/// A contact form submission which passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub phone: ContactPhone,
    pub message: ContactMessageContent,
}

#[nutype(
    validate(not_empty, len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

impl ContactName {
    pub const MAX_LENGTH: usize = 100;
}

#[nutype(
    validate(len_char_max = 15),
    default = "",
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Default, Serialize, Deserialize)
)]
pub struct ContactPhone(String);

impl ContactPhone {
    pub const MAX_LENGTH: usize = 15;
}

#[nutype(
    validate(not_empty, len_char_max = 5000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

impl ContactMessageContent {
    pub const MAX_LENGTH: usize = 5000;
}
