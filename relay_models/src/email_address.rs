use std::str::FromStr;

use lettre::address::AddressError;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A syntactically valid email address on a public domain name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EmailAddress(pub lettre::Address);

#[derive(Debug, Error)]
pub enum EmailAddressError {
    #[error(transparent)]
    Syntax(#[from] AddressError),
    #[error("email address must use a public domain name")]
    NotAPublicDomain,
}

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    pub fn into_mailbox(self) -> lettre::message::Mailbox {
        lettre::message::Mailbox::new(None, self.0)
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailAddress {
    type Err = EmailAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = s.parse::<lettre::Address>()?;
        if !is_public_domain(address.domain()) {
            return Err(EmailAddressError::NotAPublicDomain);
        }
        Ok(Self(address))
    }
}

impl<'de> Deserialize<'de> for EmailAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Dotted host name whose top level label is not numeric. Rejects bare host
/// names (`localhost`), ip literals and dotted quads.
fn is_public_domain(domain: &str) -> bool {
    if domain.starts_with('[') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((rest, tld)) => {
            !rest.is_empty() && tld.chars().any(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}
