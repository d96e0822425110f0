//! Shopify customer identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CustomerId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerIdError {
    /// The input string is empty.
    #[error("customer id cannot be empty")]
    Empty,
    /// The input contains something other than ASCII digits.
    #[error("customer id must contain only digits")]
    NonDigit,
}

/// A numeric Shopify customer ID, as it appears in the legacy REST form.
///
/// The value is kept as the exact string the caller sent so it can be
/// echoed back verbatim (leading zeros included) and embedded in search
/// filters without any numeric round-trip.
///
/// ## Constraints
///
/// - At least one character
/// - ASCII digits only (`^\d+$`)
///
/// ## Examples
///
/// ```
/// use draft_lookup_core::CustomerId;
///
/// assert!(CustomerId::parse("12345").is_ok());
///
/// assert!(CustomerId::parse("").is_err());
/// assert!(CustomerId::parse("abc").is_err());
/// assert!(CustomerId::parse("12a").is_err());
/// assert!(CustomerId::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    /// Parse a `CustomerId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains any character
    /// that is not an ASCII digit.
    pub fn parse(s: &str) -> Result<Self, CustomerIdError> {
        if s.is_empty() {
            return Err(CustomerIdError::Empty);
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CustomerIdError::NonDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CustomerId {
    type Err = CustomerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CustomerId {
    type Error = CustomerIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

impl AsRef<str> for CustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
