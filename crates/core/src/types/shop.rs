//! Shop domain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    /// The input string is empty.
    #[error("shop domain cannot be empty")]
    Empty,
}

/// The domain identifying a merchant's store (e.g. `my-shop.myshopify.com`).
///
/// Only emptiness is rejected here. Whether the shop actually exists, or has
/// installed the app, is decided by the session lookup downstream.
///
/// ```
/// use draft_lookup_core::ShopDomain;
///
/// let shop = ShopDomain::parse("my-shop.example.com").unwrap();
/// assert_eq!(shop.as_str(), "my-shop.example.com");
/// assert!(ShopDomain::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Parse a `ShopDomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ShopDomainError::Empty`] if the input is empty.
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        if s.is_empty() {
            return Err(ShopDomainError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ShopDomain {
    type Err = ShopDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShopDomain {
    type Error = ShopDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ShopDomainError::Empty);
        }
        Ok(Self(value))
    }
}

impl From<ShopDomain> for String {
    fn from(shop: ShopDomain) -> Self {
        shop.0
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert!(ShopDomain::parse("a.myshopify.com").is_ok());
        assert!(ShopDomain::parse("localhost").is_ok());
        assert_eq!(ShopDomain::parse(""), Err(ShopDomainError::Empty));
    }

    #[test]
    fn test_try_from_string() {
        assert!(ShopDomain::try_from(String::new()).is_err());
        assert_eq!(
            ShopDomain::try_from("x.myshopify.com".to_string())
                .map(String::from)
                .ok(),
            Some("x.myshopify.com".to_string())
        );
    }
}
