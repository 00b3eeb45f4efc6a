//! Secret string type for bearer tokens.

use serde::Deserialize;
use std::fmt;
use subtle::ConstantTimeEq;

/// A configured token that never shows up in logs.
///
/// `Debug` and `Display` print `[REDACTED]`. The value is reachable through
/// [`expose_secret`](Self::expose_secret), and [`matches`](Self::matches)
/// compares a presented credential without exposing it.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Compare against a presented credential.
    ///
    /// Constant time in the content; only the length comparison short-circuits.
    pub fn matches(&self, candidate: &str) -> bool {
        bool::from(self.0.as_bytes().ct_eq(candidate.as_bytes()))
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Best effort only; copies made elsewhere are not cleared
        self.0.clear();
        self.0.shrink_to_fit();
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_redacted() {
        let secret = SecretString::new("media-token");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn test_matches() {
        let secret = SecretString::new("media-token");
        assert!(secret.matches("media-token"));
        assert!(!secret.matches("media-tokeN"));
        assert!(!secret.matches("media"));
        assert!(!secret.matches(""));
    }

    #[test]
    fn test_matches_same_length_mismatch_anywhere() {
        let secret = SecretString::new("abcd");
        for candidate in ["xbcd", "axcd", "abxd", "abcx"] {
            assert!(!secret.matches(candidate), "{candidate}");
        }
        assert!(!secret.matches("abcde"));
        assert!(SecretString::new("").matches(""));
    }

    #[test]
    fn test_deserialize() {
        let secret: SecretString = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(secret.expose_secret(), "abc");
    }
}
