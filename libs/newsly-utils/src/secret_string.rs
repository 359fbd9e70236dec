use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// String that never shows up in logs.
///
/// `Debug` and `Display` print `[REDACTED]`; [`expose`](Self::expose) hands out
/// the value for building a header or a request body. The buffer is zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Do not log or persist the returned slice outside the owning store.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
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

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn formatting_is_redacted() {
        let s = SecretString::new("Hunter2pass");
        assert_eq!(format!("{s:?}"), "[REDACTED]");
        assert_eq!(format!("{s}"), "[REDACTED]");
    }

    #[test]
    fn debug_of_containing_struct_hides_value() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Login {
            email: String,
            password: SecretString,
        }

        let login = Login {
            email: "a@b.com".to_owned(),
            password: SecretString::new("Sup3rSecret"),
        };
        let dbg = format!("{login:?}");
        assert!(dbg.contains("a@b.com"));
        assert!(!dbg.contains("Sup3rSecret"));
    }

    #[test]
    fn expose_returns_value() {
        let s = SecretString::from("tok");
        assert_eq!(s.expose(), "tok");
        assert!(!s.is_empty());
    }

    #[test]
    fn zeroize_clears_buffer() {
        let mut s = SecretString::new("sensitive");
        s.zeroize();
        assert!(s.is_empty());
    }
}
