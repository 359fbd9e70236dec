//! Serde adapter for `Duration` fields written as humantime strings (`"3s"`, `"500ms"`).
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Delays {
//!     #[serde(with = "newsly_utils::humantime_serde")]
//!     redirect: Duration,
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserializer, Serializer, de};

/// # Errors
/// Fails when the input is not a humantime duration string.
pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct DurationVisitor;

    impl de::Visitor<'_> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a duration such as \"3s\" or \"500ms\"")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
            humantime::parse_duration(v).map_err(|e| E::custom(format!("invalid duration '{v}': {e}")))
        }
    }

    d.deserialize_str(DurationVisitor)
}

/// # Errors
/// Propagates serializer errors.
pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&humantime::format_duration(*d))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Delays {
        #[serde(with = "super")]
        redirect: Duration,
    }

    #[test]
    fn parses_human_strings() {
        let d: Delays = serde_json::from_str(r#"{"redirect":"1s 500ms"}"#).unwrap();
        assert_eq!(d.redirect, Duration::from_millis(1500));
    }

    #[test]
    fn writes_human_strings() {
        let json = serde_json::to_string(&Delays {
            redirect: Duration::from_secs(3),
        })
        .unwrap();
        assert_eq!(json, r#"{"redirect":"3s"}"#);
    }

    #[test]
    fn rejects_garbage() {
        let err = serde_json::from_str::<Delays>(r#"{"redirect":"soon"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid duration"));
    }
}
