//! [`LikePattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// SQL `LIKE` pattern matching the input as a substring.
///
/// Metacharacters of the input are escaped, so the match is always literal.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] out of the given `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "%{}%",
            input
                .replace('\\', r"\\")
                .replace('%', r"\%")
                .replace('_', r"\_"),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::LikePattern;

    #[test]
    fn wraps_input_into_wildcards() {
        assert_eq!(LikePattern::new("loft"), LikePattern("%loft%".into()));
    }

    #[test]
    fn escapes_metacharacters() {
        assert_eq!(
            LikePattern::new("100%_\\done"),
            LikePattern(r"%100\%\_\\done%".into()),
        );
    }
}
