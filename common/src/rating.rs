//! [`Rating`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{Decimal, RoundingStrategy};

/// Average rating of a reviewed entity.
///
/// Ranges from `0` to `5` with a single decimal place of precision.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Rating(Decimal);

impl Rating {
    /// A [`Rating`] of an entity without any reviews.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Rating`] by checking the provided value is within
    /// the `0..=5` range.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::from(5) {
            None
        } else {
            #[expect(
                clippy::allow_attributes,
                reason = "TODO: Remove once clippy is fixed"
            )]
            #[allow(unsafe_code, reason = "invariants checked already")]
            Some(unsafe { Self::new_unchecked(val) })
        }
    }

    /// Creates a new [`Rating`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must be within the `0..=5` range.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Computes the [`Rating`] as the arithmetic mean of the provided
    /// values, rounded to one decimal place with round-half-up semantics.
    ///
    /// An empty input produces [`Rating::ZERO`].
    pub fn average<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let (count, sum) = values
            .into_iter()
            .fold((0_u32, 0_u32), |(count, sum), v| {
                (count + 1, sum + u32::from(v))
            });
        if count == 0 {
            return Self::ZERO;
        }

        Self(
            (Decimal::from(sum) / Decimal::from(count)).round_dp_with_strategy(
                1,
                RoundingStrategy::MidpointAwayFromZero,
            ),
        )
    }
}

impl FromStr for Rating {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid rating value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Average rating in the `0..=5` range with one decimal place.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Rating = super::Rating;

    impl Rating {
        fn to_output<S: ScalarValue>(r: &Rating) -> Value<S> {
            Value::scalar(r.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Rating` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Rating` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Rating;

    fn rating(s: &str) -> Rating {
        Rating::from_str(s).unwrap()
    }

    #[test]
    fn average() {
        assert_eq!(Rating::average([4, 5, 3]), rating("4.0"));
        assert_eq!(Rating::average([5, 5, 5]), rating("5.0"));
        assert_eq!(Rating::average([1]), rating("1.0"));

        // 13 / 3 = 4.333... rounds down.
        assert_eq!(Rating::average([4, 4, 5]), rating("4.3"));

        // Midpoints round half-up.
        assert_eq!(Rating::average([4, 5]), rating("4.5"));
        assert_eq!(Rating::average([4, 4, 4, 5]), rating("4.3"));
        assert_eq!(Rating::average([1, 2]), rating("1.5"));
    }

    #[test]
    fn average_of_empty_set_is_zero() {
        assert_eq!(Rating::average(std::iter::empty::<u8>()), Rating::ZERO);
    }

    #[test]
    fn average_is_deterministic() {
        assert_eq!(Rating::average([3, 4, 2]), Rating::average([3, 4, 2]));
    }

    #[test]
    fn new_checks_range() {
        assert!(Rating::from_str("0").is_ok());
        assert!(Rating::from_str("5").is_ok());
        assert!(Rating::from_str("4.3").is_ok());

        assert!(Rating::from_str("5.1").is_err());
        assert!(Rating::from_str("-1").is_err());
    }
}
