//! [`Price`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Non-negative decimal price per night.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Price(Decimal);

impl Price {
    /// A [`Price`] of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Price`] by checking the provided value is not
    /// negative.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO {
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

    /// Creates a new [`Price`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must not be negative.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }
}

impl FromStr for Price {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid price value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative decimal price per night.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Price = super::Price;

    impl Price {
        fn to_output<S: ScalarValue>(p: &Price) -> Value<S> {
            Value::scalar(p.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Price` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Price` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Price;

    #[test]
    fn from_str() {
        assert!(Price::from_str("0").is_ok());
        assert!(Price::from_str("129.99").is_ok());
        assert!(Price::from_str("1000").is_ok());

        assert!(Price::from_str("-0.01").is_err());
        assert!(Price::from_str("-129").is_err());
        assert!(Price::from_str("free").is_err());
        assert!(Price::from_str("").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(Price::from_str("129.99").unwrap().to_string(), "129.99");
        assert_eq!(Price::ZERO.to_string(), "0");
    }
}
