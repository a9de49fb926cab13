//! [`Property`]-related read definitions.

use derive_more::{From, Into};

#[cfg(doc)]
use crate::domain::Property;

/// Selector of the top-rated [`Property`] IDs.
///
/// Orders by descending average rating; ties resolve to insertion order.
#[derive(Clone, Copy, Debug)]
pub struct TopRated {
    /// Number of IDs to select.
    pub limit: usize,
}

impl TopRated {
    /// Default size of the top-rated page.
    pub const DEFAULT_LIMIT: usize = 5;
}

/// Total count of [`Property`] list items.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct TotalCount(i32);

pub mod list {
    //! [`Property`] list definitions.

    use std::str::FromStr;

    use common::define_pagination;
    use derive_more::{AsRef, Display, Error};

    use crate::domain::{property, user};
    #[cfg(doc)]
    use crate::domain::Property;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = property::Id;

    /// Cursor pointing to a specific [`Property`] in a list.
    pub type Cursor = property::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`Keyword`] to match [`property::Title`]s against,
        /// case-insensitively, as a substring.
        pub keyword: Option<Keyword>,

        /// [`property::City`] to match exactly (ignoring case).
        pub city: Option<property::City>,

        /// ID of the owning [`User`] to scope the list to.
        ///
        /// [`User`]: crate::domain::User
        pub owner: Option<user::Id>,
    }

    impl Filter {
        /// Creates a new [`Filter`], validating it against the provided
        /// [`Criteria`] policy.
        ///
        /// The same validation runs for every listing endpoint; endpoints
        /// differ only in the [`Criteria`] they pass here.
        ///
        /// # Errors
        ///
        /// - [`FilterError::NumericKeyword`] if the `keyword` consists of
        ///   digits only, regardless of the [`Criteria`].
        /// - [`FilterError::CriterionRequired`] if [`Criteria::Required`]
        ///   is passed and neither `keyword` nor `city` is provided.
        pub fn new(
            keyword: Option<Keyword>,
            city: Option<property::City>,
            owner: Option<user::Id>,
            criteria: Criteria,
        ) -> Result<Self, FilterError> {
            if let Some(kw) = &keyword {
                if AsRef::<str>::as_ref(kw).chars().all(|c| c.is_ascii_digit()) {
                    return Err(FilterError::NumericKeyword);
                }
            }

            if matches!(criteria, Criteria::Required)
                && keyword.is_none()
                && city.is_none()
            {
                return Err(FilterError::CriterionRequired);
            }

            Ok(Self {
                keyword,
                city,
                owner,
            })
        }
    }

    /// Per-endpoint policy of the search criteria a [`Filter`] must carry.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Criteria {
        /// At least one of keyword/city is required (the public search
        /// endpoint).
        Required,

        /// An unfiltered listing is acceptable (owner-scoped and
        /// "all properties" endpoints).
        Optional,
    }

    /// Error of building a [`Filter`].
    #[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
    pub enum FilterError {
        /// Neither keyword nor city was provided where one is required.
        #[display("Neither keyword nor city is provided")]
        CriterionRequired,

        /// Keyword consists solely of digits.
        #[display("Keyword consists of digits only")]
        NumericKeyword,
    }

    /// Free-text keyword matched against [`property::Title`]s.
    #[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
    #[as_ref(forward)]
    pub struct Keyword(String);

    impl Keyword {
        /// Creates a new [`Keyword`] if the given `keyword` is valid.
        #[must_use]
        pub fn new(keyword: impl Into<String>) -> Option<Self> {
            let keyword = keyword.into();
            Self::check(&keyword).then_some(Self(keyword))
        }

        /// Checks whether the given `keyword` is a valid [`Keyword`].
        fn check(keyword: impl AsRef<str>) -> bool {
            let keyword = keyword.as_ref();
            keyword.trim() == keyword
                && !keyword.is_empty()
                && keyword.len() <= 512
        }
    }

    impl FromStr for Keyword {
        type Err = &'static str;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Self::new(s).ok_or("invalid `Keyword`")
        }
    }

    #[cfg(test)]
    mod spec {
        use crate::domain::{property, user};

        use super::{Criteria, Filter, FilterError, Keyword};

        fn keyword(s: &str) -> Keyword {
            Keyword::new(s).unwrap()
        }

        fn city(s: &str) -> property::City {
            property::City::new(s).unwrap()
        }

        #[test]
        fn numeric_keyword_is_rejected_everywhere() {
            for criteria in [Criteria::Required, Criteria::Optional] {
                assert_eq!(
                    Filter::new(Some(keyword("42")), None, None, criteria)
                        .unwrap_err(),
                    FilterError::NumericKeyword,
                );
                assert_eq!(
                    Filter::new(
                        Some(keyword("12345")),
                        Some(city("Tokyo")),
                        None,
                        criteria,
                    )
                    .unwrap_err(),
                    FilterError::NumericKeyword,
                );
            }
        }

        #[test]
        fn keyword_with_letters_is_accepted() {
            assert!(Filter::new(
                Some(keyword("loft 42")),
                None,
                None,
                Criteria::Required,
            )
            .is_ok());
        }

        #[test]
        fn criterion_requirement_is_per_endpoint() {
            assert_eq!(
                Filter::new(None, None, None, Criteria::Required).unwrap_err(),
                FilterError::CriterionRequired,
            );

            // An owner scope is not a search criterion.
            assert_eq!(
                Filter::new(None, None, Some(user::Id::new()), Criteria::Required)
                    .unwrap_err(),
                FilterError::CriterionRequired,
            );

            assert!(Filter::new(None, None, None, Criteria::Optional).is_ok());
            assert!(Filter::new(
                None,
                Some(city("Tokyo")),
                None,
                Criteria::Required,
            )
            .is_ok());
        }

        #[test]
        fn keyword_checks_format() {
            assert!(Keyword::new("").is_none());
            assert!(Keyword::new(" cozy ").is_none());
            assert!(Keyword::new("cozy loft").is_some());
        }
    }
}
