//! [`Review`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, user};

/// Rating and comment authored by one [`User`] about one [`Property`].
///
/// At most one [`Review`] exists per `(property, author)` pair.
///
/// [`Property`]: crate::domain::Property
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Review {
    /// ID of this [`Review`].
    pub id: Id,

    /// ID of the [`Property`] this [`Review`] is about.
    ///
    /// [`Property`]: crate::domain::Property
    pub property_id: property::Id,

    /// ID of the [`User`] who authored this [`Review`].
    ///
    /// [`User`]: crate::domain::User
    pub author_id: user::Id,

    /// [`Stars`] given by the author.
    pub stars: Stars,

    /// [`Comment`] text of this [`Review`].
    pub comment: Comment,

    /// Number of likes this [`Review`] has received.
    pub likes: LikeCount,

    /// [`DateTime`] when this [`Review`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Review`] was last updated.
    pub updated_at: UpdateDateTime,
}

/// ID of a [`Review`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Whole-star rating of a [`Review`], from 1 to 5 inclusive.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd)]
pub struct Stars(u8);

impl Stars {
    /// Creates a new [`Stars`] if the given `num` is within the `1..=5`
    /// range.
    #[must_use]
    pub const fn new(num: u8) -> Option<Self> {
        if matches!(num, 1..=5) {
            Some(Self(num))
        } else {
            None
        }
    }

    /// Returns the underlying number of stars.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Comment text of a [`Review`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Comment(String);

impl Comment {
    /// Creates a new [`Comment`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Comment`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Comment`]:
    /// trimmed and between 5 and 1000 characters long.
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        let len = text.chars().count();
        text.trim() == text && len >= 5 && len <= 1000
    }
}

impl FromStr for Comment {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Comment`")
    }
}

/// Number of likes a [`Review`] has received.
pub type LikeCount = u32;

/// [`DateTime`] when a [`Review`] was created.
pub type CreationDateTime = DateTimeOf<(Review, unit::Creation)>;

/// [`DateTime`] when a [`Review`] was last updated.
pub type UpdateDateTime = DateTimeOf<(Review, unit::Update)>;

#[cfg(test)]
mod spec {
    use super::{Comment, Stars};

    #[test]
    fn stars_are_within_range() {
        assert!(Stars::new(0).is_none());
        assert!(Stars::new(6).is_none());

        for num in 1..=5 {
            assert_eq!(Stars::new(num).map(Stars::get), Some(num));
        }
    }

    #[test]
    fn comment_length_is_bounded() {
        assert!(Comment::new("Great place to stay!").is_some());
        assert!(Comment::new("Nice!").is_some());

        assert!(Comment::new("Meh.").is_none());
        assert!(Comment::new("").is_none());
        assert!(Comment::new("x".repeat(1001)).is_none());
        assert!(Comment::new(" padded comment ").is_none());

        assert!(Comment::new("x".repeat(1000)).is_some());
    }
}
