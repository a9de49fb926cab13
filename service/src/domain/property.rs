//! [`Property`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Price, Rating};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;

/// Rentable short-term listing.
#[derive(Clone, Debug)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`Title`] of this [`Property`].
    pub title: Title,

    /// [`Description`] of this [`Property`].
    pub description: Description,

    /// [`Kind`] of this [`Property`].
    pub kind: Kind,

    /// [`City`] this [`Property`] is located in.
    pub city: City,

    /// [`Price`] per night of this [`Property`].
    pub price_per_night: Price,

    /// [`MaxGuests`] this [`Property`] can host.
    pub max_guests: MaxGuests,

    /// Number of bedrooms in this [`Property`].
    pub bedrooms: Bedrooms,

    /// Number of bathrooms in this [`Property`].
    pub bathrooms: Bathrooms,

    /// [`Amenity`] list of this [`Property`], in the order the owner
    /// provided it.
    pub amenities: Vec<Amenity>,

    /// [`ImagePath`] list of this [`Property`], in the order the owner
    /// provided it.
    pub images: Vec<ImagePath>,

    /// ID of the [`User`] owning this [`Property`].
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// Denormalized average [`Rating`] of this [`Property`].
    ///
    /// Recomputed from reviews after every review mutation. Never written
    /// by anything else.
    pub rating: Rating,

    /// Denormalized count of reviews of this [`Property`].
    ///
    /// Maintained together with the [`Rating`] above.
    pub review_count: ReviewCount,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Property`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

/// ID of a [`Property`].
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

/// Title of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 512
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Description of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text && !text.is_empty() && text.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// City a [`Property`] is located in.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct City(String);

impl City {
    /// Creates a new [`City`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `city` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(city: impl Into<String>) -> Self {
        Self(city.into())
    }

    /// Creates a new [`City`] if the given `city` is valid.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        Self::check(&city).then_some(Self(city))
    }

    /// Checks whether the given `city` is a valid [`City`].
    fn check(city: impl AsRef<str>) -> bool {
        let city = city.as_ref();
        city.trim() == city && !city.is_empty() && city.len() <= 512
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `City`")
    }
}

/// Single amenity of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Amenity(String);

impl Amenity {
    /// Creates a new [`Amenity`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `amenity` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(amenity: impl Into<String>) -> Self {
        Self(amenity.into())
    }

    /// Creates a new [`Amenity`] if the given `amenity` is valid.
    #[must_use]
    pub fn new(amenity: impl Into<String>) -> Option<Self> {
        let amenity = amenity.into();
        Self::check(&amenity).then_some(Self(amenity))
    }

    /// Checks whether the given `amenity` is a valid [`Amenity`].
    fn check(amenity: impl AsRef<str>) -> bool {
        let amenity = amenity.as_ref();
        amenity.trim() == amenity
            && !amenity.is_empty()
            && amenity.len() <= 512
    }
}

impl FromStr for Amenity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Amenity`")
    }
}

/// Path or URL of a [`Property`] image.
///
/// Produced by the upload-storage collaborator; the service only stores
/// the resulting strings.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct ImagePath(String);

impl ImagePath {
    /// Creates a new [`ImagePath`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `path` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Creates a new [`ImagePath`] if the given `path` is valid.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        Self::check(&path).then_some(Self(path))
    }

    /// Checks whether the given `path` is a valid [`ImagePath`].
    fn check(path: impl AsRef<str>) -> bool {
        let path = path.as_ref();
        path.trim() == path && !path.is_empty() && path.len() <= 2048
    }
}

impl FromStr for ImagePath {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImagePath`")
    }
}

/// Maximum number of guests a [`Property`] can host.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct MaxGuests(u16);

impl MaxGuests {
    /// Creates a new [`MaxGuests`] if the given `num` is valid.
    ///
    /// A [`Property`] hosts at least one guest.
    #[must_use]
    pub const fn new(num: u16) -> Option<Self> {
        if num >= 1 {
            Some(Self(num))
        } else {
            None
        }
    }

    /// Returns the underlying number of guests.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

/// Number of bedrooms in a [`Property`].
pub type Bedrooms = u16;

/// Number of bathrooms in a [`Property`].
pub type Bathrooms = u16;

/// Number of reviews of a [`Property`].
pub type ReviewCount = u32;

define_kind! {
    #[doc = "Kind of a [`Property`]."]
    enum Kind {
        #[doc = "An apartment."]
        Apartment = 1,

        #[doc = "A whole house."]
        House = 2,

        #[doc = "A villa."]
        Villa = 3,

        #[doc = "A cabin."]
        Cabin = 4,

        #[doc = "A loft."]
        Loft = 5,

        #[doc = "A condo."]
        Condo = 6,

        #[doc = "Anything else."]
        Other = 7,
    }
}

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

/// [`DateTime`] when a [`Property`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Property, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use super::{Amenity, City, MaxGuests, Title};

    #[test]
    fn title_checks_format() {
        assert!(Title::new("Cozy loft near the station").is_some());

        assert!(Title::new("").is_none());
        assert!(Title::new("  padded  ").is_none());
        assert!(Title::new("x".repeat(513)).is_none());
    }

    #[test]
    fn city_checks_format() {
        assert!(City::new("Tokyo").is_some());

        assert!(City::new("").is_none());
        assert!(City::new(" Tokyo").is_none());
    }

    #[test]
    fn amenity_checks_format() {
        assert!(Amenity::new("wifi").is_some());
        assert!(Amenity::new("").is_none());
    }

    #[test]
    fn max_guests_is_at_least_one() {
        assert!(MaxGuests::new(0).is_none());
        assert_eq!(MaxGuests::new(1).map(MaxGuests::get), Some(1));
        assert_eq!(MaxGuests::new(12).map(MaxGuests::get), Some(12));
    }
}
