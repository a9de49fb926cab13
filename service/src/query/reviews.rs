//! [`Query`] collection related to the multiple [`Review`]s.

use common::operations::By;

use crate::{domain::Review, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries the latest [`Review`]s of a single property.
pub type ForProperty =
    DatabaseQuery<By<Vec<Review>, read::review::ForProperty>>;

/// Queries the latest [`Review`]s written by a single user.
pub type ByAuthor = DatabaseQuery<By<Vec<Review>, read::review::ByAuthor>>;

/// Queries the latest [`Review`]s across all properties owned by a single
/// user.
pub type ForHost = DatabaseQuery<By<Vec<Review>, read::review::ForHost>>;
