//! [`Review`]-related read definitions.

use crate::domain::{property, user};
#[cfg(doc)]
use crate::domain::{Property, Review, User};

/// Default number of [`Review`]s a bounded selector returns.
pub const DEFAULT_LIMIT: usize = 10;

/// Selector of the latest [`Review`]s of a single [`Property`],
/// newest first.
#[derive(Clone, Copy, Debug)]
pub struct ForProperty {
    /// ID of the [`Property`] to select [`Review`]s of.
    pub property_id: property::Id,

    /// Number of [`Review`]s to select.
    pub limit: usize,
}

/// Selector of the latest [`Review`]s written by a single [`User`],
/// newest first.
#[derive(Clone, Copy, Debug)]
pub struct ByAuthor {
    /// ID of the [`User`] who authored the [`Review`]s.
    pub author_id: user::Id,

    /// Number of [`Review`]s to select.
    pub limit: usize,
}

/// Selector of the latest [`Review`]s across all [`Property`]s owned by a
/// single [`User`], newest first.
#[derive(Clone, Copy, Debug)]
pub struct ForHost {
    /// ID of the [`User`] owning the reviewed [`Property`]s.
    pub owner_id: user::Id,

    /// Number of [`Review`]s to select.
    pub limit: usize,
}
