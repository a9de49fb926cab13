//! Resource access checks.

use crate::domain::user;

/// Checks whether the `actor` may mutate a resource belonging to the
/// `owner`.
///
/// Every mutation of an owned resource (a [`Property`] or a [`Review`])
/// goes through this single check instead of inlining the comparison per
/// handler.
///
/// [`Property`]: crate::domain::Property
/// [`Review`]: crate::domain::Review
#[must_use]
pub fn permits(actor: user::Id, owner: user::Id) -> bool {
    actor == owner
}

#[cfg(test)]
mod spec {
    use uuid::Uuid;

    use crate::domain::user;

    use super::permits;

    #[test]
    fn owner_is_permitted() {
        let owner = user::Id::new();
        assert!(permits(owner, owner));
    }

    #[test]
    fn other_users_are_denied() {
        let owner = user::Id::new();
        let other = user::Id::new();
        assert!(!permits(other, owner));

        let nil = user::Id::from(Uuid::nil());
        assert!(!permits(nil, owner));
    }
}
