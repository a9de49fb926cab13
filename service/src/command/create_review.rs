//! [`Command`] for creating a new [`Review`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::review::{Comment, Stars};
use crate::{
    domain::{access, property, review, user, Property, Review},
    infra::{database, Database},
    Service,
};

use super::{recompute_property_rating, Command, RecomputePropertyRating};

/// [`Command`] for creating a new [`Review`].
#[derive(Clone, Debug)]
pub struct CreateReview {
    /// ID of the [`Property`] the new [`Review`] is about.
    pub property_id: property::Id,

    /// ID of the [`User`] authoring the new [`Review`].
    ///
    /// [`User`]: crate::domain::User
    pub author_id: user::Id,

    /// [`Stars`] of the new [`Review`].
    pub stars: review::Stars,

    /// [`Comment`] of the new [`Review`].
    pub comment: review::Comment,
}

impl<Db> Command<CreateReview> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Review>, (property::Id, user::Id)>>,
            Ok = Option<Review>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Insert<Review>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Self: Command<
        RecomputePropertyRating,
        Ok = Property,
        Err = Traced<recompute_property_rating::ExecutionError>,
    >,
{
    type Ok = Review;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateReview) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateReview {
            property_id,
            author_id,
            stars,
            comment,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serializes `Review` creation per `Property`, making the
        // one-review-per-author check race-free.
        tx.execute(Lock(By::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let property = tx
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;
        if access::permits(author_id, property.owner_id) {
            return Err(tracerr::new!(E::OwnPropertyReview(author_id)));
        }

        let existing = tx
            .execute(Select(By::<Option<Review>, _>::new((
                property_id,
                author_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::AlreadyReviewed(author_id)));
        }

        let now = DateTime::now();
        let review = Review {
            id: review::Id::new(),
            property_id,
            author_id,
            stars,
            comment,
            likes: 0,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        tx.execute(Insert(review.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // A `Property` vanishing between the commit above and the recompute
        // is non-fatal: the `Review` mutation itself has succeeded.
        if let Err(e) = self
            .execute(RecomputePropertyRating { property_id })
            .await
        {
            log::warn!(
                "failed to recompute `Property` rating after `Review` \
                 creation: {e}",
            );
        }

        Ok(review)
    }
}

/// Error of [`CreateReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Author has reviewed the [`Property`] already.
    #[display("`User(id: {_0})` has reviewed the `Property` already")]
    #[from(ignore)]
    AlreadyReviewed(#[error(not(source))] user::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Owner tries to review their own [`Property`].
    #[display("`User(id: {_0})` owns the `Property` and cannot review it")]
    #[from(ignore)]
    OwnPropertyReview(#[error(not(source))] user::Id),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),
}
