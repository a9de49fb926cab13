//! [`Command`] for deleting a [`Review`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{access, review, user, Property, Review},
    infra::{database, Database},
    Service,
};

use super::{recompute_property_rating, Command, RecomputePropertyRating};

/// [`Command`] for deleting a [`Review`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteReview {
    /// ID of the [`Review`] to delete.
    pub review_id: review::Id,

    /// ID of the [`User`] performing the deletion.
    ///
    /// [`User`]: crate::domain::User
    pub initiator_id: user::Id,
}

impl<Db> Command<DeleteReview> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Review>, review::Id>>,
            Ok = Option<Review>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Review, review::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
    Self: Command<
        RecomputePropertyRating,
        Ok = Property,
        Err = Traced<recompute_property_rating::ExecutionError>,
    >,
{
    type Ok = Review;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteReview) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteReview {
            review_id,
            initiator_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let review = tx
            .execute(Select(By::<Option<Review>, _>::new(review_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReviewNotExists(review_id))
            .map_err(tracerr::wrap!())?;
        if !access::permits(initiator_id, review.author_id) {
            return Err(tracerr::new!(E::NotAuthor(initiator_id)));
        }

        tx.execute(Delete(By::<Review, _>::new(review_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // The `Property` may have been deleted concurrently (cascading its
        // reviews away); that must not abort a successful deletion.
        if let Err(e) = self
            .execute(RecomputePropertyRating {
                property_id: review.property_id,
            })
            .await
        {
            log::warn!(
                "failed to recompute `Property` rating after `Review` \
                 deletion: {e}",
            );
        }

        Ok(review)
    }
}

/// Error of [`DeleteReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Acting [`User`] is not the author of the [`Review`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`User(id: {_0})` is not the author of the `Review`")]
    #[from(ignore)]
    NotAuthor(#[error(not(source))] user::Id),

    /// [`Review`] with the provided ID does not exist.
    #[display("`Review(id: {_0})` does not exist")]
    #[from(ignore)]
    ReviewNotExists(#[error(not(source))] review::Id),
}
