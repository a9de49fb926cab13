//! [`Command`] for updating a [`Review`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::review::{Comment, Stars};
use crate::{
    domain::{access, review, user, Property, Review},
    infra::{database, Database},
    Service,
};

use super::{recompute_property_rating, Command, RecomputePropertyRating};

/// [`Command`] for updating a [`Review`].
#[derive(Clone, Debug)]
pub struct UpdateReview {
    /// ID of the [`Review`] to update.
    pub review_id: review::Id,

    /// ID of the [`User`] performing the update.
    ///
    /// [`User`]: crate::domain::User
    pub editor_id: user::Id,

    /// New [`Stars`] of the [`Review`].
    pub stars: review::Stars,

    /// New [`Comment`] of the [`Review`].
    pub comment: review::Comment,
}

impl<Db> Command<UpdateReview> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Review>, review::Id>>,
            Ok = Option<Review>,
            Err = Traced<database::Error>,
        > + Database<Update<Review>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
    Self: Command<
        RecomputePropertyRating,
        Ok = Property,
        Err = Traced<recompute_property_rating::ExecutionError>,
    >,
{
    type Ok = Review;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateReview) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateReview {
            review_id,
            editor_id,
            stars,
            comment,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut review = tx
            .execute(Select(By::<Option<Review>, _>::new(review_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReviewNotExists(review_id))
            .map_err(tracerr::wrap!())?;
        if !access::permits(editor_id, review.author_id) {
            return Err(tracerr::new!(E::NotAuthor(editor_id)));
        }

        review.stars = stars;
        review.comment = comment;
        review.updated_at = DateTime::now().coerce();
        tx.execute(Update(review.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // A `Property` vanishing between the commit above and the recompute
        // is non-fatal: the `Review` mutation itself has succeeded.
        if let Err(e) = self
            .execute(RecomputePropertyRating {
                property_id: review.property_id,
            })
            .await
        {
            log::warn!(
                "failed to recompute `Property` rating after `Review` \
                 update: {e}",
            );
        }

        Ok(review)
    }
}

/// Error of [`UpdateReview`] [`Command`] execution.
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
