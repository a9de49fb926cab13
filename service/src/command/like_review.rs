//! [`Command`] for liking a [`Review`].

use common::operations::{By, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Review;
use crate::{
    domain::review,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for liking a [`Review`].
///
/// The like counter is incremented atomically in a single statement, so no
/// transaction is required.
#[derive(Clone, Copy, Debug, From)]
pub struct LikeReview {
    /// ID of the [`Review`] to like.
    pub review_id: review::Id,
}

impl<Db> Command<LikeReview> for Service<Db>
where
    Db: Database<
        Update<By<review::LikeCount, review::Id>>,
        Ok = Option<review::LikeCount>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = review::LikeCount;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: LikeReview) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let LikeReview { review_id } = cmd;

        self.database()
            .execute(Update(By::new(review_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReviewNotExists(review_id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`LikeReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Review`] with the provided ID does not exist.
    #[display("`Review(id: {_0})` does not exist")]
    #[from(ignore)]
    ReviewNotExists(#[error(not(source))] review::Id),
}
