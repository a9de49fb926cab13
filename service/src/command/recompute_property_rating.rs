//! [`Command`] recomputing the denormalized rating of a [`Property`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Rating,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{property, review, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] recomputing the denormalized average [`Rating`] and review
/// count of a [`Property`] from the current set of its [`Review`]s.
///
/// Executed inline after every [`Review`] mutation commits. Each execution
/// performs one full re-scan of the [`Property`]'s reviews and exactly one
/// write to the [`Property`] record. The scan and the write happen inside
/// a single transaction holding the per-[`Property`] lock, so concurrent
/// recomputes serialize and the stored value always reflects a complete
/// scan.
///
/// [`Review`]: crate::domain::Review
#[derive(Clone, Copy, Debug, From)]
pub struct RecomputePropertyRating {
    /// ID of the [`Property`] to recompute the [`Rating`] of.
    pub property_id: property::Id,
}

impl<Db> Command<RecomputePropertyRating> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<review::Stars>, property::Id>>,
            Ok = Vec<review::Stars>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecomputePropertyRating,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecomputePropertyRating { property_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serializes concurrent recomputes of the same `Property`.
        tx.execute(Lock(By::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut property = tx
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let stars = tx
            .execute(Select(By::<Vec<review::Stars>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        property.rating =
            Rating::average(stars.iter().copied().map(review::Stars::get));
        property.review_count =
            property::ReviewCount::try_from(stars.len())
                .unwrap_or(property::ReviewCount::MAX);
        tx.execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(property)
    }
}

/// Error of [`RecomputePropertyRating`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),
}
