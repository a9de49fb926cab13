//! [`Command`] for deleting a [`Property`].

use common::{
    operations::{By, Commit, Delete, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{access, property, user, Property, Review},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Property`] along with all its [`Review`]s.
#[derive(Clone, Copy, Debug)]
pub struct DeleteProperty {
    /// ID of the [`Property`] to delete.
    pub property_id: property::Id,

    /// ID of the [`User`] performing the deletion.
    ///
    /// [`User`]: crate::domain::User
    pub initiator_id: user::Id,
}

impl<Db> Command<DeleteProperty> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Review, property::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteProperty {
            property_id,
            initiator_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Property`.
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
        if !access::permits(initiator_id, property.owner_id) {
            return Err(tracerr::new!(E::NotOwner(initiator_id)));
        }

        // Reviews of the `Property` are removed in the same transaction.
        tx.execute(Delete(By::<Review, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        property.deleted_at = Some(DateTime::now().coerce());
        tx.execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(property)
    }
}

/// Error of [`DeleteProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Acting [`User`] does not own the [`Property`].
    ///
    /// [`User`]: crate::domain::User
    #[display("`User(id: {_0})` does not own the `Property`")]
    #[from(ignore)]
    NotOwner(#[error(not(source))] user::Id),

    /// [`Property`] with the provided ID does not exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),
}
