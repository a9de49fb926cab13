//! [`Command`] for creating a new [`Property`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Price, Rating,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::{
    Amenity, City, Description, ImagePath, Kind, MaxGuests, Title,
};
use crate::{
    domain::{property, user, Property, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Property`].
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// ID of the [`User`] owning a new [`Property`].
    pub owner_id: user::Id,

    /// [`Title`] of a new [`Property`].
    pub title: property::Title,

    /// [`Description`] of a new [`Property`].
    pub description: property::Description,

    /// [`Kind`] of a new [`Property`].
    pub kind: property::Kind,

    /// [`City`] of a new [`Property`].
    pub city: property::City,

    /// [`Price`] per night of a new [`Property`].
    pub price_per_night: Price,

    /// [`MaxGuests`] of a new [`Property`].
    pub max_guests: property::MaxGuests,

    /// Number of bedrooms in a new [`Property`].
    pub bedrooms: property::Bedrooms,

    /// Number of bathrooms in a new [`Property`].
    pub bathrooms: property::Bathrooms,

    /// [`Amenity`] list of a new [`Property`].
    pub amenities: Vec<property::Amenity>,

    /// [`ImagePath`] list of a new [`Property`].
    pub images: Vec<property::ImagePath>,
}

impl<Db> Command<CreateProperty> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Property>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProperty {
            owner_id,
            title,
            description,
            kind,
            city,
            price_per_night,
            max_guests,
            bedrooms,
            bathrooms,
            amenities,
            images,
        } = cmd;

        let owner = self
            .database()
            .execute(Select(By::new(owner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(owner_id))
            .map_err(tracerr::wrap!())?;
        if owner.role != user::Role::Manager {
            return Err(tracerr::new!(E::UserNotManager(owner_id)));
        }

        let property = Property {
            id: property::Id::new(),
            title,
            description,
            kind,
            city,
            price_per_night,
            max_guests,
            bedrooms,
            bathrooms,
            amenities,
            images,
            owner_id,
            rating: Rating::ZERO,
            review_count: 0,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID is not a listing manager.
    #[display("`User(id: {_0})` is not a listing manager")]
    #[from(ignore)]
    UserNotManager(#[error(not(source))] user::Id),
}
