//! [`Command`] for updating a [`Property`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Price,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::{
    Amenity, City, Description, ImagePath, Kind, MaxGuests, Title,
};
use crate::{
    domain::{access, property, user, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Property`].
///
/// The denormalized rating fields are never touched here.
#[derive(Clone, Debug)]
pub struct UpdateProperty {
    /// ID of the [`Property`] to update.
    pub property_id: property::Id,

    /// ID of the [`User`] performing the update.
    ///
    /// [`User`]: crate::domain::User
    pub editor_id: user::Id,

    /// New [`Title`] of the [`Property`].
    pub title: property::Title,

    /// New [`Description`] of the [`Property`].
    pub description: property::Description,

    /// New [`Kind`] of the [`Property`].
    pub kind: property::Kind,

    /// New [`City`] of the [`Property`].
    pub city: property::City,

    /// New [`Price`] per night of the [`Property`].
    pub price_per_night: Price,

    /// New [`MaxGuests`] of the [`Property`].
    pub max_guests: property::MaxGuests,

    /// New number of bedrooms in the [`Property`].
    pub bedrooms: property::Bedrooms,

    /// New number of bathrooms in the [`Property`].
    pub bathrooms: property::Bathrooms,

    /// New [`Amenity`] list of the [`Property`].
    pub amenities: Vec<property::Amenity>,

    /// New [`ImagePath`] list of the [`Property`].
    pub images: Vec<property::ImagePath>,
}

impl<Db> Command<UpdateProperty> for Service<Db>
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
        > + Database<Update<Property>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProperty {
            property_id,
            editor_id,
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
        if !access::permits(editor_id, property.owner_id) {
            return Err(tracerr::new!(E::NotOwner(editor_id)));
        }

        property.title = title;
        property.description = description;
        property.kind = kind;
        property.city = city;
        property.price_per_night = price_per_night;
        property.max_guests = max_guests;
        property.bedrooms = bedrooms;
        property.bathrooms = bathrooms;
        property.amenities = amenities;
        property.images = images;
        tx.execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(property)
    }
}

/// Error of [`UpdateProperty`] [`Command`] execution.
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
