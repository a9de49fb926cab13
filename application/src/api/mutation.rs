//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `User` with the provided credentials.
    ///
    /// The created `User` is logged in right away.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided `UserEmail` is occupied by another
    ///                      `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createUser",
            name = %name,
            otel.name = Self::SPAN_NAME,
            role = ?role,
        ),
    )]
    pub async fn create_user(
        name: api::user::Name,
        email: api::user::Email,
        password: api::user::Password,
        role: Option<api::user::Role>,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let user = ctx
            .service()
            .execute(command::CreateUser {
                name: name.into(),
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
                role: role.map_or(domain::user::Role::User, Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any
    ///                         `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createUserSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Updates the `User`'s name to the provided one.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUserName",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_user_name(
        name: api::user::Name,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUserName {
                user_id: my_id.into(),
                name: name.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `User`'s password to the provided one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_PASSWORD` - provided `old_password` does not match the
    ///                      current `User` password.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateUserPassword",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_user_password(
        new_password: api::user::Password,
        old_password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateUserPassword {
                user_id: my_id.into(),
                new_password: secrecy::SecretBox::init_with(move || {
                    new_password.into()
                }),
                old_password: secrecy::SecretBox::init_with(move || {
                    old_password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Property` owned by the current `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_MANAGER` - the current `User` is not a listing manager;
    /// - `INVALID_MAX_GUESTS` - `maxGuests` is less than 1.
    #[tracing::instrument(
        skip_all,
        fields(
            bathrooms = %bathrooms,
            bedrooms = %bedrooms,
            city = %city,
            gql.name = "createProperty",
            kind = ?kind,
            max_guests = %max_guests,
            otel.name = Self::SPAN_NAME,
            price_per_night = %price_per_night,
            title = %title,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_property(
        title: api::property::Title,
        description: api::property::Description,
        kind: api::property::Kind,
        city: api::property::City,
        price_per_night: common::Price,
        max_guests: i32,
        bedrooms: i32,
        bathrooms: i32,
        amenities: Option<Vec<api::property::Amenity>>,
        images: Option<Vec<api::property::ImagePath>>,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let max_guests = convert_max_guests(max_guests).map_err(ctx.error())?;
        let bedrooms = bedrooms.try_into().map_err(AsError::into_error)?;
        let bathrooms = bathrooms.try_into().map_err(AsError::into_error)?;

        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateProperty {
                owner_id: my_id.into(),
                title: title.into(),
                description: description.into(),
                kind: kind.into(),
                city: city.into(),
                price_per_night,
                max_guests,
                bedrooms,
                bathrooms,
                amenities: amenities
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                images: images
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Property` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does
    ///                           not exist;
    /// - `NOT_OWNER` - the current `User` does not own the `Property`;
    /// - `INVALID_MAX_GUESTS` - `maxGuests` is less than 1.
    #[tracing::instrument(
        skip_all,
        fields(
            bathrooms = %bathrooms,
            bedrooms = %bedrooms,
            city = %city,
            gql.name = "updateProperty",
            id = %id,
            kind = ?kind,
            max_guests = %max_guests,
            otel.name = Self::SPAN_NAME,
            price_per_night = %price_per_night,
            title = %title,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_property(
        id: api::property::Id,
        title: api::property::Title,
        description: api::property::Description,
        kind: api::property::Kind,
        city: api::property::City,
        price_per_night: common::Price,
        max_guests: i32,
        bedrooms: i32,
        bathrooms: i32,
        amenities: Option<Vec<api::property::Amenity>>,
        images: Option<Vec<api::property::ImagePath>>,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        let max_guests = convert_max_guests(max_guests).map_err(ctx.error())?;
        let bedrooms = bedrooms.try_into().map_err(AsError::into_error)?;
        let bathrooms = bathrooms.try_into().map_err(AsError::into_error)?;

        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateProperty {
                property_id: id.into(),
                editor_id: my_id.into(),
                title: title.into(),
                description: description.into(),
                kind: kind.into(),
                city: city.into(),
                price_per_night,
                max_guests,
                bedrooms,
                bathrooms,
                amenities: amenities
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                images: images
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Property` with the provided ID along with all its
    /// `Review`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does
    ///                           not exist;
    /// - `NOT_OWNER` - the current `User` does not own the `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteProperty",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_property(
        id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::property::Id, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::DeleteProperty {
                property_id: id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|property| property.id.into())
    }

    /// Creates a new `Review` about the `Property` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the provided ID does
    ///                           not exist;
    /// - `OWN_PROPERTY_REVIEW` - the current `User` owns the `Property`;
    /// - `ALREADY_REVIEWED` - the current `User` has reviewed the
    ///                        `Property` already;
    /// - `INVALID_RATING` - the rating is not a whole number between 1
    ///                      and 5.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createReview",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
            rating = %rating,
        ),
    )]
    pub async fn create_review(
        property_id: api::property::Id,
        rating: i32,
        comment: api::review::Comment,
        ctx: &Context,
    ) -> Result<api::Review, Error> {
        let stars = convert_rating(rating).map_err(ctx.error())?;
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateReview {
                property_id: property_id.into(),
                author_id: my_id.into(),
                stars,
                comment: comment.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Review` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REVIEW_NOT_EXISTS` - the `Review` with the provided ID does not
    ///                         exist;
    /// - `NOT_AUTHOR` - the current `User` is not the author of the
    ///                  `Review`;
    /// - `INVALID_RATING` - the rating is not a whole number between 1
    ///                      and 5.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateReview",
            id = %id,
            otel.name = Self::SPAN_NAME,
            rating = %rating,
        ),
    )]
    pub async fn update_review(
        id: api::review::Id,
        rating: i32,
        comment: api::review::Comment,
        ctx: &Context,
    ) -> Result<api::Review, Error> {
        let stars = convert_rating(rating).map_err(ctx.error())?;
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateReview {
                review_id: id.into(),
                editor_id: my_id.into(),
                stars,
                comment: comment.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Review` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REVIEW_NOT_EXISTS` - the `Review` with the provided ID does not
    ///                         exist;
    /// - `NOT_AUTHOR` - the current `User` is not the author of the
    ///                  `Review`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteReview",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_review(
        id: api::review::Id,
        ctx: &Context,
    ) -> Result<api::review::Id, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::DeleteReview {
                review_id: id.into(),
                initiator_id: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|review| review.id.into())
    }

    /// Likes the `Review` with the provided ID and returns the new like
    /// count.
    ///
    /// No authentication is required.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REVIEW_NOT_EXISTS` - the `Review` with the provided ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "likeReview",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn like_review(
        id: api::review::Id,
        ctx: &Context,
    ) -> Result<i32, Error> {
        let likes = ctx
            .service()
            .execute(command::LikeReview {
                review_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        i32::try_from(likes).map_err(AsError::into_error)
    }
}

/// Converts the provided `maxGuests` input into a [`MaxGuests`].
///
/// [`MaxGuests`]: domain::property::MaxGuests
fn convert_max_guests(
    num: i32,
) -> Result<domain::property::MaxGuests, Error> {
    define_error! {
        enum InputError {
            #[code = "INVALID_MAX_GUESTS"]
            #[status = BAD_REQUEST]
            #[message = "`maxGuests` must be at least 1"]
            MaxGuests,
        }
    }

    u16::try_from(num)
        .ok()
        .and_then(domain::property::MaxGuests::new)
        .ok_or_else(|| InputError::MaxGuests.into())
}

/// Converts the provided `rating` input into a [`Stars`].
///
/// [`Stars`]: domain::review::Stars
fn convert_rating(rating: i32) -> Result<domain::review::Stars, Error> {
    define_error! {
        enum InputError {
            #[code = "INVALID_RATING"]
            #[status = BAD_REQUEST]
            #[message = "Rating must be a whole number between 1 and 5"]
            Rating,
        }
    }

    u8::try_from(rating)
        .ok()
        .and_then(domain::review::Stars::new)
        .ok_or_else(|| InputError::Rating.into())
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserEmail` is occupied by another `User`"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
            Self::PasswordHash(_) => None,
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::update_user_name::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UserNotExists(_) => None,
        }
    }
}

impl AsError for command::update_user_password::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_PASSWORD"]
                #[status = CONFLICT]
                #[message = "Provided `old_password` does not match the \
                             current `User` password"]
                WrongPassword,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PasswordHash(_) | Self::UserNotExists(_) => None,
            Self::WrongPassword => Some(Error::WrongPassword.into()),
        }
    }
}

impl AsError for command::create_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_MANAGER"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `User` must be a listing manager"]
                NotManager,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UserNotExists(_) => None,
            Self::UserNotManager(_) => Some(Error::NotManager.into()),
        }
    }
}

impl AsError for command::update_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotOwner(_) => PropertyAccessError::NotOwner.into(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
        })
    }
}

impl AsError for command::delete_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotOwner(_) => PropertyAccessError::NotOwner.into(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
        })
    }
}

impl AsError for command::create_review::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ALREADY_REVIEWED"]
                #[status = CONFLICT]
                #[message = "You have already reviewed this property"]
                AlreadyReviewed,

                #[code = "OWN_PROPERTY_REVIEW"]
                #[status = FORBIDDEN]
                #[message = "Property owners cannot review their own \
                             properties"]
                OwnPropertyReview,
            }
        }

        Some(match self {
            Self::AlreadyReviewed(_) => Error::AlreadyReviewed.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::OwnPropertyReview(_) => Error::OwnPropertyReview.into(),
            Self::PropertyNotExists(_) => {
                api::query::PropertyError::NotExists.into()
            }
        })
    }
}

impl AsError for command::update_review::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotAuthor(_) => ReviewAccessError::NotAuthor.into(),
            Self::ReviewNotExists(_) => {
                api::query::ReviewError::NotExists.into()
            }
        })
    }
}

impl AsError for command::delete_review::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotAuthor(_) => ReviewAccessError::NotAuthor.into(),
            Self::ReviewNotExists(_) => {
                api::query::ReviewError::NotExists.into()
            }
        })
    }
}

impl AsError for command::like_review::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ReviewNotExists(_) => {
                api::query::ReviewError::NotExists.into()
            }
        })
    }
}

define_error! {
    enum PropertyAccessError {
        #[code = "NOT_OWNER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` does not own the `Property`"]
        NotOwner,
    }
}

define_error! {
    enum ReviewAccessError {
        #[code = "NOT_AUTHOR"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` is not the author of the `Review`"]
        NotAuthor,
    }
}
