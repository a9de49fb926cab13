//! [`Property`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Price, Rating};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A rentable property listing.
#[derive(Clone, Debug, From)]
pub struct Property {
    /// ID of this [`Property`].
    id: Id,

    /// Underlying [`domain::Property`].
    property: OnceCell<domain::Property>,
}

impl From<domain::Property> for Property {
    fn from(property: domain::Property) -> Self {
        Self {
            id: property.id.into(),
            property: OnceCell::new_with(Some(property)),
        }
    }
}

impl Property {
    /// Creates a new [`Property`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Property`] with the provided ID exists,
    /// otherwise accessing this [`Property`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            property: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Property`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Property`] doesn't exist.
    async fn property(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Property, Error> {
        let id = self.id.into();
        self.property
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::property::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            api::query::PropertyError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A rentable property listing.
#[graphql_object(context = Context)]
impl Property {
    /// Unique identifier of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Title of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.title",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn title(&self, ctx: &Context) -> Result<Title, Error> {
        Ok(self.property(ctx).await?.title.clone().into())
    }

    /// Description of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Description, Error> {
        Ok(self.property(ctx).await?.description.clone().into())
    }

    /// Kind of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.property(ctx).await?.kind.into())
    }

    /// City this `Property` is located in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.city",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn city(&self, ctx: &Context) -> Result<City, Error> {
        Ok(self.property(ctx).await?.city.clone().into())
    }

    /// Price per night of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.pricePerNight",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price_per_night(&self, ctx: &Context) -> Result<Price, Error> {
        Ok(self.property(ctx).await?.price_per_night)
    }

    /// Maximum number of guests this `Property` can host.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.maxGuests",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn max_guests(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::from(self.property(ctx).await?.max_guests.get()))
    }

    /// Number of bedrooms in this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.bedrooms",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn bedrooms(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::from(self.property(ctx).await?.bedrooms))
    }

    /// Number of bathrooms in this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.bathrooms",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn bathrooms(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::from(self.property(ctx).await?.bathrooms))
    }

    /// Amenities of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.amenities",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn amenities(&self, ctx: &Context) -> Result<Vec<Amenity>, Error> {
        Ok(self
            .property(ctx)
            .await?
            .amenities
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Image paths of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.images",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn images(&self, ctx: &Context) -> Result<Vec<ImagePath>, Error> {
        Ok(self
            .property(ctx)
            .await?
            .images
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// `User` owning this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.owner",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn owner(&self, ctx: &Context) -> Result<api::User, Error> {
        let owner_id = self.property(ctx).await?.owner_id;
        #[expect(
            unsafe_code,
            reason = "`Property` loaded from repository guarantees its \
                      owner existence"
        )]
        Ok(unsafe { api::User::new_unchecked(owner_id) })
    }

    /// Average rating of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.rating",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rating(&self, ctx: &Context) -> Result<Rating, Error> {
        Ok(self.property(ctx).await?.rating)
    }

    /// Number of reviews of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.reviewCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn review_count(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.property(ctx).await?.review_count)
            .map_err(AsError::into_error)
    }

    /// `DateTime` when this `Property` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.property(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Property`.
#[derive(Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq)]
#[from(domain::property::Id)]
#[into(domain::property::Id)]
#[graphql(name = "PropertyId", transparent)]
pub struct Id(Uuid);

/// Title of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyTitle",
    with = scalar::Via::<domain::property::Title>,
)]
pub struct Title(domain::property::Title);

/// Description of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyDescription",
    with = scalar::Via::<domain::property::Description>,
)]
pub struct Description(domain::property::Description);

/// City of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyCity",
    with = scalar::Via::<domain::property::City>,
)]
pub struct City(domain::property::City);

/// Single amenity of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyAmenity",
    with = scalar::Via::<domain::property::Amenity>,
)]
pub struct Amenity(domain::property::Amenity);

/// Image path or URL of a `Property`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyImagePath",
    with = scalar::Via::<domain::property::ImagePath>,
)]
pub struct ImagePath(domain::property::ImagePath);

/// Free-text keyword to search `Property` titles with.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SearchKeyword",
    with = scalar::Via::<read::property::list::Keyword>,
)]
pub struct SearchKeyword(read::property::list::Keyword);

/// Kind of a `Property`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "PropertyKind")]
pub enum Kind {
    /// An apartment.
    Apartment,

    /// A whole house.
    House,

    /// A villa.
    Villa,

    /// A cabin.
    Cabin,

    /// A loft.
    Loft,

    /// A condo.
    Condo,

    /// Anything else.
    Other,
}

impl From<domain::property::Kind> for Kind {
    fn from(kind: domain::property::Kind) -> Self {
        use domain::property::Kind as K;
        match kind {
            K::Apartment => Self::Apartment,
            K::House => Self::House,
            K::Villa => Self::Villa,
            K::Cabin => Self::Cabin,
            K::Loft => Self::Loft,
            K::Condo => Self::Condo,
            K::Other => Self::Other,
        }
    }
}

impl From<Kind> for domain::property::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Apartment => Self::Apartment,
            Kind::House => Self::House,
            Kind::Villa => Self::Villa,
            Kind::Cabin => Self::Cabin,
            Kind::Loft => Self::Loft,
            Kind::Condo => Self::Condo,
            Kind::Other => Self::Other,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Property`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Property};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Property` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::property::list::Cursor)]
    #[graphql(
        name = "PropertyListCursor",
        with = scalar::Via::<read::property::list::Cursor>,
    )]
    pub struct Cursor(pub read::property::list::Cursor);

    /// Edge in the [`Property`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::property::list::Edge);

    /// Edge in the `Property` list.
    #[graphql_object(name = "PropertyListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `PropertyListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `PropertyListEdge`.
        #[must_use]
        pub fn node(&self) -> Property {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Property` existence"
            )]
            unsafe {
                Property::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Property`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::property::list::Connection);

    /// Connection of the `Property` list.
    #[graphql_object(name = "PropertyListConnection", context = Context)]
    impl Connection {
        /// Edges of this `PropertyListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::property::list::PageInfo`].
        info: read::property::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `PropertyListConnection` page.
    #[graphql_object(name = "PropertyListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Property` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::properties::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
