//! [`Review`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A rating and comment about a property.
#[derive(Clone, Debug, From)]
pub struct Review {
    /// ID of this [`Review`].
    id: Id,

    /// Underlying [`domain::Review`].
    review: OnceCell<domain::Review>,
}

impl From<domain::Review> for Review {
    fn from(review: domain::Review) -> Self {
        Self {
            id: review.id.into(),
            review: OnceCell::new_with(Some(review)),
        }
    }
}

impl Review {
    /// Creates a new [`Review`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Review`] with the provided ID exists,
    /// otherwise accessing this [`Review`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            review: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Review`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Review`] doesn't exist.
    async fn review(&self, ctx: &Context) -> Result<&domain::Review, Error> {
        let id = self.id.into();
        self.review
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::review::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::ReviewError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A rating and comment about a property.
#[graphql_object(context = Context)]
impl Review {
    /// Unique identifier of this `Review`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Property` this `Review` is about.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.property",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn property(&self, ctx: &Context) -> Result<api::Property, Error> {
        let property_id = self.review(ctx).await?.property_id;
        #[expect(
            unsafe_code,
            reason = "`Review` loaded from repository references an \
                      existing `Property`, unless deleted concurrently"
        )]
        Ok(unsafe { api::Property::new_unchecked(property_id) })
    }

    /// `User` who authored this `Review`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.author",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn author(&self, ctx: &Context) -> Result<api::User, Error> {
        let author_id = self.review(ctx).await?.author_id;
        #[expect(
            unsafe_code,
            reason = "`Review` loaded from repository guarantees its \
                      author existence"
        )]
        Ok(unsafe { api::User::new_unchecked(author_id) })
    }

    /// Rating given by the author, from 1 to 5.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.rating",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rating(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::from(self.review(ctx).await?.stars.get()))
    }

    /// Comment text of this `Review`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.comment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn comment(&self, ctx: &Context) -> Result<Comment, Error> {
        Ok(self.review(ctx).await?.comment.clone().into())
    }

    /// Number of likes this `Review` has received.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.likes",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn likes(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.review(ctx).await?.likes)
            .map_err(AsError::into_error)
    }

    /// `DateTime` when this `Review` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.review(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Review` was last updated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Review.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.review(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Review`.
#[derive(Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq)]
#[from(domain::review::Id)]
#[into(domain::review::Id)]
#[graphql(name = "ReviewId", transparent)]
pub struct Id(Uuid);

/// Comment text of a `Review`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ReviewComment",
    with = scalar::Via::<domain::review::Comment>,
)]
pub struct Comment(domain::review::Comment);
