//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "user",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        ctx.service()
            .execute(query::user::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Property` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - the `Property` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "property",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn property(
        id: api::property::Id,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        ctx.service()
            .execute(query::property::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PropertyError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Property`s, optionally scoped to an owner.
    ///
    /// No search criteria are required here: an unfiltered listing is a
    /// valid request.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "properties",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            owner = ?owner.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn properties(
        first: Option<i32>,
        after: Option<api::property::list::Cursor>,
        last: Option<i32>,
        before: Option<api::property::list::Cursor>,
        owner: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<api::property::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let arguments = read::property::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let filter = read::property::list::Filter::new(
            None,
            None,
            owner.map(Into::into),
            read::property::list::Criteria::Optional,
        )
        .map_err(Error::from)
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::properties::List::by(
                read::property::list::Selector { arguments, filter },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Searches the page of `Property`s by a keyword and/or a city.
    ///
    /// The keyword matches `Property` titles case-insensitively as a
    /// substring; the city matches exactly (ignoring case). An empty page
    /// is a valid outcome, not an error.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SEARCH_CRITERION_REQUIRED` - neither keyword nor city provided;
    /// - `NUMERIC_KEYWORD` - the keyword consists of digits only;
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            city = ?city.as_ref().map(ToString::to_string),
            first = ?first,
            gql.name = "searchProperties",
            keyword = ?keyword.as_ref().map(ToString::to_string),
            last = ?last,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn search_properties(
        first: Option<i32>,
        after: Option<api::property::list::Cursor>,
        last: Option<i32>,
        before: Option<api::property::list::Cursor>,
        keyword: Option<api::property::SearchKeyword>,
        city: Option<api::property::City>,
        ctx: &Context,
    ) -> Result<api::property::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let arguments = read::property::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let filter = read::property::list::Filter::new(
            keyword.map(Into::into),
            city.map(Into::into),
            None,
            read::property::list::Criteria::Required,
        )
        .map_err(Error::from)
        .map_err(ctx.error())?;

        ctx.service()
            .execute(query::properties::List::by(
                read::property::list::Selector { arguments, filter },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the top-rated `Property`s, best first.
    ///
    /// Ordered by descending average rating; ties resolve to insertion
    /// order. Capped to 5 items unless `limit` is provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "featuredProperties",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn featured_properties(
        limit: Option<i32>,
        ctx: &Context,
    ) -> Result<Vec<api::Property>, Error> {
        let limit = limit
            .map(usize::try_from)
            .transpose()
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .unwrap_or(read::property::TopRated::DEFAULT_LIMIT);

        ctx.service()
            .execute(query::properties::Featured::by(
                read::property::TopRated { limit },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ids| {
                ids.into_iter()
                    .map(|id| {
                        #[expect(
                            unsafe_code,
                            reason = "IDs loaded from repository guarantee \
                                      `Property` existence"
                        )]
                        unsafe {
                            api::Property::new_unchecked(id)
                        }
                    })
                    .collect()
            })
    }

    /// Returns the distinct cities of all `Property`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cities",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cities(
        ctx: &Context,
    ) -> Result<Vec<api::property::City>, Error> {
        ctx.service()
            .execute(query::properties::Cities::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cities| cities.into_iter().map(Into::into).collect())
    }

    /// Returns the `Review` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `REVIEW_NOT_EXISTS` - the `Review` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "review",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn review(
        id: api::review::Id,
        ctx: &Context,
    ) -> Result<api::Review, Error> {
        ctx.service()
            .execute(query::review::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ReviewError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the latest `Review`s of the specified `Property`, newest
    /// first.
    ///
    /// Capped to 10 items unless `limit` is provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "propertyReviews",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
        ),
    )]
    pub async fn property_reviews(
        property_id: api::property::Id,
        limit: Option<i32>,
        ctx: &Context,
    ) -> Result<Vec<api::Review>, Error> {
        let limit = limit
            .map(usize::try_from)
            .transpose()
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .unwrap_or(read::review::DEFAULT_LIMIT);

        ctx.service()
            .execute(query::reviews::ForProperty::by(
                read::review::ForProperty {
                    property_id: property_id.into(),
                    limit,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|reviews| reviews.into_iter().map(Into::into).collect())
    }

    /// Returns the latest `Review`s written by the specified `User`, newest
    /// first.
    ///
    /// Capped to 10 items unless `limit` is provided.
    #[tracing::instrument(
        skip_all,
        fields(
            author_id = %author_id,
            gql.name = "userReviews",
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user_reviews(
        author_id: api::user::Id,
        limit: Option<i32>,
        ctx: &Context,
    ) -> Result<Vec<api::Review>, Error> {
        let limit = limit
            .map(usize::try_from)
            .transpose()
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .unwrap_or(read::review::DEFAULT_LIMIT);

        ctx.service()
            .execute(query::reviews::ByAuthor::by(read::review::ByAuthor {
                author_id: author_id.into(),
                limit,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|reviews| reviews.into_iter().map(Into::into).collect())
    }

    /// Returns the latest `Review`s across all `Property`s owned by the
    /// specified `User`, newest first.
    ///
    /// Capped to 10 items unless `limit` is provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "hostReviews",
            host_id = %host_id,
            limit = ?limit,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn host_reviews(
        host_id: api::user::Id,
        limit: Option<i32>,
        ctx: &Context,
    ) -> Result<Vec<api::Review>, Error> {
        let limit = limit
            .map(usize::try_from)
            .transpose()
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .unwrap_or(read::review::DEFAULT_LIMIT);

        ctx.service()
            .execute(query::reviews::ForHost::by(read::review::ForHost {
                owner_id: host_id.into(),
                limit,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|reviews| reviews.into_iter().map(Into::into).collect())
    }
}

impl From<read::property::list::FilterError> for Error {
    fn from(err: read::property::list::FilterError) -> Self {
        use read::property::list::FilterError as E;
        match err {
            E::CriterionRequired => SearchError::CriterionRequired.into(),
            E::NumericKeyword => SearchError::NumericKeyword.into(),
        }
    }
}

define_error! {
    enum PropertyError {
        #[code = "PROPERTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ReviewError {
        #[code = "REVIEW_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Review` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum SearchError {
        #[code = "SEARCH_CRITERION_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "Provide a search keyword or select a city"]
        CriterionRequired,

        #[code = "NUMERIC_KEYWORD"]
        #[status = BAD_REQUEST]
        #[message = "Keyword cannot be only numbers"]
        NumericKeyword,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
