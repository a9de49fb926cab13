//! GraphQL API definitions.

mod mutation;
pub mod property;
mod query;
pub mod review;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    mutation::Mutation, property::Property, query::Query, review::Review,
    user::User,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
