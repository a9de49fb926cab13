//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_property;
pub mod create_review;
pub mod create_user;
pub mod create_user_session;
pub mod delete_property;
pub mod delete_review;
pub mod like_review;
pub mod recompute_property_rating;
pub mod update_property;
pub mod update_review;
pub mod update_user_name;
pub mod update_user_password;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_property::CreateProperty, create_review::CreateReview,
    create_user::CreateUser, create_user_session::CreateUserSession,
    delete_property::DeleteProperty, delete_review::DeleteReview,
    like_review::LikeReview,
    recompute_property_rating::RecomputePropertyRating,
    update_property::UpdateProperty, update_review::UpdateReview,
    update_user_name::UpdateUserName,
    update_user_password::UpdateUserPassword,
};
