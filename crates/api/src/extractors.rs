//! Request extractors.
//!
//! The auth middleware resolves the bearer token and stores the user model
//! in the request extensions; these extractors pick it up from there, so a
//! handler declares its auth requirement through its signature alone.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use photogram_common::AppError;
use photogram_db::entities::user;

/// Extracts the authenticated user, rejecting the request with 401 when the
/// token was absent or did not resolve.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Extracts the authenticated user if there is one. Routes that render
/// differently for anonymous viewers use this instead of [`AuthUser`].
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}
