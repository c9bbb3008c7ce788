//! Extractors that report rejections through [`RequestError`], so a bad id or
//! body gets the same JSON answer as a failing query on that route.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::RequestError;

/// Path parameter of a listing route.
#[derive(Debug)]
pub struct ListingPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ListingPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(RequestError::FetchInput)?;
        Ok(Self(value))
    }
}

/// Path parameter of a delete route.
#[derive(Debug)]
pub struct DeletePath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for DeletePath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(RequestError::DeleteInput)?;
        Ok(Self(value))
    }
}

/// JSON body of a create route.
#[derive(Debug)]
pub struct InsertJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for InsertJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(RequestError::InsertInput)?;
        Ok(Self(value))
    }
}
