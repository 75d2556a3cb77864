//! Custom Axum extractors
//!
//! Rejections from path, query and body parsing become JSON 400s instead of
//! axum's plain-text defaults.

use std::fmt;
use std::str::FromStr;

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};

use super::error::ApiError;
use crate::models::ValidationError;

/// Extract and validate a player id (positive integer) from path
#[derive(Debug, Clone, Copy)]
pub struct PlayerId(pub i64);

impl PlayerId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: "id",
            reason: format!("'{}' is not a positive integer", raw),
        };

        let id: i64 = raw.parse().map_err(|_| invalid())?;
        if id <= 0 {
            return Err(invalid());
        }
        Ok(Self(id))
    }
}

impl<S> FromRequestParts<S> for PlayerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        Ok(Self::parse(&raw)?)
    }
}

/// Query string extractor with JSON rejections
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "query",
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(value))
    }
}

/// Parse an optional query value, treating `?key=` like an absent key.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

/// JSON body extractor with JSON rejections
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "body",
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(value))
    }
}
