//! Request extractors that reject with [`AppError`].
//!
//! Rejections carry the same messages for path and query parameters, so a
//! bad `productId` reads the same on every endpoint.

use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

const PRODUCT_ID: &str = "productId";

fn missing_parameter(name: &str) -> AppError {
    AppError::bad_request(format!(
        "Required request parameter '{}' is not present",
        name
    ))
}

fn conversion_failure(value: &str, name: &str) -> AppError {
    AppError::bad_request(format!(
        "Failed to convert value '{}' to required type 'int' for parameter '{}'",
        value, name
    ))
}

fn parse_product_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| conversion_failure(raw, PRODUCT_ID))
}

/// `productId` taken from the single path parameter.
#[derive(Debug, Clone, Copy)]
pub struct ProductIdPath(pub i32);

impl<S: Send + Sync> FromRequestParts<S> for ProductIdPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| missing_parameter(PRODUCT_ID))?;
        parse_product_id(&raw).map(ProductIdPath)
    }
}

/// `productId` taken from the query string.
#[derive(Debug, Clone, Copy)]
pub struct ProductIdQuery(pub i32);

impl<S: Send + Sync> FromRequestParts<S> for ProductIdQuery {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| missing_parameter(PRODUCT_ID))?;

        let raw = params
            .get(PRODUCT_ID)
            .ok_or_else(|| missing_parameter(PRODUCT_ID))?;
        parse_product_id(raw).map(ProductIdQuery)
    }
}

/// JSON body that is validated after deserialization.
///
/// Malformed bodies are `BadRequest`; validation failures are `InvalidInput`.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        value.validate()?;
        Ok(ApiJson(value))
    }
}
