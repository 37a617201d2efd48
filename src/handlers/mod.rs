/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints, grouped
/// by the route prefix they serve. Each handler extracts the caller and the
/// request body, calls the repository layer, and maps the result to a JSON
/// response.

mod auth_handlers;
mod customer_handlers;
mod vendor_handlers;
mod admin_handlers;

// Re-export all handlers
pub use auth_handlers::*;
pub use customer_handlers::*;
pub use vendor_handlers::*;
pub use admin_handlers::*;

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::dto::{HealthResponse, Validate};
use crate::errors::ApiError;

/// A JSON body that has been deserialized and validated
///
/// Malformed JSON, missing fields and broken validation rules all become
/// `400 {"error": "..."}`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        value.validate().map_err(ApiError::Validation)?;
        Ok(ValidJson(value))
    }
}

/// Handler for `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
