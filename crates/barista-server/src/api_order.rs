//! Order submission: validation, misspelling generation, and best-effort
//! announcement dispatch.
//!
//! Per order: `Validating -> Generating -> (Generated | GenerationFailed)`,
//! then, only when generated, the announcement is queued and the response is
//! returned. The announcement's outcome is never observed here, so the
//! response is identical whether the device speaks or not.

use crate::{api::ApiError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use barista_misspell::GenerationError;
use barista_types::{CustomerName, MisspellRequest, OrderResponse, VARIETY_SEED_RANGE};
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Message returned for any invalid name.
pub const NAME_REQUIRED_MESSAGE: &str = "Please provide a name";

/// Message returned for any failure after validation.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate misspelling";

/// Failures that reach the customer.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("invalid name: {0}")]
    Validation(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Validation(_) => ApiError::BadRequest(NAME_REQUIRED_MESSAGE.to_string()),
            OrderError::Generation(_) => {
                ApiError::InternalServerError(GENERATION_FAILED_MESSAGE.to_string())
            }
        }
    }
}

/// Extracts and validates `name` from a request body.
///
/// Absent bodies, missing or non-string names, and names that are blank after
/// trimming are rejected before any network call.
pub fn validate_name(payload: Option<&Value>) -> Result<CustomerName, OrderError> {
    let raw = payload
        .and_then(|body| body.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| OrderError::Validation("name is missing or not a string".to_string()))?;

    CustomerName::parse(raw).map_err(|e| OrderError::Validation(e.to_string()))
}

/// Runs one order end to end and returns the customer-facing body.
pub async fn place_order(
    state: &AppState,
    order_id: Uuid,
    payload: Option<&Value>,
) -> Result<OrderResponse, OrderError> {
    let name = validate_name(payload)?;

    let seed = rand::thread_rng().gen_range(0..VARIETY_SEED_RANGE);
    let request =
        MisspellRequest::new(name, seed).map_err(|e| OrderError::Validation(e.to_string()))?;

    info!(%order_id, seed, "generating misspelling");
    let result = state.generator.generate(&request).await?;

    if !state.announcer.dispatch(order_id, &result.pronunciation) {
        debug!(%order_id, "announcement not queued");
    }

    Ok(OrderResponse::new(request.name, result))
}

/// Handler for `POST /api/misspell`.
pub async fn misspell_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = Uuid::new_v4();
    let payload = payload.ok().map(|Json(body)| body);

    match place_order(&state, order_id, payload.as_ref()).await {
        Ok(response) => {
            info!(
                %order_id,
                misspelled = %response.misspelled,
                chaos = %response.chaos,
                "order completed"
            );
            Ok(Json(response))
        }
        Err(e) => {
            match &e {
                OrderError::Validation(reason) => warn!(%order_id, %reason, "order rejected"),
                OrderError::Generation(err) => error!(%order_id, error = %err, "misspelling generation failed"),
            }
            Err(e.into())
        }
    }
}
