// POST /leads handler

use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::reply::Response;
use warp::Reply;

use crate::error::{ApiError, INVALID_EMAIL, LEAD_NOT_SAVED};
use crate::leads::{Lead, LeadStore};
use crate::models::{LeadRequest, LeadResponse};
use crate::state::AppState;

pub async fn leads_handler(
    state: Arc<AppState>,
    request: LeadRequest,
) -> Result<Response, Infallible> {
    Ok(match capture_lead(&state.leads, request).await {
        Ok(body) => warp::reply::json(&body).into_response(),
        Err(e) => e.into_response(),
    })
}

/// Validate the submission and append it to the leads file
pub async fn capture_lead(store: &LeadStore, request: LeadRequest) -> Result<LeadResponse, ApiError> {
    let lead = Lead::new(request.name, &request.email).map_err(|e| {
        warn!(error = %e, "lead rejected");
        ApiError::Validation(INVALID_EMAIL.to_string())
    })?;

    info!(name = lead.name(), email = lead.email(), "new lead received");

    store.append(&lead).await.map_err(|e| {
        error!(error = %e, "failed to save lead");
        ApiError::Internal(LEAD_NOT_SAVED.to_string())
    })?;

    Ok(LeadResponse::success())
}
