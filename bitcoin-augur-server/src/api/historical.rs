use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::persistence::PersistenceError;
use crate::service::{CollectorError, MempoolCollector};
use super::error::ApiError;
use super::models::transform_fee_estimate;

/// Query parameters for historical fee endpoint
#[derive(Debug, Deserialize)]
pub struct HistoricalQuery {
    /// Unix timestamp in seconds
    timestamp: i64,
}

/// GET /historical_fee?timestamp={unix_ts} - Returns historical fee estimates
pub async fn get_historical_fee(
    Query(params): Query<HistoricalQuery>,
    State(collector): State<Arc<MempoolCollector>>,
) -> Response {
    info!("Received request for historical fee estimates at timestamp {}", params.timestamp);
    
    // Validate timestamp (must be reasonable - not in future, not too far in past)
    let now = chrono::Utc::now().timestamp();
    if params.timestamp > now {
        warn!("Timestamp {} is in the future", params.timestamp);
        return (
            StatusCode::BAD_REQUEST,
            "Timestamp cannot be in the future"
        ).into_response();
    }
    
    // Don't allow timestamps more than 1 year in the past
    let one_year_ago = now - (365 * 24 * 60 * 60);
    if params.timestamp < one_year_ago {
        warn!("Timestamp {} is too far in the past", params.timestamp);
        return (
            StatusCode::BAD_REQUEST,
            "Timestamp is too far in the past (max 1 year)"
        ).into_response();
    }
    
    // Get historical estimate
    match collector.get_estimate_for_timestamp(params.timestamp).await {
        Ok(estimate) => {
            if estimate.estimates.is_empty() {
                debug!("No historical data available for timestamp {}", params.timestamp);
                (
                    StatusCode::NOT_FOUND,
                    "No historical data available for the requested timestamp"
                ).into_response()
            } else {
                let response = transform_fee_estimate(estimate);
                debug!("Returning historical fee estimates with {} targets", response.estimates.len());
                Json(response).into_response()
            }
        }
        Err(CollectorError::PersistenceError(PersistenceError::InvalidTimestamp(ts))) => {
            warn!("Invalid timestamp format: {}", ts);
            (
                StatusCode::BAD_REQUEST,
                "Invalid timestamp format"
            ).into_response()
        }
        Err(err @ CollectorError::EstimationError(
            bitcoin_augur::AugurError::InsufficientData(_),
        )) => {
            warn!("No historical data available: {}", err);
            (
                StatusCode::NOT_FOUND,
                "No historical data available for the requested timestamp"
            ).into_response()
        }
        Err(err) => {
            warn!("Failed to get historical fee estimates: {}", err);
            ApiError::from(err).into_response()
        }
    }
}
