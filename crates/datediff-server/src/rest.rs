//! REST adapter: `POST {rest_path}` with a JSON body.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use datediff_engine::{DiffError, DiffResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::AppState;

/// Message returned for failures the caller did not cause.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Error.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub start_date: String,
    pub end_date: String,
    pub calculation_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Calculation(#[from] DiffError),
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        RestError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RestError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            RestError::Calculation(e) if e.is_validation() => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            RestError::Calculation(e) => {
                tracing::error!(error = %e, "date difference calculation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_owned(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// POST /V1/datetime/calculate
///
/// The unit is passed to the calculator as sent; it must already be lower-case.
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<DiffResult>, RestError> {
    let Json(req) = payload?;

    tracing::debug!(
        start_date = %req.start_date,
        end_date = %req.end_date,
        calculation_type = %req.calculation_type,
        "REST calculate"
    );

    let result = state
        .calculator
        .calculate(&req.start_date, &req.end_date, &req.calculation_type)?;

    Ok(Json(result))
}
