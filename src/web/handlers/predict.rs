// POST /predict: classify one hazard description.
//
// Body: {"description": "..."}. A blank description is a 400, and a body
// that isn't that shape gets axum's rejection status with a JSON detail.
// Anything else is accepted as-is and runs through the same batch adapter the analytics
// pass uses, as a batch of one.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub predicted_hazard: String,
}

pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected predict body");
            return api_error(rejection.status(), &rejection.body_text());
        }
    };
    if body.description.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Description cannot be empty");
    }

    match state.predictor.predict_one(&body.description) {
        Ok(predicted_hazard) => {
            debug!(hazard = %predicted_hazard, "Served prediction");
            Json(PredictResponse { predicted_hazard }).into_response()
        }
        Err(e) => {
            error!(error = %e, "Prediction failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed")
        }
    }
}
