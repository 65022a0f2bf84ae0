//! Cost controller: connects routes to the cost summary service

use axum::extract::State;
use axum::Json;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::cost::model::CostReport;
use crate::errors::AppError;

pub struct CostController;

impl CostController {
    pub async fn cost_summary(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<CostReport>>, AppError> {
        let span = info_span!("cost_summary", request_id = %Uuid::new_v4());
        to_json(
            state
                .cost_service
                .get_cost_summary()
                .instrument(span)
                .await,
        )
    }
}
