//! Cost routes (e.g., /cost-summary)

use axum::{routing::get, Router};

use crate::api::controller::cost::CostController;
use crate::app_state::AppState;

pub fn cost_routes() -> Router<AppState> {
    Router::new().route("/cost-summary", get(CostController::cost_summary))
}
