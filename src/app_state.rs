use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::core::client::cost_explorer_client::CostExplorerClient;
use crate::core::client::cost_reporter_trait::CostReporter;
use crate::core::persistence::cost::aws_cost_collector_repository_trait::AwsCostCollectorRepository;
use crate::core::persistence::cost::aws_cost_repository::AwsCostRepository;
use crate::core::persistence::cost::cost_snapshot_fs_adapter::CostSnapshotFsAdapter;
use crate::domain::cost::service::cost_summary_service::CostSummaryService;

/// Immutable collaborators shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub cost_service: Arc<CostSummaryService>,
}

impl AppState {
    pub fn new(cost_service: CostSummaryService) -> Self {
        Self {
            cost_service: Arc::new(cost_service),
        }
    }
}

pub async fn build_app_state(config: &AppConfig) -> AppState {
    let reporter: Arc<dyn CostReporter> = Arc::new(CostExplorerClient::new(&config.aws).await);

    let repository = match &config.database {
        Some(settings) => {
            info!(host = %settings.host, database = %settings.name, "Persisting cost rows to Postgres");
            Some(Arc::new(AwsCostRepository::new(settings.clone())) as Arc<dyn AwsCostCollectorRepository>)
        }
        None => {
            warn!("No DB_* settings found; cost rows will not be persisted");
            None
        }
    };

    let snapshot = config.snapshot_path.clone().map(CostSnapshotFsAdapter::new);

    AppState::new(CostSummaryService::new(
        reporter,
        repository,
        snapshot,
        config.report_window,
    ))
}
