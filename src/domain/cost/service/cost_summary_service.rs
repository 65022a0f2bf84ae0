use std::sync::Arc;

use tracing::{error, info, warn};

use crate::core::client::cost_reporter_trait::CostReporter;
use crate::core::persistence::cost::aws_cost_collector_repository_trait::AwsCostCollectorRepository;
use crate::core::persistence::cost::cost_snapshot_fs_adapter::CostSnapshotFsAdapter;
use crate::domain::cost::cost_error::CostError;
use crate::domain::cost::model::{CostQuery, CostReport, TimeRange};
use crate::domain::cost::service::row_normalizer::normalize;

/// Fetch → normalize → persist for the configured report window.
pub struct CostSummaryService {
    reporter: Arc<dyn CostReporter>,
    repository: Option<Arc<dyn AwsCostCollectorRepository>>,
    snapshot: Option<CostSnapshotFsAdapter>,
    report_window: TimeRange,
}

impl CostSummaryService {
    pub fn new(
        reporter: Arc<dyn CostReporter>,
        repository: Option<Arc<dyn AwsCostCollectorRepository>>,
        snapshot: Option<CostSnapshotFsAdapter>,
        report_window: TimeRange,
    ) -> Self {
        Self {
            reporter,
            repository,
            snapshot,
            report_window,
        }
    }

    pub async fn get_cost_summary(&self) -> Result<CostReport, CostError> {
        let query = CostQuery::service_breakdown(self.report_window);

        let report = self.reporter.fetch(&query).await?;

        if let Some(repository) = &self.repository {
            let rows = normalize(&report).map_err(|err| {
                error!(error = %err, "Failed to normalize cost report");
                err
            })?;
            let inserted = repository.persist(&rows).await?;
            info!(rows = rows.len(), inserted, "Cost rows persisted");
        }

        if let Some(snapshot) = &self.snapshot {
            if let Err(err) = snapshot.write(&report) {
                warn!(error = %err, path = %snapshot.path().display(), "Failed to store cost report snapshot");
            }
        }

        Ok(report)
    }
}
