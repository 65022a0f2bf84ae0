use async_trait::async_trait;
use tracing::error;

use crate::config::DatabaseSettings;
use crate::core::persistence::cost::aws_cost_collector_repository_trait::AwsCostCollectorRepository;
use crate::core::persistence::cost::aws_cost_entity::AwsCostEntity;
use crate::core::persistence::cost::aws_cost_pg_adapter::AwsCostPgAdapter;
use crate::domain::cost::cost_error::CostError;

/// Repository for `aws_costs` that bridges the collector trait and the Postgres adapter.
pub struct AwsCostRepository {
    adapter: AwsCostPgAdapter,
}

impl AwsCostRepository {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            adapter: AwsCostPgAdapter::new(settings),
        }
    }
}

#[async_trait]
impl AwsCostCollectorRepository for AwsCostRepository {
    async fn ensure_database(&self) -> Result<bool, CostError> {
        let database = self.adapter.database_name();
        self.adapter.ensure_database().await.map_err(|err| {
            error!(error = %err, database, "Failed to ensure cost database");
            CostError::from(err)
        })
    }

    async fn ensure_table(&self) -> Result<(), CostError> {
        let database = self.adapter.database_name();
        self.adapter.ensure_table().await.map_err(|err| {
            error!(error = %err, database, "Failed to ensure aws_costs table");
            CostError::from(err)
        })
    }

    async fn insert_rows(&self, rows: &[AwsCostEntity]) -> Result<u64, CostError> {
        let database = self.adapter.database_name();
        self.adapter.insert_rows(rows).await.map_err(|err| {
            error!(error = %err, database, rows = rows.len(), "Failed to insert cost rows");
            CostError::from(err)
        })
    }
}
