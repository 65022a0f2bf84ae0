use async_trait::async_trait;

use crate::core::persistence::cost::aws_cost_entity::AwsCostEntity;
use crate::domain::cost::cost_error::CostError;

/// Write-side repository for the `aws_costs` table.
#[async_trait]
pub trait AwsCostCollectorRepository: Send + Sync {
    /// Creates the configured database when the server does not have it yet.
    /// Returns `true` when it was created by this call.
    async fn ensure_database(&self) -> Result<bool, CostError>;

    /// Creates `aws_costs` when absent.
    async fn ensure_table(&self) -> Result<(), CostError>;

    /// Appends the rows in one transaction and returns the inserted count.
    async fn insert_rows(&self, rows: &[AwsCostEntity]) -> Result<u64, CostError>;

    /// Provision then load. Steps run in order and stop at the first failure;
    /// earlier steps are not undone.
    async fn persist(&self, rows: &[AwsCostEntity]) -> Result<u64, CostError> {
        self.ensure_database().await?;
        self.ensure_table().await?;
        if rows.is_empty() {
            return Ok(0);
        }
        self.insert_rows(rows).await
    }
}
