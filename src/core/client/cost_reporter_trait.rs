use async_trait::async_trait;

use crate::domain::cost::cost_error::CostError;
use crate::domain::cost::model::{CostQuery, CostReport};

/// Source of cost-and-usage reports (Cost Explorer in production).
#[async_trait]
pub trait CostReporter: Send + Sync {
    /// Runs one report query. Credential problems surface as
    /// `MissingCredentials`/`IncompleteCredentials`, everything the service
    /// rejects as `UpstreamError`.
    async fn fetch(&self, query: &CostQuery) -> Result<CostReport, CostError>;
}
