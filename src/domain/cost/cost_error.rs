use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::cost::model::CostMetric;

/// Failures of the fetch → normalize → persist pipeline.
#[derive(Debug, Error)]
pub enum CostError {
    #[error("AWS credentials not found")]
    MissingCredentials,

    #[error("Incomplete AWS credentials")]
    IncompleteCredentials,

    #[error("Cost Explorer request failed: {0}")]
    UpstreamError(String),

    #[error("Invalid cost query: {0}")]
    InvalidQuery(String),

    #[error("Group in bucket starting {bucket} has no keys")]
    MissingGroupKey { bucket: NaiveDate },

    #[error("Metric {metric} missing for service {service}")]
    MissingMetric { service: String, metric: CostMetric },

    #[error("Malformed amount {amount:?} for metric {metric}")]
    MalformedAmount { metric: CostMetric, amount: String },

    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

impl CostError {
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            CostError::MissingCredentials | CostError::IncompleteCredentials
        )
    }
}

impl From<validator::ValidationErrors> for CostError {
    fn from(err: validator::ValidationErrors) -> Self {
        CostError::InvalidQuery(err.to_string())
    }
}

impl From<sqlx::Error> for CostError {
    fn from(err: sqlx::Error) -> Self {
        CostError::PersistenceError(err.to_string())
    }
}
