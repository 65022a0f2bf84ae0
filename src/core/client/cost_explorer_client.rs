use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::DateInterval;
use aws_sdk_costexplorer::Client;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::config::AwsSettings;
use crate::core::client::cost_reporter_trait::CostReporter;
use crate::core::client::mappers::{
    map_cost_and_usage_output, to_sdk_granularity, to_sdk_group_definition,
};
use crate::domain::cost::cost_error::CostError;
use crate::domain::cost::model::{CostQuery, CostReport, DATE_FORMAT};

/// Where the client gets its credentials from, decided once from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Access key and secret both configured.
    Static,
    /// Only one of access key and secret configured.
    Incomplete,
    /// Nothing configured; the SDK default chain (env, profile, IMDS, ...) decides.
    DefaultChain,
}

impl CredentialSource {
    pub fn from_settings(settings: &AwsSettings) -> Self {
        match (&settings.access_key_id, &settings.secret_access_key) {
            (Some(_), Some(_)) => CredentialSource::Static,
            (None, None) => CredentialSource::DefaultChain,
            _ => CredentialSource::Incomplete,
        }
    }
}

/// Cost Explorer backed [`CostReporter`].
pub struct CostExplorerClient {
    client: Client,
    credentials_provider: Option<SharedCredentialsProvider>,
    source: CredentialSource,
}

impl CostExplorerClient {
    pub async fn new(settings: &AwsSettings) -> Self {
        let source = CredentialSource::from_settings(settings);
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(settings.region.clone()));

        if let (Some(key), Some(secret)) = (&settings.access_key_id, &settings.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key.clone(),
                secret.clone(),
                settings.session_token.clone(),
                None,
                "awscost-config",
            ));
        }

        let sdk_config = loader.load().await;
        debug!(region = %settings.region, ?source, "Cost Explorer client configured");
        Self::from_sdk_config(&sdk_config, source)
    }

    pub fn from_sdk_config(config: &SdkConfig, source: CredentialSource) -> Self {
        Self {
            client: Client::new(config),
            credentials_provider: config.credentials_provider(),
            source,
        }
    }
}

/// Resolves credentials up front so credential problems are told apart from
/// service errors.
pub(crate) async fn check_credentials(
    source: CredentialSource,
    provider: Option<&SharedCredentialsProvider>,
) -> Result<(), CostError> {
    if source == CredentialSource::Incomplete {
        return Err(CostError::IncompleteCredentials);
    }

    let provider = provider.ok_or(CostError::MissingCredentials)?;
    match provider.provide_credentials().await {
        Ok(_) => Ok(()),
        Err(CredentialsError::CredentialsNotLoaded(_)) => Err(CostError::MissingCredentials),
        Err(err) => Err(CostError::UpstreamError(DisplayErrorContext(&err).to_string())),
    }
}

#[async_trait]
impl CostReporter for CostExplorerClient {
    async fn fetch(&self, query: &CostQuery) -> Result<CostReport, CostError> {
        query.validate()?;

        if let Err(err) = check_credentials(self.source, self.credentials_provider.as_ref()).await {
            error!(error = %err, "AWS credentials unavailable");
            return Err(err);
        }

        let time_period = DateInterval::builder()
            .start(query.time_period.start.format(DATE_FORMAT).to_string())
            .end(query.time_period.end.format(DATE_FORMAT).to_string())
            .build()
            .map_err(|err| CostError::InvalidQuery(err.to_string()))?;

        let mut request = self
            .client
            .get_cost_and_usage()
            .time_period(time_period)
            .granularity(to_sdk_granularity(query.granularity));
        for metric in query.metrics.iter() {
            request = request.metrics(metric.as_str());
        }
        for group in &query.group_by {
            request = request.group_by(to_sdk_group_definition(group));
        }

        let output = request.send().await.map_err(|err| {
            let message = DisplayErrorContext(&err).to_string();
            error!(error = %message, "GetCostAndUsage failed");
            CostError::UpstreamError(message)
        })?;

        let report = map_cost_and_usage_output(&output)?;

        let outside = report
            .results_by_time
            .iter()
            .filter(|r| !query.time_period.contains(r.time_period.start))
            .count();
        if outside > 0 {
            warn!(outside, "Cost Explorer returned buckets outside the requested window");
        }

        info!(
            start = %query.time_period.start,
            end = %query.time_period.end,
            metrics = query.metrics.len(),
            buckets = report.results_by_time.len(),
            groups = report.group_count(),
            "Fetched cost and usage report"
        );
        Ok(report)
    }
}
