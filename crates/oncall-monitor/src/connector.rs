use async_trait::async_trait;
use thiserror::Error;

use oncall_core::types::{Alert, Anomaly, Deployment, ErrorSpike, TimeRange};
use oncall_core::OncallError;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Monitoring source '{source_name}' unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("Monitoring query failed: {0}")]
    QueryFailed(String),
}

impl From<MonitorError> for OncallError {
    fn from(err: MonitorError) -> Self {
        OncallError::Monitor(err.to_string())
    }
}

/// Interface to the observability backends.
///
/// Each query covers one signal source and fails independently; the hub
/// is responsible for tolerating per-source failures.
#[async_trait]
pub trait MonitorConnector: Send + Sync {
    async fn get_recent_deployments(&self, range: TimeRange)
        -> Result<Vec<Deployment>, MonitorError>;

    async fn get_metric_anomalies(&self, range: TimeRange) -> Result<Vec<Anomaly>, MonitorError>;

    async fn get_error_spikes(&self, range: TimeRange) -> Result<Vec<ErrorSpike>, MonitorError>;

    async fn get_alerts(&self, range: TimeRange) -> Result<Vec<Alert>, MonitorError>;
}
