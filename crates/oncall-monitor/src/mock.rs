use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use oncall_core::types::{Alert, Anomaly, Deployment, ErrorSpike, TimeRange};

use crate::connector::{MonitorConnector, MonitorError};

/// Which source query a [`MockConnector`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailSource {
    Deployments,
    Anomalies,
    Errors,
    Alerts,
}

/// Canned monitoring data standing in for the real backends.
///
/// Failure injection lets tests exercise the hub's per-source
/// degradation without a network.
#[derive(Debug, Default)]
pub struct MockConnector {
    failing: HashSet<FailSource>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(sources: impl IntoIterator<Item = FailSource>) -> Self {
        Self {
            failing: sources.into_iter().collect(),
        }
    }

    fn check(&self, source: FailSource, name: &str) -> Result<(), MonitorError> {
        if self.failing.contains(&source) {
            return Err(MonitorError::SourceUnavailable {
                source_name: name.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap_or_default()
}

#[async_trait]
impl MonitorConnector for MockConnector {
    async fn get_recent_deployments(
        &self,
        _range: TimeRange,
    ) -> Result<Vec<Deployment>, MonitorError> {
        self.check(FailSource::Deployments, "deployments")?;
        Ok(vec![
            Deployment {
                service: "api-gateway".to_string(),
                version: "v2.1.3".to_string(),
                timestamp: ts(2025, 1, 8, 14, 30),
                author: "devops-bot".to_string(),
                status: "success".to_string(),
            },
            Deployment {
                service: "user-service".to_string(),
                version: "v1.8.1".to_string(),
                timestamp: ts(2025, 1, 8, 13, 45),
                author: "john.doe".to_string(),
                status: "success".to_string(),
            },
        ])
    }

    async fn get_metric_anomalies(&self, _range: TimeRange) -> Result<Vec<Anomaly>, MonitorError> {
        self.check(FailSource::Anomalies, "anomalies")?;
        Ok(vec![
            Anomaly {
                metric: "response_time_p95".to_string(),
                service: "api-gateway".to_string(),
                current_value: 1250.0,
                baseline: 450.0,
                severity: "high".to_string(),
                timestamp: ts(2025, 1, 8, 14, 35),
            },
            Anomaly {
                metric: "error_rate".to_string(),
                service: "user-service".to_string(),
                current_value: 0.05,
                baseline: 0.001,
                severity: "medium".to_string(),
                timestamp: ts(2025, 1, 8, 14, 32),
            },
        ])
    }

    async fn get_error_spikes(&self, _range: TimeRange) -> Result<Vec<ErrorSpike>, MonitorError> {
        self.check(FailSource::Errors, "errors")?;
        Ok(vec![
            ErrorSpike {
                service: "api-gateway".to_string(),
                error_type: "TimeoutError".to_string(),
                count: 47,
                first_seen: ts(2025, 1, 8, 14, 31),
                sample_message: "Connection timeout to user-service after 30s".to_string(),
            },
            ErrorSpike {
                service: "user-service".to_string(),
                error_type: "DatabaseConnectionError".to_string(),
                count: 12,
                first_seen: ts(2025, 1, 8, 14, 30),
                sample_message: "Failed to connect to primary database".to_string(),
            },
        ])
    }

    async fn get_alerts(&self, _range: TimeRange) -> Result<Vec<Alert>, MonitorError> {
        self.check(FailSource::Alerts, "alerts")?;
        Ok(vec![
            Alert {
                service: "user-service".to_string(),
                name: "High Error Rate".to_string(),
                status: "CRITICAL".to_string(),
                timestamp: ts(2025, 1, 8, 14, 32),
                duration: "3m".to_string(),
            },
            Alert {
                service: "database-primary".to_string(),
                name: "Connection Pool Exhausted".to_string(),
                status: "WARNING".to_string(),
                timestamp: ts(2025, 1, 8, 14, 29),
                duration: "6m".to_string(),
            },
        ])
    }
}
