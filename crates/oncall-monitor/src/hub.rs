use std::sync::Arc;

use tracing::warn;

use oncall_core::types::{MonitoringBundle, TimeRange};

use crate::connector::MonitorConnector;

/// Fans out the four source queries and assembles a bundle.
pub struct MonitorHub {
    connector: Arc<dyn MonitorConnector>,
}

impl MonitorHub {
    pub fn new(connector: Arc<dyn MonitorConnector>) -> Self {
        Self { connector }
    }

    /// Snapshot of the last `hours` hours across all four sources.
    ///
    /// The queries run concurrently; a source that errors contributes an
    /// empty collection and a warning rather than failing the snapshot.
    pub async fn query_recent_changes(&self, hours: u32) -> MonitoringBundle {
        let range = TimeRange::last_hours(hours);

        let (deployments, anomalies, errors, alerts) = tokio::join!(
            self.connector.get_recent_deployments(range),
            self.connector.get_metric_anomalies(range),
            self.connector.get_error_spikes(range),
            self.connector.get_alerts(range),
        );

        MonitoringBundle {
            deployments: deployments.unwrap_or_else(|e| {
                warn!("Deployment query failed: {}", e);
                Vec::new()
            }),
            anomalies: anomalies.unwrap_or_else(|e| {
                warn!("Anomaly query failed: {}", e);
                Vec::new()
            }),
            errors: errors.unwrap_or_else(|e| {
                warn!("Error-spike query failed: {}", e);
                Vec::new()
            }),
            alerts: alerts.unwrap_or_else(|e| {
                warn!("Alert query failed: {}", e);
                Vec::new()
            }),
            time_range: range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FailSource, MockConnector};

    #[tokio::test]
    async fn test_bundle_gathers_all_sources() {
        let hub = MonitorHub::new(Arc::new(MockConnector::new()));
        let bundle = hub.query_recent_changes(2).await;

        assert_eq!(bundle.deployments.len(), 2);
        assert_eq!(bundle.anomalies.len(), 2);
        assert_eq!(bundle.errors.len(), 2);
        assert_eq!(bundle.alerts.len(), 2);
        let span = bundle.time_range.end - bundle.time_range.start;
        assert_eq!(span.num_hours(), 2);
    }

    #[tokio::test]
    async fn test_failed_source_degrades_to_empty() {
        let hub = MonitorHub::new(Arc::new(MockConnector::failing([FailSource::Errors])));
        let bundle = hub.query_recent_changes(2).await;

        assert!(bundle.errors.is_empty());
        assert_eq!(bundle.deployments.len(), 2);
        assert_eq!(bundle.anomalies.len(), 2);
        assert_eq!(bundle.alerts.len(), 2);
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty_bundle() {
        let hub = MonitorHub::new(Arc::new(MockConnector::failing([
            FailSource::Deployments,
            FailSource::Anomalies,
            FailSource::Errors,
            FailSource::Alerts,
        ])));
        let bundle = hub.query_recent_changes(1).await;

        assert!(bundle.deployments.is_empty());
        assert!(bundle.anomalies.is_empty());
        assert!(bundle.errors.is_empty());
        assert!(bundle.alerts.is_empty());
    }
}
