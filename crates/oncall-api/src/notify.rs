//! Outward incident notification.
//!
//! Delivery (Teams cards, ticketing) lives behind the [`Notifier`] trait;
//! the service itself only produces [`IncidentAlert`] payloads. The
//! default implementation just logs.

use async_trait::async_trait;
use tracing::info;

use oncall_core::types::IncidentAlert;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an incident alert outward. Returns whether delivery
    /// succeeded; failures are reported, never propagated.
    async fn notify_incident(&self, alert: &IncidentAlert) -> bool;
}

/// Notifier that records alerts in the log and claims success.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_incident(&self, alert: &IncidentAlert) -> bool {
        info!(
            service = %alert.service,
            severity = %alert.severity,
            alert_name = %alert.alert_name,
            "incident alert received"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_log_notifier_accepts_alert() {
        let notifier = LogNotifier;
        let alert = IncidentAlert {
            severity: "high".to_string(),
            service: "api-gateway".to_string(),
            alert_name: "High Error Rate".to_string(),
            timestamp: Utc::now(),
            description: "error rate above baseline".to_string(),
            metric_value: Some(0.05),
            baseline_value: Some(0.001),
            correlation_data: None,
        };
        assert!(notifier.notify_incident(&alert).await);
    }
}
