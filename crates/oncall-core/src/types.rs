use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ====== Conversation ======

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation, as stored in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Optional annotations, e.g. LLM provider name and token count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn with_metadata(
        role: Role,
        content: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: Some(metadata),
        }
    }
}

// ====== Monitoring signals ======

/// A recorded service deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub status: String,
}

/// A metric deviating from its baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub metric: String,
    pub service: String,
    pub current_value: f64,
    pub baseline: f64,
    pub severity: String,
    pub timestamp: DateTime<Utc>,
}

/// An error pattern spiking in the logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSpike {
    pub service: String,
    pub error_type: String,
    pub count: u64,
    pub first_seen: DateTime<Utc>,
    pub sample_message: String,
}

/// A firing alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub service: String,
    #[serde(rename = "alert")]
    pub name: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub duration: String,
}

/// The time window a bundle covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// The window ending now and starting `hours` hours ago.
    pub fn last_hours(hours: u32) -> Self {
        let end = Utc::now();
        let start = end - chrono::Duration::hours(i64::from(hours));
        Self { start, end }
    }
}

/// A fresh per-request snapshot of all monitoring signals.
///
/// Sources that failed to answer contribute an empty collection rather
/// than failing the bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringBundle {
    pub deployments: Vec<Deployment>,
    pub anomalies: Vec<Anomaly>,
    pub errors: Vec<ErrorSpike>,
    pub alerts: Vec<Alert>,
    pub time_range: TimeRange,
}

impl MonitoringBundle {
    pub fn empty(time_range: TimeRange) -> Self {
        Self {
            deployments: Vec::new(),
            anomalies: Vec::new(),
            errors: Vec::new(),
            alerts: Vec::new(),
            time_range,
        }
    }
}

// ====== Escalation ======

/// Payload shape for outward incident notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentAlert {
    pub severity: String,
    pub service: String,
    pub alert_name: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_data: Option<serde_json::Value>,
}

/// Format a timestamp the way the monitoring backends report them,
/// seconds precision with a `Z` suffix.
pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_message_serde() {
        let msg = Message::new(Role::User, "hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
        // metadata omitted when absent
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_message_metadata_roundtrip() {
        let mut metadata = HashMap::new();
        metadata.insert("provider".to_string(), serde_json::json!("mock"));
        metadata.insert("tokens_used".to_string(), serde_json::json!(42));
        let msg = Message::with_metadata(Role::Assistant, "analysis", metadata);

        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        let meta = back.metadata.unwrap();
        assert_eq!(meta["provider"], "mock");
        assert_eq!(meta["tokens_used"], 42);
    }

    #[test]
    fn test_alert_field_rename() {
        let json = r#"{
            "service": "user-service",
            "alert": "High Error Rate",
            "status": "CRITICAL",
            "timestamp": "2025-01-08T14:32:00Z",
            "duration": "3m"
        }"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.name, "High Error Rate");
        let back = serde_json::to_value(&alert).unwrap();
        assert_eq!(back["alert"], "High Error Rate");
    }

    #[test]
    fn test_time_range_last_hours() {
        let range = TimeRange::last_hours(2);
        let span = range.end - range.start;
        assert_eq!(span.num_hours(), 2);
    }

    #[test]
    fn test_format_ts() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 8, 14, 30, 0).unwrap();
        assert_eq!(format_ts(ts), "2025-01-08T14:30:00Z");
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = MonitoringBundle::empty(TimeRange::last_hours(1));
        assert!(bundle.deployments.is_empty());
        assert!(bundle.alerts.is_empty());
    }

    #[test]
    fn test_incident_alert_optional_fields_omitted() {
        let alert = IncidentAlert {
            severity: "critical".to_string(),
            service: "api-gateway".to_string(),
            alert_name: "High Error Rate".to_string(),
            timestamp: Utc::now(),
            description: "error rate above baseline".to_string(),
            metric_value: None,
            baseline_value: None,
            correlation_data: None,
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert!(json.get("metric_value").is_none());
        assert!(json.get("correlation_data").is_none());
    }
}
