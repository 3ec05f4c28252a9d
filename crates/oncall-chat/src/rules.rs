//! Deterministic rule-based responses and the LLM-attempt heuristic.

use std::sync::OnceLock;

use regex::Regex;

use oncall_core::types::{format_ts, MonitoringBundle};

/// Keywords that mark a query as worth an LLM attempt.
pub const LLM_KEYWORDS: &[&str] = &[
    "analyze",
    "explain",
    "why",
    "how",
    "what should",
    "recommend",
    "suggest",
    "help",
    "understand",
    "investigate",
    "troubleshoot",
];

pub const AI_SUGGESTIONS: &[&str] = &[
    "Show me specific error details",
    "What are the next steps to resolve this?",
    "Check related service dependencies",
    "Generate incident summary report",
];

pub const RECENT_CHANGES_SUGGESTIONS: &[&str] = &[
    "Analyze the correlation between deployments and errors",
    "What should I investigate first?",
    "Generate incident summary",
    "Show deployment rollback options",
];

pub const ERROR_DETAIL_SUGGESTIONS: &[&str] = &[
    "What's causing these errors?",
    "How can I fix this issue?",
    "Check service dependencies",
    "Show related alerts",
];

pub const HELP_SUGGESTIONS: &[&str] = &[
    "Analyze what changed in the last 2 hours",
    "What should I investigate first?",
    "Show me current system health",
    "Generate incident summary",
];

/// Whether to attempt the LLM for this query.
///
/// True on a keyword hit, a query longer than ten words, or when the
/// dialogue engine already flagged the traditional flow. The last operand
/// makes the first two redundant on the path that currently reaches this
/// check; they are kept so the policy holds if the engine ever hands over
/// without forcing the flag.
pub fn should_use_llm(query_lower: &str, use_traditional_flow: bool) -> bool {
    LLM_KEYWORDS.iter().any(|kw| query_lower.contains(kw))
        || query_lower.split_whitespace().count() > 10
        || use_traditional_flow
}

/// Explicit hour count from a "N hour(s)" phrase, defaulting to 2.
pub fn extract_hours(query_lower: &str) -> u32 {
    if !query_lower.contains("hour") {
        return 2;
    }
    static HOURS_RE: OnceLock<Regex> = OnceLock::new();
    let re = HOURS_RE.get_or_init(|| Regex::new(r"(\d+)\s*hours?").expect("Invalid hour regex"));
    re.captures(query_lower)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(2)
}

/// Markdown summary of deployments, alerts, and anomalies.
pub fn render_recent_changes(
    bundle: &MonitoringBundle,
    correlation_text: &str,
    hours: u32,
) -> String {
    let mut response = format!("## Recent Changes (Last {} hours)\n\n", hours);
    response.push_str(correlation_text);
    response.push_str("\n\n");

    if !bundle.deployments.is_empty() {
        response.push_str("### \u{1f680} Deployments\n");
        for dep in &bundle.deployments {
            response.push_str(&format!(
                "- **{}** v{} at {}\n",
                dep.service,
                dep.version,
                format_ts(dep.timestamp)
            ));
        }
        response.push('\n');
    }

    if !bundle.alerts.is_empty() {
        response.push_str("### \u{1f6a8} Active Alerts\n");
        for alert in &bundle.alerts {
            response.push_str(&format!(
                "- **{}**: {} ({}) - {}\n",
                alert.service, alert.name, alert.status, alert.duration
            ));
        }
        response.push('\n');
    }

    if !bundle.anomalies.is_empty() {
        response.push_str("### \u{1f4ca} Metric Anomalies\n");
        for anomaly in &bundle.anomalies {
            response.push_str(&format!(
                "- **{}**: {} = {} (baseline: {})\n",
                anomaly.service, anomaly.metric, anomaly.current_value, anomaly.baseline
            ));
        }
    }

    response
}

/// Markdown listing of recent error patterns, or a no-errors line.
pub fn render_error_details(bundle: &MonitoringBundle) -> String {
    if bundle.errors.is_empty() {
        return "No recent errors detected in the monitored services.".to_string();
    }
    let mut response = String::from("## Error Analysis\n\n");
    for error in &bundle.errors {
        response.push_str(&format!("### {} - {}\n", error.service, error.error_type));
        response.push_str(&format!("**Count**: {} occurrences\n", error.count));
        response.push_str(&format!("**First Seen**: {}\n", format_ts(error.first_seen)));
        response.push_str(&format!("**Sample**: `{}`\n\n", error.sample_message));
    }
    response
}

/// Help menu; the banner reflects whether an LLM provider is live.
pub fn render_help(llm_available: bool) -> String {
    let llm_status = if llm_available {
        "\u{1f916} **AI-Powered Analysis Available**"
    } else {
        "\u{1f4ca} **Rule-Based Analysis**"
    };

    format!(
        "## {}\n\n\
         I can help you investigate incidents by analyzing your monitoring data and providing intelligent insights:\n\n\
         **Smart Analysis:**\n\
         - **\"Analyze what changed in the last 2 hours\"** - AI-powered correlation analysis\n\
         - **\"Why are we seeing these errors?\"** - Root cause analysis\n\
         - **\"What should I investigate first?\"** - Prioritized action recommendations\n\
         - **\"Explain this incident impact\"** - Business impact assessment\n\n\
         **Quick Data:**\n\
         - **\"Show me error details\"** - Recent error patterns\n\
         - **\"Check active alerts\"** - Current system alerts\n\
         - **\"Recent deployments\"** - Latest changes\n\n\
         I monitor your Grafana, Prometheus, Elasticsearch, and Nagios systems.",
        llm_status
    )
}
