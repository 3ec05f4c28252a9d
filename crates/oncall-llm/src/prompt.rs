//! Incident-response prompt construction.

use crate::types::IncidentContext;

pub const SYSTEM_PROMPT: &str = "You are an expert incident response analyst with deep knowledge of system monitoring, troubleshooting, and root cause analysis. You help teams quickly identify and resolve production issues.

Your capabilities:
- Analyze monitoring data and correlate events
- Identify patterns in errors and performance metrics
- Suggest investigation steps and remediation actions
- Prioritize incidents based on impact and urgency
- Explain complex technical issues in clear terms

Guidelines:
- Be concise but thorough in your analysis
- Prioritize actionable insights over general advice
- Include specific commands, queries, or steps when helpful
- Highlight critical correlations and patterns
- Suggest both immediate fixes and long-term improvements
- Use emojis sparingly for visual clarity (\u{1f6a8} for critical, \u{26a0}\u{fe0f} for warnings, \u{2705} for recommendations)

Context provided:
- Recent system changes and deployments
- Active alerts and monitoring data
- Error patterns and frequency
- Service health metrics
- Automated correlation analysis";

/// Assemble the full prompt: system instructions, the populated context
/// sections as pretty-printed JSON, the user query, and the analysis
/// trailer.
pub fn build_incident_prompt(user_query: &str, context: &IncidentContext) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);

    if let Some(changes) = &context.recent_changes {
        prompt.push_str(&format!("\n## Recent Changes\n{}\n", pretty(changes)));
    }
    if let Some(alerts) = &context.active_alerts {
        if let Ok(value) = serde_json::to_value(alerts) {
            prompt.push_str(&format!("\n## Active Alerts\n{}\n", pretty(&value)));
        }
    }
    if let Some(errors) = &context.error_patterns {
        if let Ok(value) = serde_json::to_value(errors) {
            prompt.push_str(&format!("\n## Error Patterns\n{}\n", pretty(&value)));
        }
    }
    if let Some(health) = &context.service_health {
        prompt.push_str(&format!("\n## Service Health\n{}\n", pretty(health)));
    }
    if let Some(correlation) = &context.correlation_analysis {
        prompt.push_str(&format!("\n## Correlation Analysis\n{}\n", correlation));
    }

    prompt.push_str(&format!("\n## User Query\n{}\n", user_query));
    prompt.push_str("\n## Analysis\nPlease analyze the situation and provide actionable insights:");
    prompt
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
