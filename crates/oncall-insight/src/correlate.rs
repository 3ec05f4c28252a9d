use std::collections::BTreeSet;

use tracing::debug;

use oncall_core::types::{format_ts, MonitoringBundle};

/// Derives human-readable correlation findings from a monitoring bundle.
#[derive(Debug, Default)]
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Findings in emission order: one per deployment with errors seen
    /// after it (input deployment order), then at most one multi-service
    /// impact finding. May be empty.
    pub fn analyze(&self, bundle: &MonitoringBundle) -> Vec<String> {
        let mut findings = Vec::new();

        for deployment in &bundle.deployments {
            let related = bundle
                .errors
                .iter()
                .filter(|e| e.service == deployment.service && e.first_seen > deployment.timestamp)
                .count();
            if related > 0 {
                findings.push(format!(
                    "\u{1f6a8} **Deployment Correlation**: {} v{} deployed at {} followed by {} error types",
                    deployment.service,
                    deployment.version,
                    format_ts(deployment.timestamp),
                    related
                ));
            }
        }

        // Services touched by errors or anomalies; sorted for stable output.
        let affected: BTreeSet<&str> = bundle
            .errors
            .iter()
            .map(|e| e.service.as_str())
            .chain(bundle.anomalies.iter().map(|a| a.service.as_str()))
            .collect();
        if affected.len() > 1 {
            let services: Vec<&str> = affected.into_iter().collect();
            findings.push(format!(
                "\u{26a0}\u{fe0f} **Multi-Service Impact**: {} services affected: {}",
                services.len(),
                services.join(", ")
            ));
        }

        debug!("Correlation analysis produced {} finding(s)", findings.len());
        findings
    }

    /// Joined finding text, or the fixed no-correlations line.
    pub fn render(&self, findings: &[String]) -> String {
        if findings.is_empty() {
            "No significant correlations detected.".to_string()
        } else {
            findings.join("\n")
        }
    }

    /// Analyze and render in one step.
    pub fn summarize(&self, bundle: &MonitoringBundle) -> String {
        self.render(&self.analyze(bundle))
    }
}
