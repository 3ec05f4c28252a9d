//! Correlation analysis over monitoring bundles.

pub mod correlate;

pub use correlate::CorrelationAnalyzer;
