//! Monitoring data access.
//!
//! A [`MonitorConnector`] answers four source queries (deployments,
//! anomalies, error spikes, alerts); the [`MonitorHub`] fans out all four
//! concurrently and assembles a [`oncall_core::MonitoringBundle`],
//! degrading a failed source to an empty collection instead of failing
//! the whole snapshot.

pub mod connector;
pub mod hub;
pub mod mock;

pub use connector::{MonitorConnector, MonitorError};
pub use hub::MonitorHub;
pub use mock::{FailSource, MockConnector};
