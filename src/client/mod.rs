//! HTTP datasource for Prometheus-compatible backends.
//!
//! Provides [`PrometheusClient`], which implements [`Datasource`](crate::Datasource)
//! over reqwest, and its [`ClientConfig`].

mod config;
mod prometheus;

#[cfg(feature = "cli")]
pub use config::Config;
pub use config::{ClientConfig, interpolate};
pub use prometheus::PrometheusClient;
