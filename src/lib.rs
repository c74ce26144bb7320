//! This crate provides a scan report server. It exposes scan records through a filtered HTTP
//! query surface, joining each scan with the widget and algorithm that describe it and rendering
//! its predicted values into a single display string.
//!
//! Reports are produced by a small pipeline:
//!
//! * [filter] narrows the scans held by the [store] by user, device and sample time.
//! * [report] joins each scan with its widget and algorithm, orders its parameters and renders
//!   each value according to the unit in the widget's configuration (see [format]).
//! * [service] ties the two together over any [store::ScanRepository].
//!
//! The server is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team, on top of the [hyper] HTTP library.
//! * [Serde](serde) performs (de)serialisation of JSON request and response data.
//! * [validator] checks request data before it reaches the store.

pub mod app;
pub mod app_state;
pub mod cli;
pub mod error;
pub mod filter;
pub mod format;
pub mod metrics;
pub mod models;
pub mod report;
pub mod server;
pub mod service;
pub mod store;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
pub mod validated;
