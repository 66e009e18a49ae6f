//! Role dashboards for a school management system.
//!
//! Records are loaded into a [`snapshot::Snapshot`] from JSON, CSV or
//! Postgres, and each role's dashboard is computed from it with the pure
//! aggregators in [`metrics`].

pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod snapshot;

pub use error::{Error, Result};
