//! Flota core - data access layer for the fleet-management console.
//!
//! Consumers go through [`DataAccess`]: list, get, create, update and delete
//! per [`ResourceKind`], always answered with an [`Envelope`]. List reads are
//! cached in memory for a short TTL and a successful write drops every cached
//! read of the resource it touched.

pub mod access;
pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod resources;
pub mod stats;
pub mod utils;

pub use access::{DataAccess, Resource};
pub use api::{ApiError, Envelope, HttpTransport, Operation, RawResponse, Record, Transport};
pub use cache::CacheStats;
pub use config::Config;
pub use resources::{Filters, ResourceKind, UnknownResource};
pub use stats::DashboardStats;
