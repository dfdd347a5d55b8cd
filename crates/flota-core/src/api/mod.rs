//! REST request layer for the hosted fleet database.
//!
//! This module provides the `RequestExecutor`, which performs a single call
//! through a `Transport` and normalizes the outcome into an `Envelope`, plus
//! the `Query` builder for the backend's filter grammar.
//!
//! Every request carries the project's static API key both as `apikey` and as
//! the bearer credential.

pub mod envelope;
pub mod error;
pub mod executor;
pub mod query;
pub mod transport;

pub use envelope::{Envelope, Record};
pub use error::ApiError;
pub use executor::RequestExecutor;
pub use query::{Direction, Query};
pub use transport::{HttpTransport, Operation, RawResponse, Transport};
