//! Resource collections and their read/write query shapes.
//!
//! Each `ResourceKind` knows its backend collection, the relations its reads
//! always expand, its ordering, and which named `Filters` it understands.

pub mod filters;
pub mod kind;

pub use filters::Filters;
pub use kind::{ResourceKind, UnknownResource};
