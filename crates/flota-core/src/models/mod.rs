//! Typed entities for the fleet database.
//!
//! Records arrive as untyped JSON maps; these structs are built from them at a
//! single point (`Envelope::decode`). Backend columns are Spanish, so every
//! field carries a serde rename. Columns not listed here are ignored.
//!
//! - `CatalogItem`: reference catalogs (brands, colors, fuels, ...)
//! - `Model`, `Lessor`, `Attorney`: catalogs with a parent relation
//! - `Vehicle`: the fleet itself
//! - `Collaborator`, `Task`: staff and their work items

pub mod catalog;
pub mod collaborator;
pub mod task;
pub mod vehicle;

pub use catalog::{Attorney, Brand, CatalogItem, Lessor, Model, NameRef};
pub use collaborator::Collaborator;
pub use task::{Task, TaskPriority, TaskStatus, TaskVehicle};
pub use vehicle::Vehicle;
