//! Core contracts for schemadoc.
//!
//! This crate defines the schema snapshot handed to the renderer: the ordered
//! table descriptors, their columns, indexes and constraints, and the
//! validation applied when a snapshot is loaded.

pub mod constraints;
pub mod error;
pub mod schema;
pub mod validation;

pub use constraints::{ConstraintDescriptor, ConstraintKind, ForeignKeyRef, IndexDescriptor};
pub use error::{Error, Result};
pub use schema::{ColumnDescriptor, SchemaSnapshot, TableDescriptor};
pub use validation::validate_snapshot;
