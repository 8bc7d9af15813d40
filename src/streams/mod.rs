//! Stream definitions and registry
//!
//! Each known stream is a [`StreamKind`] variant. The kind supplies an
//! immutable [`StreamDefinition`] plus the pagination and parameter
//! strategies the engine composes for it; nothing is inherited or overridden.

mod registry;
mod types;

pub use registry::{Stream, StreamKind, StreamRegistry};
pub use types::{Catalog, CatalogEntry, ParentLink, StreamDefinition};
