//! Parent-child context propagation
//!
//! A child stream is parameterized by fields of its parent's records. For
//! every parent record the router derives a [`ParentContext`], and one child
//! run is started with that context merged into its request parameters.

mod routers;
mod types;

pub use routers::ParentRouter;
pub use types::ParentContext;

#[cfg(test)]
mod tests;
