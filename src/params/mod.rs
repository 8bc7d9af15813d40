//! Request parameter construction
//!
//! Each request's query parameters are rebuilt from scratch by a
//! [`ParameterBuilder`]: static configuration, the resumed bookmark, operator
//! overrides and the pagination token are layered in a fixed order so that
//! later layers win.

mod builders;
mod types;

pub use builders::{ContextParams, SurveyResponseParams};
pub use types::{ParameterBuilder, RequestContext};

#[cfg(test)]
mod tests;
