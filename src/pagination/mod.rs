//! Pagination module
//!
//! Supports: response-body cursor (`cursor.before`) and single-request streams.
//!
//! # Overview
//!
//! A [`PaginationStrategy`] inspects a raw response and yields the token for
//! the next request, or nothing when the stream is exhausted. The token is
//! handed to the request parameter builder, which places it in the request.

mod strategies;
mod types;

pub use strategies::{CursorPaginator, NoPaginator};
pub use types::{NextPage, PageCursor, PaginationState, PaginationStrategy};

#[cfg(test)]
mod tests;
