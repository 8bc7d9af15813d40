//! HTTP transport
//!
//! The extraction core only sees the [`Transport`] trait: a path plus query
//! parameters in, a JSON document out. [`HttpClient`] implements it on
//! `reqwest` with the run's retry policy.
//!
//! # Features
//!
//! - **Automatic Retries**: Bounded attempts with configurable backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Static Headers**: JSON content negotiation and the account secret

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, Transport};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
