//! HTTP client module
//!
//! Issues page requests on behalf of the pagination driver.
//!
//! # Features
//!
//! - **Automatic Retries**: transient failures never surface as pages
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Authentication**: Integration with auth module

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
