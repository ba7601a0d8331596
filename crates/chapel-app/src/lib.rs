//! HTTP surface of the chapel site: read-only schedule endpoints.

pub mod app;
pub mod config;
pub mod error;
pub mod store_handler;
