//! Shared configuration, error types and schedule value types for the chapel site.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod util;
