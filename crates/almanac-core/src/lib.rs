//! Shared configuration, error and constant definitions for almanac.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
