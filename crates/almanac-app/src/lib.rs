//! Library half of the `almanac` binary: settings, request loading and output.

pub mod defaults;
pub mod error;
pub mod output;
pub mod request;
