//! Infrastructure adapters and runtime bootstrap.

pub mod elasticsearch;
pub mod error;
pub mod http;
pub mod telemetry;
