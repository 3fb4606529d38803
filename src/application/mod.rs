//! Application services layer.

pub mod dashboards;
pub mod definitions;
pub mod error;
pub mod repos;
