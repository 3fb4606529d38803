#![deny(clippy::all, clippy::pedantic)]

pub mod dashboards;
pub mod definitions;
