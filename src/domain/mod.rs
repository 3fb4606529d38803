//! Domain layer: report definition types, validation and invariants.

pub mod definitions;
pub mod error;
pub mod schedule;
pub mod types;
pub mod validation;

pub use definitions::ReportDefinition;
pub use error::ValidationError;
pub use validation::validate_definition;
