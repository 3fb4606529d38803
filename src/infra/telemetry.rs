use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::definitions::{
    METRIC_DEFINITIONS_CREATED, METRIC_DEFINITIONS_DELETED, METRIC_DEFINITIONS_UPDATED,
    METRIC_STORE_ERRORS, METRIC_VALIDATION_FAILURES,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_DEFINITIONS_CREATED,
            Unit::Count,
            "Total number of report definitions created."
        );
        describe_counter!(
            METRIC_DEFINITIONS_UPDATED,
            Unit::Count,
            "Total number of report definitions replaced."
        );
        describe_counter!(
            METRIC_DEFINITIONS_DELETED,
            Unit::Count,
            "Total number of report definitions deleted."
        );
        describe_counter!(
            METRIC_VALIDATION_FAILURES,
            Unit::Count,
            "Total number of submitted report definitions rejected by validation."
        );
        describe_counter!(
            METRIC_STORE_ERRORS,
            Unit::Count,
            "Total number of failed requests to the document store."
        );
    });
}
