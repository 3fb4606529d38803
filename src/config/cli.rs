use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the reporting binary.
#[derive(Debug, Parser)]
#[command(name = "reporting", version, about = "Report definition service")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "REPORTING_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the reporting HTTP API.
    Serve(Box<ServeArgs>),
    /// Validate a report definition file without contacting the store.
    Validate(ValidateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the Elasticsearch base URL.
    #[arg(long = "store-url", value_name = "URL")]
    pub store_url: Option<String>,

    /// Override the index holding report definitions.
    #[arg(long = "store-index", value_name = "NAME")]
    pub store_index: Option<String>,

    /// Override the index holding saved objects.
    #[arg(long = "store-saved-objects-index", value_name = "NAME")]
    pub store_saved_objects_index: Option<String>,

    /// Override the per-request store timeout.
    #[arg(long = "store-timeout-seconds", value_name = "SECONDS")]
    pub store_timeout_seconds: Option<u64>,

    /// Override the default page size for list requests.
    #[arg(long = "api-default-page-size", value_name = "COUNT")]
    pub api_default_page_size: Option<u32>,

    /// Override the maximum page size for list requests.
    #[arg(long = "api-max-page-size", value_name = "COUNT")]
    pub api_max_page_size: Option<u32>,
}

#[derive(Debug, Args, Clone)]
pub struct ValidateArgs {
    /// Path to a JSON report definition.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}
