use std::{process, sync::Arc};

use reporting::{
    application::{
        dashboards::DashboardService,
        definitions::{PageLimits, ReportDefinitionService},
        error::AppError,
    },
    config,
    domain::validate_definition,
    infra::{
        elasticsearch::ElasticsearchRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Validate(args) => run_validate(args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = Arc::new(ElasticsearchRepositories::connect(&settings.store)?);
    if let Err(err) = store.ensure_index().await {
        warn!(
            target = "reporting::store",
            index = %store.index(),
            error = %err,
            "could not verify the report definitions index; continuing"
        );
    }

    let limits = PageLimits {
        default_size: settings.api.default_page_size.get(),
        max_size: settings.api.max_page_size.get(),
    };
    let state = ApiState {
        definitions: Arc::new(ReportDefinitionService::new(store.clone(), limits)),
        dashboards: Arc::new(DashboardService::new(store.clone())),
        store_health: store,
    };

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        addr = %settings.server.addr,
        store = %settings.store.url,
        index = %settings.store.index,
        "reporting api listening"
    );

    http::serve(
        listener,
        http::build_router(state),
        settings.server.graceful_shutdown,
    )
    .await?;

    info!("reporting api stopped");
    Ok(())
}

async fn run_validate(args: config::ValidateArgs) -> Result<(), AppError> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let document: serde_json::Value = serde_json::from_str(&raw).map_err(|err| {
        AppError::unexpected(format!("{} is not valid JSON: {err}", args.file.display()))
    })?;

    let definition = validate_definition(&document)?;
    println!(
        "{}: ok ({}, {})",
        args.file.display(),
        definition.report_name,
        definition.report_params.source()
    );
    Ok(())
}
