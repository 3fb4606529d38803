#![deny(clippy::all, clippy::pedantic)]

use reqwest::Method;

use crate::args::DashboardsCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: DashboardsCmd) -> Result<(), CliError> {
    match cmd {
        DashboardsCmd::List => list(ctx).await,
    }
}

async fn list(ctx: &Ctx) -> Result<(), CliError> {
    let res: serde_json::Value = ctx
        .request(Method::GET, &["getDashboards"], None, None)
        .await?;
    print_json(&res)
}
