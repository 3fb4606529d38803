#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use reporting_api_types::{ReportConfigHit, ReportConfigListResponse, SortDirection};
use reqwest::Method;

use crate::args::{DefinitionsCmd, SortDirectionArg};
use crate::client::{CliError, Ctx};
use crate::io::read_json_file;
use crate::print::print_json;

const COLLECTION: &str = "reportConfigs";
const CREATE: &str = "reportConfig";

pub async fn handle(ctx: &Ctx, cmd: DefinitionsCmd) -> Result<(), CliError> {
    match cmd {
        DefinitionsCmd::List {
            size,
            sort_field,
            sort_direction,
        } => list(ctx, size, sort_field, sort_direction).await,
        DefinitionsCmd::Get { id } => get(ctx, &id).await,
        DefinitionsCmd::Create { file } => create(ctx, &file).await,
        DefinitionsCmd::Update { id, file } => update(ctx, &id, &file).await,
        DefinitionsCmd::Delete { id } => delete(ctx, &id).await,
    }
}

async fn list(
    ctx: &Ctx,
    size: Option<u32>,
    sort_field: Option<String>,
    sort_direction: Option<SortDirectionArg>,
) -> Result<(), CliError> {
    let mut q = Vec::new();
    if let Some(size) = size {
        q.push(("size", size.to_string()));
    }
    if let Some(field) = sort_field {
        q.push(("sortField", field));
    }
    if let Some(direction) = sort_direction {
        q.push(("sortDirection", SortDirection::from(direction).as_str().to_string()));
    }
    let res: ReportConfigListResponse = ctx
        .request(Method::GET, &[COLLECTION], Some(&q), None)
        .await?;
    print_json(&res)
}

async fn get(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    let res: ReportConfigHit = ctx
        .request(Method::GET, &[COLLECTION, id], None, None)
        .await?;
    print_json(&res)
}

async fn create(ctx: &Ctx, file: &Path) -> Result<(), CliError> {
    let document = read_json_file(file).await?;
    let id: String = ctx
        .request(Method::POST, &[CREATE], None, Some(document))
        .await?;
    print_json(&serde_json::json!({ "_id": id }))
}

async fn update(ctx: &Ctx, id: &str, file: &Path) -> Result<(), CliError> {
    let document = read_json_file(file).await?;
    let id: String = ctx
        .request(Method::PUT, &[COLLECTION, id], None, Some(document))
        .await?;
    print_json(&serde_json::json!({ "_id": id }))
}

async fn delete(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    ctx.request_no_body(Method::DELETE, &[COLLECTION, id]).await?;
    print_json(&serde_json::json!({ "_id": id, "deleted": true }))
}
