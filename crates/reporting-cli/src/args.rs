//! Command-line surface for `reporting-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use reporting_api_types::SortDirection;

#[derive(Parser, Debug)]
#[command(name = "reporting-cli", version, about = "Report definition API CLI", long_about = None)]
pub struct Cli {
    /// Server base URL, e.g. <http://localhost:3000>
    #[arg(long, env = "REPORTING_URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report definition management
    Definitions(DefinitionsArgs),
    /// Saved dashboards
    Dashboards(DashboardsArgs),
}

#[derive(Parser, Debug)]
pub struct DefinitionsArgs {
    #[command(subcommand)]
    pub action: DefinitionsCmd,
}

#[derive(Subcommand, Debug)]
pub enum DefinitionsCmd {
    /// List stored definitions
    List {
        #[arg(long)]
        size: Option<u32>,
        #[arg(long = "sort-field")]
        sort_field: Option<String>,
        #[arg(long = "sort-direction")]
        sort_direction: Option<SortDirectionArg>,
    },
    /// Fetch one definition by id
    Get { id: String },
    /// Create a definition from a JSON file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace a definition with the contents of a JSON file
    Update {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a definition
    Delete { id: String },
}

#[derive(Parser, Debug)]
pub struct DashboardsArgs {
    #[command(subcommand)]
    pub action: DashboardsCmd,
}

#[derive(Subcommand, Debug)]
pub enum DashboardsCmd {
    /// List saved dashboards
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortDirectionArg {
    Asc,
    Desc,
}

impl From<SortDirectionArg> for SortDirection {
    fn from(value: SortDirectionArg) -> Self {
        match value {
            SortDirectionArg::Asc => SortDirection::Asc,
            SortDirectionArg::Desc => SortDirection::Desc,
        }
    }
}
