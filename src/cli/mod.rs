pub mod analyze;
pub mod deputy;
pub mod init;
pub mod report;
pub mod status;

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::Result;
use crate::loader::DatasetLoader;
use crate::models::Tables;
use crate::normalize::normalize_tables;
use crate::settings::{load_settings, DatasetPaths};

#[derive(Parser)]
#[command(
    name = "namesake",
    version,
    about = "Flag congressional reimbursements paid to suppliers named after congresspeople."
)]
pub struct Cli {
    /// Directory holding the datasets (default: configured data_dir)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Output format for match reports
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remember a data directory and create it.
    Init,
    /// Show dataset locations, sizes, fingerprints and row counts.
    Status,
    /// Reimbursements whose supplier is exactly a congressperson's civil name.
    Exact,
    /// Supplier, company name or trade name equal to a congressperson's civil name.
    Suspects {
        /// Only companies registered as EMPRESARIO (INDIVIDUAL), code 213-5
        #[arg(long = "sole-proprietors")]
        sole_proprietors: bool,
    },
    /// Suppliers containing a congressperson's civil name anywhere.
    Scan {
        /// Join names into the pattern unescaped, so regex metacharacters apply
        #[arg(long = "raw-pattern")]
        raw_pattern: bool,
    },
    /// Reimbursements paid to the congressperson's own name.
    SelfNamed,
    /// Look up deputies by civil name.
    Deputy {
        /// Civil name; accents and case are ignored
        name: String,
    },
    /// Run every analysis in order.
    Run {
        /// Join names into the scan pattern unescaped
        #[arg(long = "raw-pattern")]
        raw_pattern: bool,
    },
}

pub(crate) fn dataset_paths(data_dir: Option<&str>) -> DatasetPaths {
    load_settings().dataset_paths(data_dir)
}

/// Load all three datasets and run the one-time normalization pass.
pub(crate) fn load_tables(data_dir: Option<&str>) -> Result<Tables> {
    let loader = DatasetLoader::new(dataset_paths(data_dir));
    let mut tables = loader.load_all()?;
    normalize_tables(&mut tables);
    Ok(tables)
}
