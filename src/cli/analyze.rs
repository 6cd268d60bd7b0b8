use crate::cli::report::print;
use crate::cli::{load_tables, OutputFormat};
use crate::error::Result;
use crate::matcher::{enrich, NameSet, PatternMode};
use crate::reports;

fn pattern_mode(raw_pattern: bool) -> PatternMode {
    if raw_pattern {
        PatternMode::Raw
    } else {
        PatternMode::Literal
    }
}

pub fn exact(data_dir: Option<&str>, format: OutputFormat) -> Result<()> {
    let tables = load_tables(data_dir)?;
    let names = NameSet::from_deputies(&tables.deputies);
    print(&[reports::exact_supplier_matches(&tables, &names)], format)
}

pub fn suspects(data_dir: Option<&str>, format: OutputFormat, sole_proprietors: bool) -> Result<()> {
    let tables = load_tables(data_dir)?;
    let names = NameSet::from_deputies(&tables.deputies);
    let enriched = enrich(&tables);
    print(
        &[reports::suspect_companies(&enriched, &names, sole_proprietors)],
        format,
    )
}

pub fn scan(data_dir: Option<&str>, format: OutputFormat, raw_pattern: bool) -> Result<()> {
    let tables = load_tables(data_dir)?;
    let names = NameSet::from_deputies(&tables.deputies);
    let report = reports::substring_supplier_matches(&tables, &names, pattern_mode(raw_pattern))?;
    print(&[report], format)
}

pub fn self_named(data_dir: Option<&str>, format: OutputFormat) -> Result<()> {
    let tables = load_tables(data_dir)?;
    let enriched = enrich(&tables);
    print(&[reports::self_named(&enriched)], format)
}

pub fn run(data_dir: Option<&str>, format: OutputFormat, raw_pattern: bool) -> Result<()> {
    let tables = load_tables(data_dir)?;
    let all = reports::full_run(&tables, pattern_mode(raw_pattern))?;
    for report in &all {
        tracing::info!(report = report.key, rows = report.rows.len(), "analysis finished");
    }
    print(&all, format)
}
