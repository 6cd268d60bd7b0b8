use std::io::Write;

use comfy_table::{Cell, Table};

use crate::cli::dataset_paths;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::loader::{dataset_fingerprint, DatasetKind, DatasetLoader, ALL_DATASETS};
use crate::models::Tables;
use crate::normalize::normalize_tables;
use crate::reports::name_summary;

pub fn run(data_dir: Option<&str>) -> Result<()> {
    let loader = DatasetLoader::new(dataset_paths(data_dir));
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_status(&loader, &mut lock)
}

fn row_count(tables: &Tables, kind: DatasetKind) -> usize {
    match kind {
        DatasetKind::Reimbursements => tables.reimbursements.len(),
        DatasetKind::Companies => tables.companies.len(),
        DatasetKind::Deputies => tables.deputies.len(),
    }
}

/// Each dataset is parsed once; row counts come from the loaded tables.
pub fn write_status(loader: &DatasetLoader, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Data dir:   {}", loader.paths().data_dir.display())?;

    let all_present = ALL_DATASETS
        .iter()
        .all(|kind| loader.paths().path_for(*kind).exists());
    let mut tables = Tables::default();
    if all_present {
        tables = loader.load_all()?;
    } else {
        for kind in ALL_DATASETS {
            if !loader.paths().path_for(*kind).exists() {
                continue;
            }
            match kind {
                DatasetKind::Reimbursements => tables.reimbursements = loader.reimbursements()?,
                DatasetKind::Companies => tables.companies = loader.companies()?,
                DatasetKind::Deputies => tables.deputies = loader.deputies()?,
            }
        }
    }

    let mut table = Table::new();
    table.set_header(vec!["Dataset", "File", "Size", "Rows", "SHA-256"]);
    for kind in ALL_DATASETS {
        let path = loader.paths().path_for(*kind);
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if !path.exists() {
            table.add_row(vec![
                Cell::new(kind.key()),
                Cell::new(file),
                Cell::new("missing"),
                Cell::new(""),
                Cell::new(""),
            ]);
            continue;
        }
        let size = std::fs::metadata(path)?.len();
        let fingerprint = dataset_fingerprint(path)?;
        table.add_row(vec![
            Cell::new(kind.key()),
            Cell::new(file),
            Cell::new(format_bytes(size)),
            Cell::new(row_count(&tables, *kind)),
            Cell::new(&fingerprint[..12]),
        ]);
    }
    writeln!(out, "{table}")?;

    if !all_present {
        writeln!(out, "\nSome datasets are missing. Fetch them into the data directory.")?;
        return Ok(());
    }

    normalize_tables(&mut tables);
    let summary = name_summary(&tables);
    writeln!(out)?;
    writeln!(out, "Unique suppliers:         {}", summary.unique_suppliers)?;
    writeln!(out, "Unique congresspeople:    {}", summary.unique_congresspeople)?;
    writeln!(out, "Reference civil names:    {}", summary.reference_names)?;
    Ok(())
}
