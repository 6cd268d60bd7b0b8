use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        let expanded = shellexpand_path(&dir);
        std::fs::create_dir_all(&expanded)?;
        // Canonicalize now that the directory exists
        settings.data_dir = shellexpand_path(&expanded);
    }

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    save_settings(&settings)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Data directory: {}", resolved.display())?;
    writeln!(out, "Place these datasets there before running an analysis:")?;
    writeln!(out, "  {}", settings.reimbursements_file)?;
    writeln!(out, "  {}", settings.companies_file)?;
    writeln!(out, "  {}", settings.deputies_file)?;
    Ok(())
}
