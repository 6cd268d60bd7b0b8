use std::io::Write;

use comfy_table::{Cell, Table};

use crate::cli::dataset_paths;
use crate::error::Result;
use crate::loader::DatasetLoader;
use crate::matcher::find_deputies;
use crate::models::{Deputy, Tables};
use crate::normalize::normalize_tables;

pub fn run(data_dir: Option<&str>, name: &str) -> Result<()> {
    let loader = DatasetLoader::new(dataset_paths(data_dir));
    let mut tables = Tables {
        deputies: loader.deputies()?,
        ..Tables::default()
    };
    normalize_tables(&mut tables);

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_lookup(&tables.deputies, name, &mut lock)
}

/// Print the deputies whose civil name matches `name`. Expects normalized deputies.
pub fn write_lookup(deputies: &[Deputy], name: &str, out: &mut dyn Write) -> Result<()> {
    let found = find_deputies(deputies, name);
    if found.is_empty() {
        writeln!(out, "No deputy with civil name '{name}'.")?;
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["congressperson_id", "civil_name"]);
    for d in &found {
        table.add_row(vec![
            Cell::new(d.congressperson_id.as_deref().unwrap_or("")),
            Cell::new(d.civil_name.as_deref().unwrap_or("")),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NamesakeError;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn deputies() -> Vec<Deputy> {
        vec![Deputy {
            congressperson_id: Some("74173".to_string()),
            civil_name: Some("joao rodrigues".to_string()),
        }]
    }

    #[test]
    fn test_lookup_prints_matching_deputy() {
        let mut buf = Vec::new();
        write_lookup(&deputies(), "JOÃO Rodrigues", &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("74173"));
        assert!(out.contains("joao rodrigues"));
    }

    #[test]
    fn test_lookup_without_match() {
        let mut buf = Vec::new();
        write_lookup(&deputies(), "Maria", &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No deputy with civil name 'Maria'.\n");
    }

    #[test]
    fn test_lookup_closed_pipe_is_an_error() {
        let err = write_lookup(&deputies(), "joao rodrigues", &mut ClosedPipe).unwrap_err();
        assert!(matches!(err, NamesakeError::Io(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe));
    }
}
