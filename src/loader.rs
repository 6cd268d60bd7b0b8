use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::error::{NamesakeError, Result};
use crate::models::{Company, Deputy, Reimbursement, Tables};
use crate::settings::DatasetPaths;

// ---------------------------------------------------------------------------
// Dataset kinds — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Reimbursements,
    Companies,
    Deputies,
}

pub const ALL_DATASETS: &[DatasetKind] = &[
    DatasetKind::Reimbursements,
    DatasetKind::Companies,
    DatasetKind::Deputies,
];

impl DatasetKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Reimbursements => "reimbursements",
            Self::Companies => "companies",
            Self::Deputies => "deputies",
        }
    }

    /// Columns the analysis reads. Anything else in the file is ignored.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Reimbursements => &[
                "issue_date",
                "congressperson_id",
                "congressperson_name",
                "supplier",
                "subquota_description",
                "cnpj_cpf",
                "document_id",
                "total_net_value",
            ],
            Self::Companies => &["cnpj", "name", "trade_name", "legal_entity"],
            Self::Deputies => &["congressperson_id", "civil_name"],
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_xz(path: &Path) -> bool {
    path.extension().map_or(false, |e| e.eq_ignore_ascii_case("xz"))
}

#[cfg(feature = "xz")]
fn decompress(file: File) -> Result<Box<dyn Read>> {
    Ok(Box::new(xz2::read::XzDecoder::new(BufReader::new(file))))
}

#[cfg(not(feature = "xz"))]
fn decompress(_file: File) -> Result<Box<dyn Read>> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "built without xz support; decompress the dataset first",
    )
    .into())
}

fn open_dataset(kind: DatasetKind, path: &Path) -> Result<Box<dyn Read>> {
    if !path.exists() {
        return Err(NamesakeError::MissingDataset {
            name: kind.key().to_string(),
            path: path.display().to_string(),
        });
    }
    let file = File::open(path)?;
    if is_xz(path) {
        decompress(file)
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn csv_reader(reader: Box<dyn Read>) -> csv::Reader<Box<dyn Read>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

fn check_columns(kind: DatasetKind, headers: &csv::StringRecord) -> Result<()> {
    for column in kind.required_columns() {
        if !headers.iter().any(|h| h == *column) {
            return Err(NamesakeError::MissingColumn {
                dataset: kind.key().to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// SHA-256 of the dataset file as stored on disk.
pub fn dataset_fingerprint(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Read every row of one dataset. Any unreadable record aborts the load.
pub fn read_dataset<T: DeserializeOwned>(kind: DatasetKind, path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv_reader(open_dataset(kind, path)?);
    let headers = rdr.headers()?.clone();
    check_columns(kind, &headers)?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    tracing::info!(dataset = kind.key(), path = %path.display(), rows = rows.len(), "loaded dataset");
    Ok(rows)
}

// ---------------------------------------------------------------------------
// DatasetLoader
// ---------------------------------------------------------------------------

pub struct DatasetLoader {
    paths: DatasetPaths,
}

impl DatasetLoader {
    pub fn new(paths: DatasetPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &DatasetPaths {
        &self.paths
    }

    pub fn reimbursements(&self) -> Result<Vec<Reimbursement>> {
        read_dataset(DatasetKind::Reimbursements, &self.paths.reimbursements)
    }

    pub fn companies(&self) -> Result<Vec<Company>> {
        read_dataset(DatasetKind::Companies, &self.paths.companies)
    }

    pub fn deputies(&self) -> Result<Vec<Deputy>> {
        read_dataset(DatasetKind::Deputies, &self.paths.deputies)
    }

    /// Load all three datasets eagerly. Fails on the first missing or
    /// malformed file.
    pub fn load_all(&self) -> Result<Tables> {
        Ok(Tables {
            reimbursements: self.reimbursements()?,
            companies: self.companies()?,
            deputies: self.deputies()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn paths_in(dir: &Path) -> DatasetPaths {
        DatasetPaths {
            data_dir: dir.to_path_buf(),
            reimbursements: dir.join("reimbursements.csv"),
            companies: dir.join("companies.csv"),
            deputies: dir.join("deputies.csv"),
        }
    }

    const REIMBURSEMENTS: &str = "\
document_id,issue_date,congressperson_id,congressperson_name,supplier,subquota_description,cnpj_cpf,total_net_value,year
5631309,2015-02-26T00:00:00,1234,Tiririca,João Rodrigues,Fuels and lubricants,11222333000181,100.5,2015
5631310,2015-03-01T00:00:00,,LIDERANÇA DO PT,,Postal services,,,2015
";

    #[test]
    fn test_reads_reimbursements_and_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "reimbursements.csv", REIMBURSEMENTS);
        let rows: Vec<Reimbursement> = read_dataset(DatasetKind::Reimbursements, &path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].supplier.as_deref(), Some("João Rodrigues"));
        assert_eq!(rows[0].congressperson_id.as_deref(), Some("1234"));
        assert_eq!(rows[0].total_net_value, Some(100.5));
        assert_eq!(rows[0].document_id.as_deref(), Some("5631309"));
    }

    #[test]
    fn test_empty_fields_are_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "reimbursements.csv", REIMBURSEMENTS);
        let rows: Vec<Reimbursement> = read_dataset(DatasetKind::Reimbursements, &path).unwrap();
        assert_eq!(rows[1].supplier, None);
        assert_eq!(rows[1].congressperson_id, None);
        assert_eq!(rows[1].cnpj_cpf, None);
        assert_eq!(rows[1].total_net_value, None);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DatasetLoader::new(paths_in(dir.path()));
        let err = loader.load_all().unwrap_err();
        assert!(matches!(err, NamesakeError::MissingDataset { ref name, .. } if name == "reimbursements"));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "deputies.csv", "congressperson_id,name\n1,Fulano\n");
        let err = read_dataset::<Deputy>(DatasetKind::Deputies, &path).unwrap_err();
        match err {
            NamesakeError::MissingColumn { dataset, column } => {
                assert_eq!(dataset, "deputies");
                assert_eq!(column, "civil_name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_value_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let content = "\
issue_date,congressperson_id,congressperson_name,supplier,subquota_description,cnpj_cpf,document_id,total_net_value
2015-01-01,1,A,B,C,1,1,not-a-number
";
        let path = write(dir.path(), "reimbursements.csv", content);
        let err = read_dataset::<Reimbursement>(DatasetKind::Reimbursements, &path).unwrap_err();
        assert!(matches!(err, NamesakeError::Csv(_)));
    }

    #[test]
    fn test_load_all() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "reimbursements.csv", REIMBURSEMENTS);
        write(
            dir.path(),
            "companies.csv",
            "cnpj,name,trade_name,legal_entity,situation\n11.222.333/0001-81,JOAO RODRIGUES,,213-5 - EMPRESARIO (INDIVIDUAL),ATIVA\n",
        );
        write(dir.path(), "deputies.csv", "congressperson_id,civil_name\n1234,FRANCISCO EVERARDO OLIVEIRA SILVA\n");
        let loader = DatasetLoader::new(paths_in(dir.path()));
        let tables = loader.load_all().unwrap();
        assert_eq!(tables.reimbursements.len(), 2);
        assert_eq!(tables.companies.len(), 1);
        assert_eq!(tables.deputies.len(), 1);
        assert_eq!(tables.companies[0].trade_name, None);
    }

    #[test]
    fn test_fingerprint_is_sha256() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "deputies.csv", "abc");
        assert_eq!(
            dataset_fingerprint(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[cfg(feature = "xz")]
    #[test]
    fn test_reads_xz_compressed_dataset() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deputies.xz");
        let file = File::create(&path).unwrap();
        let mut encoder = xz2::write::XzEncoder::new(file, 6);
        encoder
            .write_all(b"congressperson_id,civil_name\n1,MARIA SILVA\n2,JOAO RODRIGUES\n")
            .unwrap();
        encoder.finish().unwrap();

        let rows: Vec<Deputy> = read_dataset(DatasetKind::Deputies, &path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].civil_name.as_deref(), Some("JOAO RODRIGUES"));
    }
}
