use thiserror::Error;

#[derive(Error, Debug)]
pub enum NamesakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Dataset '{name}' not found at {path}\nFetch it into the data directory first.")]
    MissingDataset { name: String, path: String },

    #[error("Dataset '{dataset}' is missing required column '{column}'")]
    MissingColumn { dataset: String, column: String },

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, NamesakeError>;
