use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Path does not exist: {}", .0.display())]
    MissingPath(PathBuf),

    #[error("Expected a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Expected a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
