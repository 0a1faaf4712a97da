use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a publishing run or the image server.
///
/// Any of these surfaced during a pipeline run aborts it immediately; nothing
/// here is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("no board ids found in {0}")]
    NoBoardsFound(PathBuf),

    #[error("no pin blocks detected in the description text")]
    NoPinsFound,

    #[error("no jpg files found in {0}")]
    NoImagesFound(PathBuf),

    #[error("need at least {needed} pins but only found {found}")]
    CountMismatch { needed: usize, found: usize },

    #[error("{command} failed: {detail}")]
    ExternalTool { command: String, detail: String },

    #[error("unrecognized format: {0}")]
    ParseFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
