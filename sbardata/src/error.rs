use std::io;
use thiserror::Error;

/// Fatal problems with a status bar document.
///
/// Missing assets, unknown condition codes and stale element ids are not
/// errors; those are reported through `Option`/`bool` results instead.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown status bar {index} (document has {count})")]
    UnknownStatusBar { index: usize, count: usize },
}
