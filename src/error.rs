use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that abort a run. The "unreadable sidecar" condition is not here:
/// decoding failures surface as an absent result so callers can report
/// "no metadata" instead of crashing.
#[derive(Debug, Error)]
pub enum CueSplitError {
    #[error("\"{0}\" does not exist")]
    MissingInput(PathBuf),
    #[error("{0} is not installed")]
    MissingDependency(String),
    #[error("file type detection failed: {0}")]
    Classifier(String),
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),
    #[error("encoder exited with {status}: {command}")]
    Codec { command: String, status: ExitStatus },
    #[error("no track {0} in the cue sheet for a split file")]
    MissingTrack(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
