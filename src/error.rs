//! Engine error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid regex, unreadable or malformed blacklist. Fatal before any
    /// mutation happens.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// File discovery failed.
    #[error("file discovery: {0}")]
    Discovery(String),

    /// A source file could not be parsed or type-checked.
    #[error("parse {file}: {message}")]
    Parse { file: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The restoration rename failed; the source tree is possibly damaged.
    #[error("restore original source file: {0}")]
    Restore(std::io::Error),

    /// External interrupt; not an error, the engine returns promptly.
    #[error("cancelled")]
    Cancelled,

    /// Sentinel for `--error-on-survivals`; maps to exit code 1 without
    /// additional logging.
    #[error("mutants escaped")]
    MutantsEscaped,
}
