use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no registry locator: set 'locator' or point 'config' at a file containing registry.locator")]
    MissingLocator,

    #[error("nothing to do: at least one of 'state' and 'enabled' must be set")]
    MissingAction,

    #[error("username and password must both be set for password-based session authentication")]
    MissingCredentials,

    #[error("failed to read client configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed client configuration at {path}:{line}: expected 'key = value'")]
    Parse { path: PathBuf, line: usize },

    #[error("unrecognized client configuration key '{key}' at {path}:{line}")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },
}
