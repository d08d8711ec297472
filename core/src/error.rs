//! Error type shared by the multitap-core modules.

use std::path::PathBuf;

/// Errors raised while loading configuration or dictionaries, or when a key
/// outside the configured layout reaches the decoder.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigDecode(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("dictionary snapshot: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to start commit timer: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("key {0:?} is not part of the layout")]
    UnknownKey(char),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
