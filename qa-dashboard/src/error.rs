use std::path::PathBuf;

use thiserror::Error;
use crate::api::ApiRequest;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error reading file {path}: {source}")]
    ReadFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("error deserializing TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("unable to locate XDG base directories: {0}")]
    BaseDirs(#[from] xdg::BaseDirectoriesError),

    #[error("unable to place file {path}: {source}")]
    PlaceFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("request worker is busy")]
    WorkerBusy(ApiRequest),

    #[error("request worker has shut down")]
    WorkerClosed,
}
