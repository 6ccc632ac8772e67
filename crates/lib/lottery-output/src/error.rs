use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Log file name {0} has no stem")]
    LogFileName(String),
    #[error("Invalid logger configuration: {0}")]
    LogConfig(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("A logger is already installed: {0}")]
    SetLogger(#[from] log::SetLoggerError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl OutputError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| OutputError::Io { path, source }
    }
}
