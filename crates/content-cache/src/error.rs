//! Error types for the cache service

use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    Config(String),
    Io(Box<std::io::Error>),
    Store(summary_cache::StoreError),
    Download(file_blob_cache::DownloadError),
    Generate(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ServiceError::Io(err) => write!(f, "IO error: {}", err),
            ServiceError::Store(err) => write!(f, "Store error: {}", err),
            ServiceError::Download(err) => write!(f, "Downloader error: {}", err),
            ServiceError::Generate(msg) => write!(f, "Summary generation failed: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Io(err) => Some(err.as_ref()),
            ServiceError::Store(err) => Some(err),
            ServiceError::Download(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Io(Box::new(err))
    }
}

impl From<summary_cache::StoreError> for ServiceError {
    fn from(err: summary_cache::StoreError) -> Self {
        ServiceError::Store(err)
    }
}

impl From<file_blob_cache::DownloadError> for ServiceError {
    fn from(err: file_blob_cache::DownloadError) -> Self {
        ServiceError::Download(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
