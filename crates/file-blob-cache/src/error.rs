//! Error types for blob downloads

use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum DownloadError {
    Http(Box<reqwest::Error>),
    Status(u16),
    Io(Box<std::io::Error>),
    Timeout(Duration),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Http(err) => write!(f, "HTTP error: {}", err),
            DownloadError::Status(status) => write!(f, "Server returned status {}", status),
            DownloadError::Io(err) => write!(f, "IO error: {}", err),
            DownloadError::Timeout(after) => {
                write!(f, "Download timed out after {}s", after.as_secs())
            }
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DownloadError::Http(err) => Some(err.as_ref()),
            DownloadError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        DownloadError::Http(Box::new(err))
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        DownloadError::Io(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;
