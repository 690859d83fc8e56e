use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BspError>;

#[derive(Debug, Error)]
pub enum BspError {
    #[error("malformed map file{}: {reason}", lump_suffix(.lump))]
    MalformedInput { lump: Option<usize>, reason: String },

    #[error("unsupported map file: {0}")]
    Unsupported(String),

    #[error("invalid lump whitelist: {0}")]
    InvalidWhitelist(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BspError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        BspError::MalformedInput {
            lump: None,
            reason: reason.into(),
        }
    }

    pub fn malformed_lump(lump: usize, reason: impl Into<String>) -> Self {
        BspError::MalformedInput {
            lump: Some(lump),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BspError::Io {
            path: path.into(),
            source,
        }
    }

    /// Index of the lump that caused the error, if any.
    pub fn lump(&self) -> Option<usize> {
        match self {
            BspError::MalformedInput { lump, .. } => *lump,
            _ => None,
        }
    }
}

fn lump_suffix(lump: &Option<usize>) -> String {
    match *lump {
        Some(idx) => format!(" (lump {idx}, {})", crate::lump::lump_name(idx)),
        None => String::new(),
    }
}
