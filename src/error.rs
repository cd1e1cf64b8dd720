use std::path::PathBuf;

use crate::record::Location;

/// Why a single input line could not be read as a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecordError {
    #[error("missing `(chapter:verse:token:bit)` location at start of line")]
    MissingLocation,
    #[error("expected 4 location components, found {0}")]
    LocationArity(usize),
    #[error("location component {component} is not a non-negative integer: {value:?}")]
    InvalidIndex {
        component: &'static str,
        value: String,
    },
    #[error("expected 4 tab-separated fields, found {0}")]
    FieldCount(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed record at line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: MalformedRecordError,
    },

    #[error("out-of-order record at line {line}: {found} does not follow {previous}")]
    OutOfOrderRecord {
        line: usize,
        previous: Location,
        found: Location,
    },

    #[error("invalid options in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Input line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MalformedRecord { line, .. } | Error::OutOfOrderRecord { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
