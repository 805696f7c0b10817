//!
//! Common Errors.
//!
use std::fmt;
use sorm_core::DataError;

#[derive(Debug)]
pub enum SormError {
    /// An update or delete without any condition column.
    MissingCondition(String),
    MissingIdent(String),
    MissingTable(String),
    EmptyData,
    InvalidField(String),
    Data(DataError),
    /// The statement failed in the driver.
    Execute {
        sql: String,
        source: anyhow::Error,
    },
    Config(String),
}

impl fmt::Display for SormError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SormError::MissingCondition(ref err) => write!(f, "Missing condition: {}", err),
            SormError::MissingIdent(ref err) => write!(f, "Missing ident: {}", err),
            SormError::MissingTable(ref err) => write!(f, "Missing table: {}", err),
            SormError::EmptyData => write!(f, "Empty data"),
            SormError::InvalidField(ref err) => write!(f, "Invalid field: {}", err),
            SormError::Data(ref err) => err.fmt(f),
            SormError::Execute { ref sql, ref source } => write!(f, "Failed to execute `{}`: {}", sql, source),
            SormError::Config(ref err) => write!(f, "Config error: {}", err),
        }
    }
}

impl std::error::Error for SormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            SormError::Data(ref err) => Some(err),
            SormError::Execute { ref source, .. } => Some(&**source),
            _ => None,
        }
    }
}

impl From<DataError> for SormError {
    fn from(err: DataError) -> Self {
        SormError::Data(err)
    }
}

impl From<url::ParseError> for SormError {
    fn from(err: url::ParseError) -> Self {
        SormError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SormError>;
