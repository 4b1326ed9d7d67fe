use std::fmt::{self, Display};

/// Errors produced by model parsers and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownMediaKind(String),
    UnknownItemKind(String),
    InvalidId(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownMediaKind(raw) => {
                write!(f, "unknown media kind: {raw}")
            }
            ModelError::UnknownItemKind(raw) => {
                write!(f, "unknown item kind: {raw}")
            }
            ModelError::InvalidId(raw) => write!(f, "invalid id: {raw}"),
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
