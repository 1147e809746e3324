use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid column name: {0:?}")]
    InvalidColumnName(String),
    #[error("invalid target field id: {0:?}")]
    InvalidFieldId(String),
    #[error("target field '{target}' is mapped from both '{first}' and '{second}'")]
    DuplicateTarget {
        target: String,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
