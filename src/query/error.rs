use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryErr {
    #[error("unexpected token '{found}' at offset {position}, expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },
    #[error("unexpected end of input at offset {position}, expected {expected}")]
    UnexpectedEof { expected: String, position: usize },
    #[error("empty input")]
    EmptyInput,
    #[error("{command} is not implemented")]
    NotImplemented { command: String },
    #[error("table '{table}' has an empty column list")]
    EmptyColumnList { table: String },
}

pub type Result<T> = std::result::Result<T, QueryErr>;
