use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The requested page resolves to a negative zero-based index.
    InvalidPageIndex {
        page_index: i64,
        zero_base_page_index: i64,
    },
    InvalidPageSize,
    InvalidPredicate(String),
    UnsupportedOperator(String),
    Config(String),
    /// Count or fetch failure raised by a model.
    Storage(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidPageIndex {
                page_index,
                zero_base_page_index,
            } => write!(
                f,
                "Invalid page index: {} (zero-based {})",
                page_index, zero_base_page_index
            ),
            Error::InvalidPageSize => write!(f, "Invalid page size: must be greater than zero"),
            Error::InvalidPredicate(err) => write!(f, "Invalid predicate: {}", err),
            Error::UnsupportedOperator(op) => write!(f, "Unsupported operator: {}", op),
            Error::Config(err) => write!(f, "Configuration error: {}", err),
            Error::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for Error {}
