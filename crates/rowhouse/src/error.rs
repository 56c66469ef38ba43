use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowhouseError {
    #[error("Search error: {0}")]
    Search(#[from] crate::resolve::SearchError),
    #[error("Index error: {0}")]
    Index(#[from] rowhouse_index::DataError),
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RowhouseError>;
