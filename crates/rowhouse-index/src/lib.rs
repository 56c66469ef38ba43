//! Read-only data layer for the rowhouse address index.
//!
//! The index is three polars frames: address records, street segments and
//! street intersections. They are produced by an external build pipeline;
//! this crate only loads them (from parquet or from memory), validates their
//! schema and hands out `LazyFrame`s for the resolution engine to filter.

pub mod schema;
mod store;
pub mod test_data;

mod error {
    use std::path::PathBuf;

    use polars::prelude::{DataType, PolarsError};
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum DataError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
        #[error("Polars error: {0}")]
        Polars(#[from] PolarsError),
        #[error("Required index file not found: {0}")]
        RequiredFilesNotFound(PathBuf),
        #[error("Frame '{frame}' is missing required column '{column}'")]
        MissingColumn { frame: String, column: String },
        #[error(
            "Frame '{frame}' column '{column}' has type {actual}, expected {expected}"
        )]
        ColumnType {
            frame: String,
            column: String,
            expected: DataType,
            actual: DataType,
        },
    }

    pub type Result<T> = std::result::Result<T, DataError>;
}

pub use error::{DataError, Result};
pub use store::AddressIndexData;
