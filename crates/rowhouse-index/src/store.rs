use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use polars::prelude::*;
use tracing::info;

use super::error::{DataError, Result};
use crate::schema;

const ADDRESSES_PARQUET: &str = "addresses.parquet";
const SEGMENTS_PARQUET: &str = "segments.parquet";
const INTERSECTIONS_PARQUET: &str = "intersections.parquet";

/// The pre-built, read-only address index.
///
/// Holds the three frames the resolution engine queries: address records,
/// street segments and street intersections. Frames are either supplied
/// directly (already in memory) or lazily collected from parquet files on
/// first access. The index-build pipeline that produces those files lives
/// outside this workspace; nothing here mutates them.
#[derive(Clone)]
pub struct AddressIndexData {
    source: IndexSource,
    addresses: OnceCell<LazyFrame>,
    segments: OnceCell<LazyFrame>,
    intersections: OnceCell<LazyFrame>,
}

#[derive(Clone)]
enum IndexSource {
    Dir(PathBuf),
    Memory,
}

impl AddressIndexData {
    /// Open an index directory containing `addresses.parquet`,
    /// `segments.parquet` and `intersections.parquet`.
    ///
    /// Files are not read until a frame is first requested.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        for file in [ADDRESSES_PARQUET, SEGMENTS_PARQUET, INTERSECTIONS_PARQUET] {
            if !dir.join(file).exists() {
                return Err(DataError::RequiredFilesNotFound(dir.join(file)));
            }
        }
        info!(dir = ?dir, "Opening address index directory");
        Ok(Self {
            source: IndexSource::Dir(dir),
            addresses: OnceCell::new(),
            segments: OnceCell::new(),
            intersections: OnceCell::new(),
        })
    }

    /// Build an index from frames already in memory. Each frame is validated
    /// against the expected schema.
    pub fn from_frames(
        addresses: DataFrame,
        segments: DataFrame,
        intersections: DataFrame,
    ) -> Result<Self> {
        validate_frame("addresses", &addresses, &schema::address_columns())?;
        validate_frame("segments", &segments, &schema::segment_columns())?;
        validate_frame(
            "intersections",
            &intersections,
            &schema::intersection_columns(),
        )?;

        let data = Self {
            source: IndexSource::Memory,
            addresses: OnceCell::new(),
            segments: OnceCell::new(),
            intersections: OnceCell::new(),
        };
        let _ = data.addresses.set(addresses.lazy());
        let _ = data.segments.set(segments.lazy());
        let _ = data.intersections.set(intersections.lazy());
        Ok(data)
    }

    /// Persist the three frames to an index directory, sorted by their
    /// canonical keys so resolution output is reproducible across rebuilds.
    pub fn write_to_dir(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let save = |lf: LazyFrame, sort_cols: &[&str], path: &Path| -> Result<()> {
            let mut df = lf
                .sort(sort_cols.to_vec(), SortMultipleOptions::default())
                .collect()?;
            let mut file = std::fs::File::create(path)?;
            ParquetWriter::new(&mut file).finish(&mut df)?;
            info!(path = ?path.file_stem(), rows = df.height(), "Saved index frame");
            Ok(())
        };

        save(
            self.addresses()?.clone(),
            &schema::CANONICAL_ORDER,
            &dir.join(ADDRESSES_PARQUET),
        )?;
        save(
            self.segments()?.clone(),
            &[schema::SEG_ID],
            &dir.join(SEGMENTS_PARQUET),
        )?;
        save(
            self.intersections()?.clone(),
            &[schema::INT_ID],
            &dir.join(INTERSECTIONS_PARQUET),
        )?;
        Ok(())
    }

    pub fn addresses(&self) -> Result<&LazyFrame> {
        self.frame(&self.addresses, ADDRESSES_PARQUET)
    }

    pub fn segments(&self) -> Result<&LazyFrame> {
        self.frame(&self.segments, SEGMENTS_PARQUET)
    }

    pub fn intersections(&self) -> Result<&LazyFrame> {
        self.frame(&self.intersections, INTERSECTIONS_PARQUET)
    }

    fn frame<'a>(&self, cell: &'a OnceCell<LazyFrame>, file: &str) -> Result<&'a LazyFrame> {
        cell.get_or_try_init(|| match &self.source {
            IndexSource::Dir(dir) => load_parquet(&dir.join(file)),
            // Memory-backed cells are filled at construction time.
            IndexSource::Memory => Err(DataError::RequiredFilesNotFound(PathBuf::from(file))),
        })
    }
}

fn load_parquet(path: &Path) -> Result<LazyFrame> {
    info!(path = ?path.file_stem(), "Collecting index frame into memory");
    let t_load = std::time::Instant::now();
    let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;
    info!(
        time_collected = ?t_load.elapsed(),
        rows = df.height(),
        "Collected index frame"
    );
    Ok(df.lazy())
}

fn validate_frame(
    name: &str,
    df: &DataFrame,
    expected: &[(&'static str, DataType)],
) -> Result<()> {
    for (col, dtype) in expected {
        let actual = df
            .column(col)
            .map_err(|_| DataError::MissingColumn {
                frame: name.to_string(),
                column: (*col).to_string(),
            })?
            .dtype();
        if actual != dtype {
            return Err(DataError::ColumnType {
                frame: name.to_string(),
                column: (*col).to_string(),
                expected: dtype.clone(),
                actual: actual.clone(),
            });
        }
    }
    Ok(())
}
