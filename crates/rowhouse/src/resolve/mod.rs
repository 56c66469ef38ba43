//! Match resolution: applying compiled filters to the index and
//! carrying the results through union, cascade, and pagination.

use polars::prelude::*;

use rowhouse_index::schema;

mod address;
mod cascade;
mod combine;
mod intersection;

pub use address::{resolve_filters_inner, resolve_identifier_inner, resolve_owner_inner};
pub use cascade::cascade_to_segment_inner;
pub use combine::union_match_sets;
pub use intersection::resolve_intersection_inner;

mod error {
    pub type Result<T> = std::result::Result<T, SearchError>;

    /// Errors surfaced by query resolution.
    ///
    /// The first two variants are caller-facing and carry enough
    /// context to report the offending input; the rest are internal
    /// faults.
    #[derive(Debug, thiserror::Error)]
    pub enum SearchError {
        /// The input itself is unusable (too long, bad page number,
        /// unrecognized query form). Never retryable.
        #[error("bad request for {input:?}: {message}")]
        BadRequest { input: String, message: String },

        /// The input was valid but nothing in the index matches it.
        #[error("no matches found for {query:?} (normalized: {normalized:?})")]
        NotFound {
            query: String,
            normalized: Vec<String>,
        },

        /// A dataframe operation failed. Indicates an index/engine
        /// fault, not a caller mistake.
        #[error("dataframe operation failed: {0}")]
        DataFrame(#[from] polars::error::PolarsError),

        /// The index data layer failed.
        #[error("index error: {0}")]
        Index(#[from] rowhouse_index::DataError),

        #[error(transparent)]
        Other(#[from] anyhow::Error),
    }
}
pub use error::{Result, SearchError};

/// Which frame a [`MatchSet`] was resolved against. Address and
/// intersection records have different schemas and never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Address,
    Intersection,
}

/// Flags controlling how address matches are post-processed.
///
/// These are orthogonal to the compiled filters: the filters decide
/// which records match, the policy decides what happens to the
/// matched set afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolvePolicy {
    /// Pull in child-unit records of every matched base address.
    /// Ignored when the query itself names a unit.
    pub include_child_units: bool,
    /// Drop records that are children of another record. Block
    /// queries set this so a block listing shows base addresses only.
    pub exclude_children: bool,
    /// Keep only records carrying an owner-assessment account.
    pub identified_only: bool,
    /// Substitute the parcel centroid when a record has no direct
    /// geocode.
    pub parcel_geocode: bool,
    /// Substitute the street-segment midpoint when neither a direct
    /// geocode nor (if enabled) a parcel centroid is available.
    pub street_geocode: bool,
}

/// A deduplicated, canonically ordered set of matched records.
///
/// Every resolver produces one of these, and every set with the same
/// members renders in the same order: address sets sort by street
/// code, house number, house-number suffix, then unit number.
#[derive(Debug, Clone)]
pub struct MatchSet {
    kind: MatchKind,
    df: DataFrame,
}

impl MatchSet {
    /// Materialize an address-frame pipeline: dedup on the canonical
    /// street-address string, then sort into canonical order.
    pub(crate) fn from_address_lazy(lf: LazyFrame) -> Result<Self> {
        let df = lf
            .unique_stable(
                Some(vec![schema::STREET_ADDRESS.into()]),
                UniqueKeepStrategy::First,
            )
            .sort(schema::CANONICAL_ORDER.to_vec(), SortMultipleOptions::default())
            .collect()?;
        Ok(Self {
            kind: MatchKind::Address,
            df,
        })
    }

    /// Materialize an intersection-frame pipeline, ordered by
    /// intersection id.
    pub(crate) fn from_intersection_lazy(lf: LazyFrame) -> Result<Self> {
        let df = lf
            .sort(
                [schema::INT_ID],
                SortMultipleOptions::default(),
            )
            .collect()?;
        Ok(Self {
            kind: MatchKind::Intersection,
            df,
        })
    }

    #[must_use]
    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    /// Total number of matched records, before any pagination.
    #[must_use]
    pub fn total(&self) -> usize {
        self.df.height()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// The underlying records in canonical order.
    #[must_use]
    pub fn records(&self) -> &DataFrame {
        &self.df
    }

    pub(crate) fn slice(&self, offset: i64, len: usize) -> DataFrame {
        self.df.slice(offset, len)
    }

    /// Union with another set. Duplicate records (same canonical
    /// street address) collapse to one, and the result is re-sorted
    /// into canonical order.
    pub fn union(self, other: Self) -> Result<Self> {
        combine::union_match_sets(vec![self, other])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::compile_address_filters;
    use crate::query::ParsedQuery;
    use rowhouse_index::test_data;

    fn addresses() -> LazyFrame {
        test_data::address_frame(&test_data::sample_address_rows())
            .unwrap()
            .lazy()
    }

    #[test]
    fn match_set_orders_canonically() {
        // All MARKET ST rows regardless of range or unit shape.
        let mut spec = crate::filter::FilterSpec::default();
        spec.insert_loose(crate::filter::AddressField::StreetName, "MARKET");

        let matches =
            resolve_filters_inner(addresses(), &spec, &ResolvePolicy::default()).unwrap();
        let lows: Vec<Option<i64>> = matches
            .records()
            .column(schema::ADDRESS_LOW)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        let mut sorted = lows.clone();
        sorted.sort_unstable();
        assert_eq!(lows, sorted);
    }

    #[test]
    fn union_is_deduplicated() {
        let parsed = ParsedQuery::builder()
            .low_num(440)
            .street_name("BROAD")
            .street_predir("N")
            .build();
        let spec = compile_address_filters(&parsed);
        let policy = ResolvePolicy::default();

        let a = resolve_filters_inner(addresses(), &spec, &policy).unwrap();
        let b = resolve_filters_inner(addresses(), &spec, &policy).unwrap();
        assert_eq!(a.total(), 1);

        let unioned = a.union(b).unwrap();
        assert_eq!(unioned.total(), 1);
    }
}
