//! Intersection resolution over the intersection frame.

use polars::prelude::*;
use tracing::instrument;

use super::{MatchSet, Result};
use crate::filter::IntersectionKey;
use rowhouse_index::schema;

/// Resolve an intersection query to at most one canonical record.
///
/// The index stores each crossing with `street_1_code <=
/// street_2_code`, and a physical crossing can appear once per
/// intersecting segment pair. The record with the lowest segment id
/// (ties broken by lowest intersection id) is the canonical one, so
/// repeated queries always return the same record.
#[instrument(skip(intersections))]
pub fn resolve_intersection_inner(
    intersections: LazyFrame,
    key: Option<IntersectionKey>,
) -> Result<MatchSet> {
    let Some(key) = key else {
        // One or both streets did not resolve to a code.
        return MatchSet::from_intersection_lazy(intersections.filter(lit(false)));
    };

    let lf = intersections
        .filter(
            col(schema::STREET_1_CODE)
                .eq(lit(key.first))
                .and(col(schema::STREET_2_CODE).eq(lit(key.second))),
        )
        .sort(
            [schema::SEG_ID, schema::INT_ID],
            SortMultipleOptions::default(),
        )
        .limit(1);

    MatchSet::from_intersection_lazy(lf)
}
