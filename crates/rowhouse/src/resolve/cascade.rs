//! Segment fallback for addresses with no record of their own.
//!
//! When filter resolution over the address frame comes back empty but
//! the parser mapped the input onto a street segment, the engine
//! synthesizes a single address-shaped record from the segment. The
//! synthesized record carries the components derivable from the query
//! and the segment, positions at the segment midpoint, and explicit
//! nulls for every property identifier. Callers can therefore always
//! distinguish "known address" from "plausible address on a known
//! street".

use polars::prelude::*;
use tracing::{debug, instrument};

use super::{MatchSet, Result};
use crate::query::ParsedQuery;
use rowhouse_index::schema;

/// Attempt the segment fallback for a parsed query.
///
/// Returns `Ok(None)` when the query carries no segment id or the
/// segment is not in the index; the caller then reports not-found.
#[instrument(skip_all, fields(seg_id = parsed.seg_id))]
pub fn cascade_to_segment_inner(
    segments: LazyFrame,
    parsed: &ParsedQuery,
) -> Result<Option<MatchSet>> {
    let Some(seg_id) = parsed.seg_id else {
        return Ok(None);
    };

    let seg = segments
        .filter(col(schema::SEG_ID).eq(lit(seg_id)))
        .collect()?;
    if seg.height() == 0 {
        debug!(seg_id, "segment not in index");
        return Ok(None);
    }

    let street_code = seg.column(schema::STREET_CODE)?.i64()?.get(0);
    let street_name = first_str(&seg, schema::STREET_NAME)?;
    let street_predir = first_str(&seg, schema::STREET_PREDIR)?;
    let street_suffix = first_str(&seg, schema::STREET_SUFFIX)?;
    let street_postdir = first_str(&seg, schema::STREET_POSTDIR)?;
    let seg_x = seg.column(schema::GEOCODE_X)?.f64()?.get(0);
    let seg_y = seg.column(schema::GEOCODE_Y)?.f64()?.get(0);

    let df = df!(
        schema::STREET_ADDRESS => [parsed.output_address.clone()],
        schema::ADDRESS_LOW => [parsed.range.low_num],
        schema::ADDRESS_LOW_SUFFIX => [parsed.range.low_suffix.clone()],
        schema::ADDRESS_LOW_FRAC => [parsed.range.fractional.clone()],
        schema::ADDRESS_HIGH => [parsed.range.high_num],
        schema::STREET_PREDIR => [street_predir],
        schema::STREET_NAME => [street_name],
        schema::STREET_SUFFIX => [street_suffix],
        schema::STREET_POSTDIR => [street_postdir],
        schema::STREET_CODE => [street_code],
        schema::SEG_ID => [Some(seg_id)],
        schema::UNIT_TYPE => [parsed.unit.unit_type.clone()],
        schema::UNIT_NUM => [parsed.unit.unit_num.clone().unwrap_or_default()],
        schema::PARENT_ADDRESS => [None::<&str>],
        schema::ZIP_CODE => [parsed.zip_code.clone()],
        schema::WARD => [parsed.ward.clone()],
        schema::ACCOUNT_NUM => [None::<&str>],
        schema::UTILITY_PARCEL_ID => [None::<&str>],
        schema::REGISTRY_PARCEL_ID => [None::<&str>],
        schema::ADDRESS_KEY => [None::<&str>],
        schema::OWNERS => [None::<&str>],
        schema::GEOCODE_X => [seg_x],
        schema::GEOCODE_Y => [seg_y],
        schema::PARCEL_X => [None::<f64>],
        schema::PARCEL_Y => [None::<f64>],
        schema::STREET_X => [seg_x],
        schema::STREET_Y => [seg_y],
    )?;

    MatchSet::from_address_lazy(df.lazy()).map(Some)
}

fn first_str(df: &DataFrame, column: &str) -> Result<Option<String>> {
    Ok(df
        .column(column)?
        .str()?
        .get(0)
        .map(ToString::to_string))
}
