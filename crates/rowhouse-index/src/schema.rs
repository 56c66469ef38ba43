//! Column names and expected dtypes for the three index frames.
//!
//! The engine compiles filter predicates against these names, so they are the
//! single source of truth shared between the data layer and the resolver.

use polars::prelude::*;

// --- address frame ---

/// Canonical address string. Unique per record; the record identity used for
/// deduplication and parent/child back-references.
pub const STREET_ADDRESS: &str = "street_address";
pub const ADDRESS_LOW: &str = "address_low";
pub const ADDRESS_LOW_SUFFIX: &str = "address_low_suffix";
pub const ADDRESS_LOW_FRAC: &str = "address_low_frac";
/// Null for non-range records.
pub const ADDRESS_HIGH: &str = "address_high";
pub const STREET_PREDIR: &str = "street_predir";
pub const STREET_NAME: &str = "street_name";
pub const STREET_SUFFIX: &str = "street_suffix";
pub const STREET_POSTDIR: &str = "street_postdir";
pub const STREET_CODE: &str = "street_code";
pub const SEG_ID: &str = "seg_id";
pub const UNIT_TYPE: &str = "unit_type";
/// Never null; empty string means the record has no unit.
pub const UNIT_NUM: &str = "unit_num";
/// Identity of the parent record: a unit points at its bare address, a range
/// member points at its range record. Null for top-level records.
pub const PARENT_ADDRESS: &str = "parent_address";
pub const ZIP_CODE: &str = "zip_code";
pub const WARD: &str = "ward";
pub const ACCOUNT_NUM: &str = "account_num";
pub const UTILITY_PARCEL_ID: &str = "utility_parcel_id";
pub const REGISTRY_PARCEL_ID: &str = "registry_parcel_id";
pub const ADDRESS_KEY: &str = "address_key";
/// Uppercase owner names, space-joined.
pub const OWNERS: &str = "owners";
pub const GEOCODE_X: &str = "geocode_x";
pub const GEOCODE_Y: &str = "geocode_y";
pub const PARCEL_X: &str = "parcel_x";
pub const PARCEL_Y: &str = "parcel_y";
pub const STREET_X: &str = "street_x";
pub const STREET_Y: &str = "street_y";

// --- intersection frame ---

/// Surrogate key; the final tie-breaker when choosing a canonical record.
pub const INT_ID: &str = "int_id";
pub const STREET_1_CODE: &str = "street_1_code";
pub const STREET_1_NAME: &str = "street_1_name";
pub const STREET_1_FULL: &str = "street_1_full";
pub const STREET_2_CODE: &str = "street_2_code";
pub const STREET_2_NAME: &str = "street_2_name";
pub const STREET_2_FULL: &str = "street_2_full";

// --- segment frame ---

pub const LOW_NUM: &str = "low_num";
pub const HIGH_NUM: &str = "high_num";

/// The fixed sort applied whenever address records are rendered. Pagination
/// is only deterministic because every `MatchSet` is ordered by these.
pub const CANONICAL_ORDER: [&str; 4] = [STREET_CODE, ADDRESS_LOW, ADDRESS_LOW_SUFFIX, UNIT_NUM];

/// Required columns of the address frame with their expected dtypes.
#[must_use]
pub fn address_columns() -> Vec<(&'static str, DataType)> {
    vec![
        (STREET_ADDRESS, DataType::String),
        (ADDRESS_LOW, DataType::Int64),
        (ADDRESS_LOW_SUFFIX, DataType::String),
        (ADDRESS_LOW_FRAC, DataType::String),
        (ADDRESS_HIGH, DataType::Int64),
        (STREET_PREDIR, DataType::String),
        (STREET_NAME, DataType::String),
        (STREET_SUFFIX, DataType::String),
        (STREET_POSTDIR, DataType::String),
        (STREET_CODE, DataType::Int64),
        (SEG_ID, DataType::Int64),
        (UNIT_TYPE, DataType::String),
        (UNIT_NUM, DataType::String),
        (PARENT_ADDRESS, DataType::String),
        (ZIP_CODE, DataType::String),
        (WARD, DataType::String),
        (ACCOUNT_NUM, DataType::String),
        (UTILITY_PARCEL_ID, DataType::String),
        (REGISTRY_PARCEL_ID, DataType::String),
        (ADDRESS_KEY, DataType::String),
        (OWNERS, DataType::String),
        (GEOCODE_X, DataType::Float64),
        (GEOCODE_Y, DataType::Float64),
        (PARCEL_X, DataType::Float64),
        (PARCEL_Y, DataType::Float64),
        (STREET_X, DataType::Float64),
        (STREET_Y, DataType::Float64),
    ]
}

/// Required columns of the street segment frame.
#[must_use]
pub fn segment_columns() -> Vec<(&'static str, DataType)> {
    vec![
        (SEG_ID, DataType::Int64),
        (STREET_CODE, DataType::Int64),
        (STREET_NAME, DataType::String),
        (STREET_PREDIR, DataType::String),
        (STREET_SUFFIX, DataType::String),
        (STREET_POSTDIR, DataType::String),
        (LOW_NUM, DataType::Int64),
        (HIGH_NUM, DataType::Int64),
        (GEOCODE_X, DataType::Float64),
        (GEOCODE_Y, DataType::Float64),
    ]
}

/// Required columns of the intersection frame. The index builder stores each
/// crossing with `street_1_code <= street_2_code`.
#[must_use]
pub fn intersection_columns() -> Vec<(&'static str, DataType)> {
    vec![
        (INT_ID, DataType::Int64),
        (SEG_ID, DataType::Int64),
        (STREET_1_CODE, DataType::Int64),
        (STREET_1_NAME, DataType::String),
        (STREET_1_FULL, DataType::String),
        (STREET_2_CODE, DataType::Int64),
        (STREET_2_NAME, DataType::String),
        (STREET_2_FULL, DataType::String),
        (GEOCODE_X, DataType::Float64),
        (GEOCODE_Y, DataType::Float64),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_columns_are_part_of_the_address_schema() {
        let names: Vec<&str> = address_columns().iter().map(|(n, _)| *n).collect();
        for col in CANONICAL_ORDER {
            assert!(names.contains(&col), "missing sort column: {col}");
        }
    }
}
