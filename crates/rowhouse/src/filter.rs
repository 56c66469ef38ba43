//! Filter compilation: turning a [`ParsedQuery`](crate::query::ParsedQuery)
//! into dataframe predicates.
//!
//! Two filter strengths exist and are kept in separate maps:
//!
//! * **loose** filters constrain only when the query supplies the
//!   component. An address with no predirectional matches records with
//!   any predirectional.
//! * **strict** filters always constrain. A missing component demands
//!   a missing (or empty) value on the record, so "1230 MARKET ST"
//!   never matches the ranged record "1230-34 MARKET ST", and a
//!   unitless query never matches unit records.

use ahash::AHashMap;
use polars::prelude::*;

use crate::query::ParsedQuery;
use rowhouse_index::schema;

/// Address-record fields a filter can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    StreetName,
    StreetPredir,
    StreetPostdir,
    StreetSuffix,
    AddressLow,
    AddressLowSuffix,
    AddressLowFrac,
    AddressHigh,
    UnitType,
    UnitNum,
}

impl AddressField {
    /// The index column this field compares against.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::StreetName => schema::STREET_NAME,
            Self::StreetPredir => schema::STREET_PREDIR,
            Self::StreetPostdir => schema::STREET_POSTDIR,
            Self::StreetSuffix => schema::STREET_SUFFIX,
            Self::AddressLow => schema::ADDRESS_LOW,
            Self::AddressLowSuffix => schema::ADDRESS_LOW_SUFFIX,
            Self::AddressLowFrac => schema::ADDRESS_LOW_FRAC,
            Self::AddressHigh => schema::ADDRESS_HIGH,
            Self::UnitType => schema::UNIT_TYPE,
            Self::UnitNum => schema::UNIT_NUM,
        }
    }

    const fn is_numeric(self) -> bool {
        matches!(self, Self::AddressLow | Self::AddressHigh)
    }
}

/// A single filter value, typed so numeric columns compare as numbers
/// when the query produced a number.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(i64),
    Text(String),
}

impl FilterValue {
    /// Classify a raw token: numeric when it parses as an integer,
    /// text otherwise. Text against a numeric column compares via a
    /// string cast, so "12A" matches nothing rather than erroring.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        token
            .parse::<i64>()
            .map_or_else(|_| Self::Text(token.to_string()), Self::Number)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A compiled set of filters over the address frame.
///
/// Loose and strict maps are disjoint by construction: inserting a
/// field into one map while it sits in the other is a bug in the
/// compiler, caught by a debug assertion.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    loose: AHashMap<AddressField, FilterValue>,
    strict: AHashMap<AddressField, Option<FilterValue>>,
    /// Half-open house-number window `[low, high)` for block queries.
    window: Option<(i64, i64)>,
}

impl FilterSpec {
    pub fn insert_loose(&mut self, field: AddressField, value: impl Into<FilterValue>) {
        debug_assert!(
            !self.strict.contains_key(&field),
            "{field:?} already constrained strictly"
        );
        self.loose.insert(field, value.into());
    }

    /// Insert a strict constraint. `None` demands a null value on the
    /// record.
    pub fn insert_strict(&mut self, field: AddressField, value: Option<FilterValue>) {
        debug_assert!(
            !self.loose.contains_key(&field),
            "{field:?} already constrained loosely"
        );
        self.strict.insert(field, value);
    }

    pub fn set_window(&mut self, low: i64, high: i64) {
        self.window = Some((low, high));
    }

    #[must_use]
    pub fn loose_value(&self, field: AddressField) -> Option<&FilterValue> {
        self.loose.get(&field)
    }

    #[must_use]
    pub fn strict_value(&self, field: AddressField) -> Option<&Option<FilterValue>> {
        self.strict.get(&field)
    }

    #[must_use]
    pub fn window(&self) -> Option<(i64, i64)> {
        self.window
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loose.is_empty() && self.strict.is_empty() && self.window.is_none()
    }

    /// The spec pins a house-number range high bound.
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self.strict.get(&AddressField::AddressHigh), Some(Some(_)))
    }

    /// The spec demands a specific non-empty unit number.
    #[must_use]
    pub fn has_unit(&self) -> bool {
        matches!(
            self.strict.get(&AddressField::UnitNum),
            Some(Some(FilterValue::Text(s))) if !s.is_empty()
        )
    }

    /// Conjoin every filter into a single predicate expression.
    /// Returns `None` when the spec carries no constraints at all.
    #[must_use]
    pub fn predicate(&self) -> Option<Expr> {
        let mut parts = Vec::new();

        for (field, value) in &self.loose {
            parts.push(equality_expr(*field, value));
        }
        for (field, value) in &self.strict {
            match value {
                Some(v) => parts.push(equality_expr(*field, v)),
                None => parts.push(col(field.column()).is_null()),
            }
        }
        if let Some((low, high)) = self.window {
            parts.push(
                col(schema::ADDRESS_LOW)
                    .gt_eq(lit(low))
                    .and(col(schema::ADDRESS_LOW).lt(lit(high))),
            );
        }

        parts.into_iter().reduce(|acc, e| acc.and(e))
    }
}

fn equality_expr(field: AddressField, value: &FilterValue) -> Expr {
    match value {
        FilterValue::Number(n) => col(field.column()).eq(lit(*n)),
        FilterValue::Text(s) if field.is_numeric() => col(field.column())
            .cast(DataType::String)
            .eq(lit(s.clone())),
        FilterValue::Text(s) => col(field.column()).eq(lit(s.clone())),
    }
}

/// Compile the filters for a single-address query.
///
/// Street components and house-number parts go in loose; the range
/// high bound and the unit number go in strict. A query with no unit
/// compiles to `unit_num == ""`, which is how unitless records store
/// the field.
#[must_use]
pub fn compile_address_filters(parsed: &ParsedQuery) -> FilterSpec {
    let mut spec = FilterSpec::default();

    if let Some(name) = &parsed.street.name {
        spec.insert_loose(AddressField::StreetName, name.as_str());
    }
    if let Some(predir) = &parsed.street.predir {
        spec.insert_loose(AddressField::StreetPredir, predir.as_str());
    }
    if let Some(postdir) = &parsed.street.postdir {
        spec.insert_loose(AddressField::StreetPostdir, postdir.as_str());
    }
    if let Some(suffix) = &parsed.street.suffix {
        spec.insert_loose(AddressField::StreetSuffix, suffix.as_str());
    }

    // Prefer the parsed low number; fall back to the raw house-number
    // token so non-numeric inputs still compile (and match nothing
    // numeric).
    if let Some(low) = parsed.range.low_num {
        spec.insert_loose(AddressField::AddressLow, low);
    } else if let Some(full) = &parsed.range.full {
        spec.insert_loose(AddressField::AddressLow, FilterValue::from_token(full));
    }
    if let Some(low_suffix) = &parsed.range.low_suffix {
        spec.insert_loose(AddressField::AddressLowSuffix, low_suffix.as_str());
    }
    if let Some(frac) = &parsed.range.fractional {
        spec.insert_loose(AddressField::AddressLowFrac, frac.as_str());
    }
    if let Some(unit_type) = &parsed.unit.unit_type {
        spec.insert_loose(AddressField::UnitType, unit_type.as_str());
    }

    spec.insert_strict(
        AddressField::AddressHigh,
        parsed.range.high_num.map(FilterValue::Number),
    );
    let unit_num = parsed.unit.unit_num.clone().unwrap_or_default();
    spec.insert_strict(AddressField::UnitNum, Some(FilterValue::Text(unit_num)));

    spec
}

/// Compile the filters for a hundred-block query: street components
/// loose, plus a house-number window covering the block.
///
/// Returns `None` when the query carries no usable block number.
#[must_use]
pub fn compile_block_filters(parsed: &ParsedQuery) -> Option<FilterSpec> {
    let number = parsed
        .range
        .low_num
        .or_else(|| parsed.range.full.as_deref().and_then(|f| f.parse().ok()))?;

    let mut spec = FilterSpec::default();
    if let Some(name) = &parsed.street.name {
        spec.insert_loose(AddressField::StreetName, name.as_str());
    }
    if let Some(predir) = &parsed.street.predir {
        spec.insert_loose(AddressField::StreetPredir, predir.as_str());
    }
    if let Some(postdir) = &parsed.street.postdir {
        spec.insert_loose(AddressField::StreetPostdir, postdir.as_str());
    }
    if let Some(suffix) = &parsed.street.suffix {
        spec.insert_loose(AddressField::StreetSuffix, suffix.as_str());
    }

    let block_start = (number / 100) * 100;
    spec.set_window(block_start, block_start + 100);
    Some(spec)
}

/// A normalized pair of street codes identifying an intersection.
///
/// Built through [`IntersectionKey::normalize`], which orders the two
/// codes so "A and B" and "B and A" produce the same key.
///
/// ```rust
/// use rowhouse::filter::IntersectionKey;
///
/// let ab = IntersectionKey::normalize(Some(27100), Some(54090));
/// let ba = IntersectionKey::normalize(Some(54090), Some(27100));
/// assert_eq!(ab, ba);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntersectionKey {
    pub first: i64,
    pub second: i64,
}

impl IntersectionKey {
    /// Order a pair of street codes into a canonical key. Returns
    /// `None` unless both streets resolved to a code.
    #[must_use]
    pub fn normalize(code_1: Option<i64>, code_2: Option<i64>) -> Option<Self> {
        let (a, b) = (code_1?, code_2?);
        Some(Self {
            first: a.min(b),
            second: a.max(b),
        })
    }
}
