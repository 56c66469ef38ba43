//! Parsed-query model handed to the resolution engine.
//!
//! The engine does not parse free text itself. A [`QueryParser`]
//! implementation (typically a separate address-standardization crate)
//! turns raw input into a [`ParsedQuery`], and everything downstream
//! works off that structured form.

/// What kind of thing a raw query turned out to be.
///
/// The dispatcher matches on this exhaustively, so adding a variant
/// forces every routing site to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryType {
    /// A street address, possibly with a range or unit.
    Address,
    /// Two cross streets ("broad and market").
    Intersection,
    /// An owner-assessment account number.
    Account,
    /// A map-registry parcel identifier.
    RegistryParcel,
    /// A hundred-block request ("1200 block of market st").
    Block,
    /// The parser could not classify the input.
    #[default]
    Unknown,
}

/// Street-name components of a parsed address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetParts {
    /// Full standardized street string ("N BROAD ST").
    pub full: Option<String>,
    /// Base street name ("BROAD").
    pub name: Option<String>,
    /// Predirectional ("N").
    pub predir: Option<String>,
    /// Postdirectional.
    pub postdir: Option<String>,
    /// Suffix ("ST", "AVE").
    pub suffix: Option<String>,
    /// Numeric street code from the street centerline.
    pub street_code: Option<i64>,
}

/// House-number components of a parsed address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeParts {
    /// Low house number, when the parser could read one.
    pub low_num: Option<i64>,
    /// High house number of a ranged address ("1230-34").
    pub high_num: Option<i64>,
    /// The full house-number token as written, kept for inputs the
    /// parser could not reduce to a number.
    pub full: Option<String>,
    /// Alphabetic low suffix ("A" in "12A").
    pub low_suffix: Option<String>,
    /// Fractional part ("1/2").
    pub fractional: Option<String>,
}

/// Unit components of a parsed address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitParts {
    /// Unit designator ("APT", "STE", "UNIT").
    pub unit_type: Option<String>,
    /// Unit number or letter. Absent means the query named no unit,
    /// which is not the same as matching only unitless records.
    pub unit_num: Option<String>,
}

/// Structured form of a single query, as produced by a [`QueryParser`].
///
/// All components are optional; the filter compiler decides which of
/// them constrain the match and how.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedQuery {
    pub query_type: QueryType,
    /// Primary street.
    pub street: StreetParts,
    /// Second street of an intersection query.
    pub street_2: StreetParts,
    pub range: RangeParts,
    pub unit: UnitParts,
    /// Street-segment identifier the parser mapped the address onto.
    pub seg_id: Option<i64>,
    /// The bare address a unit query sits on ("440 N BROAD ST" for
    /// "440 N BROAD ST UNIT 510").
    pub base_address: Option<String>,
    /// Zip code, when the input carried one.
    pub zip_code: Option<String>,
    /// Electoral ward, when the parser could place the address in one.
    pub ward: Option<String>,
    /// The standardized full-address string the parser produced.
    /// Used for not-found reporting and synthesized segment matches.
    pub output_address: String,
}

impl ParsedQuery {
    #[must_use]
    pub fn builder() -> ParsedQueryBuilder {
        ParsedQueryBuilder::default()
    }

    /// The query names a house-number range ("1230-34").
    #[must_use]
    pub fn is_range(&self) -> bool {
        self.range.high_num.is_some()
    }

    /// The query names a specific unit.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.unit.unit_num.is_some()
    }
}

/// Builder for [`ParsedQuery`], mainly useful for tests and for
/// adapting external parsers.
///
/// # Example
///
/// ```rust
/// use rowhouse::query::{ParsedQuery, QueryType};
///
/// let parsed = ParsedQuery::builder()
///     .query_type(QueryType::Address)
///     .low_num(440)
///     .street_name("BROAD")
///     .street_predir("N")
///     .street_suffix("ST")
///     .output_address("440 N BROAD ST")
///     .build();
/// assert!(!parsed.is_range());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParsedQueryBuilder {
    query: ParsedQuery,
}

impl ParsedQueryBuilder {
    #[must_use]
    pub fn query_type(mut self, query_type: QueryType) -> Self {
        self.query.query_type = query_type;
        self
    }

    #[must_use]
    pub fn street_full(mut self, full: impl Into<String>) -> Self {
        self.query.street.full = Some(full.into());
        self
    }

    #[must_use]
    pub fn street_name(mut self, name: impl Into<String>) -> Self {
        self.query.street.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn street_predir(mut self, predir: impl Into<String>) -> Self {
        self.query.street.predir = Some(predir.into());
        self
    }

    #[must_use]
    pub fn street_postdir(mut self, postdir: impl Into<String>) -> Self {
        self.query.street.postdir = Some(postdir.into());
        self
    }

    #[must_use]
    pub fn street_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.query.street.suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn street_code(mut self, code: i64) -> Self {
        self.query.street.street_code = Some(code);
        self
    }

    #[must_use]
    pub fn street_2_name(mut self, name: impl Into<String>) -> Self {
        self.query.street_2.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn street_2_code(mut self, code: i64) -> Self {
        self.query.street_2.street_code = Some(code);
        self
    }

    #[must_use]
    pub fn low_num(mut self, low: i64) -> Self {
        self.query.range.low_num = Some(low);
        self
    }

    #[must_use]
    pub fn high_num(mut self, high: i64) -> Self {
        self.query.range.high_num = Some(high);
        self
    }

    #[must_use]
    pub fn address_full(mut self, full: impl Into<String>) -> Self {
        self.query.range.full = Some(full.into());
        self
    }

    #[must_use]
    pub fn low_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.query.range.low_suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn fractional(mut self, frac: impl Into<String>) -> Self {
        self.query.range.fractional = Some(frac.into());
        self
    }

    #[must_use]
    pub fn unit(mut self, unit_type: impl Into<String>, unit_num: impl Into<String>) -> Self {
        self.query.unit.unit_type = Some(unit_type.into());
        self.query.unit.unit_num = Some(unit_num.into());
        self
    }

    #[must_use]
    pub fn seg_id(mut self, seg_id: i64) -> Self {
        self.query.seg_id = Some(seg_id);
        self
    }

    #[must_use]
    pub fn base_address(mut self, base: impl Into<String>) -> Self {
        self.query.base_address = Some(base.into());
        self
    }

    #[must_use]
    pub fn zip_code(mut self, zip: impl Into<String>) -> Self {
        self.query.zip_code = Some(zip.into());
        self
    }

    #[must_use]
    pub fn ward(mut self, ward: impl Into<String>) -> Self {
        self.query.ward = Some(ward.into());
        self
    }

    #[must_use]
    pub fn output_address(mut self, address: impl Into<String>) -> Self {
        self.query.output_address = address.into();
        self
    }

    #[must_use]
    pub fn build(self) -> ParsedQuery {
        self.query
    }
}

/// Turns raw query text into a [`ParsedQuery`].
///
/// Implementations own all standardization decisions (abbreviation
/// expansion, directional normalization, range splitting). The engine
/// only requires that the output components are uppercase, to match
/// the index.
pub trait QueryParser {
    fn parse(&self, raw: &str) -> ParsedQuery;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assembles_components() {
        let parsed = ParsedQuery::builder()
            .query_type(QueryType::Address)
            .low_num(1230)
            .high_num(1234)
            .street_name("MARKET")
            .street_suffix("ST")
            .output_address("1230-34 MARKET ST")
            .build();

        assert_eq!(parsed.query_type, QueryType::Address);
        assert!(parsed.is_range());
        assert!(!parsed.is_unit());
        assert_eq!(parsed.street.name.as_deref(), Some("MARKET"));
    }

    #[test]
    fn default_query_is_unknown() {
        let parsed = ParsedQuery::default();
        assert_eq!(parsed.query_type, QueryType::Unknown);
        assert!(parsed.output_address.is_empty());
    }

    #[test]
    fn unit_parts_track_presence() {
        let with_unit = ParsedQuery::builder().unit("APT", "510").build();
        assert!(with_unit.is_unit());

        let without = ParsedQuery::builder().build();
        assert!(without.unit.unit_num.is_none());
        assert!(!without.is_unit());
    }
}
