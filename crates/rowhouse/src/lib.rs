//! Rowhouse - Address Query Resolution Engine
//!
//! Rowhouse resolves free-text address queries, cross-street queries,
//! and property-identifier lookups against a pre-built address index.
//! Parsing is pluggable: a [`QueryParser`](query::QueryParser) turns
//! raw text into a structured query, and the engine compiles it into
//! dataframe filters, resolves matches, and returns deterministic,
//! paginated results.
//!
//! # Quick Start
//!
//! ```rust
//! use rowhouse::query::{ParsedQuery, QueryParser, QueryType};
//! use rowhouse::{AddressSearcher, SearchOptions};
//!
//! // A real deployment plugs in a full address standardizer; this
//! // one only knows a single address.
//! struct FixedParser;
//!
//! impl QueryParser for FixedParser {
//!     fn parse(&self, raw: &str) -> ParsedQuery {
//!         ParsedQuery::builder()
//!             .query_type(QueryType::Address)
//!             .low_num(440)
//!             .street_predir("N")
//!             .street_name("BROAD")
//!             .street_suffix("ST")
//!             .output_address(raw.to_uppercase())
//!             .build()
//!     }
//! }
//!
//! let data = rowhouse::index::test_data::sample_index()?;
//! let searcher = AddressSearcher::new(FixedParser, data);
//!
//! let response = searcher.search("440 N Broad St", &SearchOptions::default())?;
//! let entries = response.page.addresses()?;
//! assert_eq!(entries[0].street_address, "440 N BROAD ST");
//! # Ok::<(), rowhouse::error::RowhouseError>(())
//! ```
//!
//! # What resolution gives you
//!
//! - **Loose/strict filtering**: components the query omits either
//!   relax the match (street directionals) or restrict it (ranges,
//!   units), so "1230 MARKET ST" never silently matches the ranged
//!   record "1230-34 MARKET ST".
//! - **Segment fallback**: addresses with no record of their own
//!   resolve onto their street segment, with every property
//!   identifier explicitly null.
//! - **Deterministic output**: match sets are deduplicated and
//!   canonically ordered, so pagination is stable across requests.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod core;
pub mod entry;
pub mod error;
pub mod filter;
pub mod page;
pub mod query;
pub mod resolve;

pub use crate::core::{AddressSearcher, QUERY_LENGTH_CEILING, SearchResponse, SearchType};
pub use config::{DEFAULT_SRID, SearchOptions, SearchOptionsBuilder};
pub use entry::{AddressEntry, IntersectionEntry};
pub use page::{DEFAULT_PAGE_SIZE, Page, Paginator};
pub use polars;
pub use resolve::{MatchKind, MatchSet, ResolvePolicy, SearchError};
// Re-export the index data layer subcrate
pub use rowhouse_index as index;
pub use rowhouse_index::AddressIndexData;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the library. Safe to call more than once;
/// only the first call installs the subscriber.
///
/// ```rust
/// use rowhouse::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), rowhouse::error::RowhouseError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::RowhouseError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("polars=warn".parse().unwrap());

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ParsedQuery, QueryParser, QueryType};

    fn setup_test_env() {
        let _ = init_logging(tracing::Level::WARN);
    }

    /// Maps a handful of canned inputs onto parsed queries, standing
    /// in for a real standardizer.
    struct CannedParser;

    impl QueryParser for CannedParser {
        fn parse(&self, raw: &str) -> ParsedQuery {
            match raw.to_uppercase().as_str() {
                "440 N BROAD ST" => ParsedQuery::builder()
                    .query_type(QueryType::Address)
                    .low_num(440)
                    .street_predir("N")
                    .street_name("BROAD")
                    .street_suffix("ST")
                    .output_address("440 N BROAD ST")
                    .build(),
                "BROAD AND MARKET" => ParsedQuery::builder()
                    .query_type(QueryType::Intersection)
                    .street_name("BROAD")
                    .street_code(2710)
                    .street_2_name("MARKET")
                    .street_2_code(53560)
                    .output_address("BROAD ST & MARKET ST")
                    .build(),
                _ => ParsedQuery::default(),
            }
        }
    }

    fn searcher() -> AddressSearcher<CannedParser> {
        let data = index::test_data::sample_index().unwrap();
        AddressSearcher::new(CannedParser, data)
    }

    #[test]
    fn address_search_round_trip() {
        setup_test_env();
        let response = searcher()
            .search("440 N Broad St", &SearchOptions::default())
            .unwrap();
        assert_eq!(response.search_type, SearchType::Address);
        assert_eq!(response.page.total_items, 1);
        assert_eq!(response.srid, DEFAULT_SRID);
    }

    #[test]
    fn intersection_search_round_trip() {
        setup_test_env();
        let response = searcher()
            .search("broad and market", &SearchOptions::default())
            .unwrap();
        assert_eq!(response.search_type, SearchType::Intersection);
        let entries = response.page.intersections().unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn unrecognized_query_is_a_bad_request() {
        setup_test_env();
        let err = searcher()
            .search("gibberish", &SearchOptions::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::BadRequest { .. }));
    }

    #[test]
    fn overlong_query_is_rejected_before_parsing() {
        setup_test_env();
        let long = "44000 SOMEWHERE EXTREMELY LONG STREET NAME BLVD APT 100000000";
        assert!(long.len() > QUERY_LENGTH_CEILING);
        let err = searcher()
            .search(long, &SearchOptions::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::BadRequest { .. }));
    }
}
