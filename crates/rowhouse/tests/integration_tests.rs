//! Integration tests for rowhouse query resolution.
//!
//! These run against the full public API over the fixture index. A
//! canned parser stands in for a real address standardizer so the
//! tests exercise routing, resolution, and pagination end to end.

use rowhouse::query::{ParsedQuery, QueryParser, QueryType};
use rowhouse::{
    AddressSearcher, SearchError, SearchOptions, SearchType,
};

fn setup_test_env() {
    let _ = rowhouse::init_logging(tracing::Level::WARN);
}

/// Canned standardizer: uppercase inputs map onto parsed queries the
/// way a real parser would emit them.
struct CannedParser;

impl QueryParser for CannedParser {
    fn parse(&self, raw: &str) -> ParsedQuery {
        let raw = raw.to_uppercase();
        match raw.as_str() {
            "440 N BROAD ST" => ParsedQuery::builder()
                .query_type(QueryType::Address)
                .low_num(440)
                .street_predir("N")
                .street_name("BROAD")
                .street_suffix("ST")
                .seg_id(440001)
                .output_address("440 N BROAD ST")
                .build(),
            "440 N BROAD ST UNIT 510" => ParsedQuery::builder()
                .query_type(QueryType::Address)
                .low_num(440)
                .street_predir("N")
                .street_name("BROAD")
                .street_suffix("ST")
                .unit("UNIT", "510")
                .output_address("440 N BROAD ST UNIT 510")
                .build(),
            "1230-34 MARKET ST" => ParsedQuery::builder()
                .query_type(QueryType::Address)
                .low_num(1230)
                .high_num(1234)
                .street_name("MARKET")
                .street_suffix("ST")
                .output_address("1230-34 MARKET ST")
                .build(),
            "1230 MARKET ST" => ParsedQuery::builder()
                .query_type(QueryType::Address)
                .low_num(1230)
                .street_name("MARKET")
                .street_suffix("ST")
                .output_address("1230 MARKET ST")
                .build(),
            "720 PINE ST" => ParsedQuery::builder()
                .query_type(QueryType::Address)
                .low_num(720)
                .street_name("PINE")
                .street_suffix("ST")
                .seg_id(770001)
                .output_address("720 PINE ST")
                .build(),
            "1200 BLOCK OF MARKET ST" => ParsedQuery::builder()
                .query_type(QueryType::Block)
                .low_num(1234)
                .street_name("MARKET")
                .street_suffix("ST")
                .output_address("1200 BLOCK MARKET ST")
                .build(),
            "BROAD AND MARKET" | "MARKET AND BROAD" => {
                let (first, second) = if raw.starts_with("BROAD") {
                    (("BROAD", 2710), ("MARKET", 53560))
                } else {
                    (("MARKET", 53560), ("BROAD", 2710))
                };
                ParsedQuery::builder()
                    .query_type(QueryType::Intersection)
                    .street_name(first.0)
                    .street_code(first.1)
                    .street_2_name(second.0)
                    .street_2_code(second.1)
                    .output_address(format!("{} ST & {} ST", first.0, second.0))
                    .build()
            }
            "A2710440" => ParsedQuery::builder()
                .query_type(QueryType::Account)
                .output_address("A2710440")
                .build(),
            _ => ParsedQuery::default(),
        }
    }
}

fn searcher() -> AddressSearcher<CannedParser> {
    let data = rowhouse::index::test_data::sample_index().expect("Should build fixture index");
    AddressSearcher::new(CannedParser, data)
}

#[test]
fn test_full_address_workflow() {
    setup_test_env();
    let searcher = searcher();

    // 1. Plain address lookup matches only the base record.
    let response = searcher
        .search("440 N Broad St", &SearchOptions::default())
        .expect("Address search should work");
    assert_eq!(response.search_type, SearchType::Address);
    assert_eq!(response.normalized, vec!["440 N BROAD ST"]);
    let entries = response.page.addresses().expect("Should be address records");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].street_address, "440 N BROAD ST");
    assert_eq!(entries[0].unit_num, "");

    // 2. Same lookup with unit expansion pulls in the children.
    let options = SearchOptions::builder().include_units(true).build();
    let response = searcher
        .search("440 N Broad St", &options)
        .expect("Expanded search should work");
    assert_eq!(response.page.total_items, 3);

    // 3. A unit query matches exactly its unit record.
    let response = searcher
        .search("440 N BROAD ST UNIT 510", &options)
        .expect("Unit search should work");
    let entries = response.page.addresses().expect("Should be address records");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].unit_num, "510");
}

#[test]
fn test_range_strictness() {
    setup_test_env();
    let searcher = searcher();

    // The unranged form of a ranged record is not a silent match.
    let err = searcher
        .search("1230 MARKET ST", &SearchOptions::default())
        .expect_err("Unranged query should not match the ranged record");
    assert!(matches!(err, SearchError::NotFound { .. }));

    let response = searcher
        .search("1230-34 MARKET ST", &SearchOptions::default())
        .expect("Ranged query should match");
    let entries = response.page.addresses().expect("Should be address records");
    assert_eq!(entries[0].street_address, "1230-34 MARKET ST");
}

#[test]
fn test_segment_cascade() {
    setup_test_env();
    let searcher = searcher();

    // 720 PINE ST has no address record but sits on a known segment.
    let response = searcher
        .search("720 Pine St", &SearchOptions::default())
        .expect("Cascade should synthesize a match");
    let entries = response.page.addresses().expect("Should be address records");
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert_eq!(entry.street_address, "720 PINE ST");
    assert_eq!(entry.seg_id, Some(770001));
    // Identifiers are explicitly null so callers can tell a
    // synthesized match from a known address.
    assert!(entry.is_unidentified());
    assert!(entry.geocode_x.is_some(), "Should sit at the segment midpoint");
}

#[test]
fn test_intersection_commutativity() {
    setup_test_env();
    let searcher = searcher();

    let ab = searcher
        .search("broad and market", &SearchOptions::default())
        .expect("Intersection search should work");
    let ba = searcher
        .search("market and broad", &SearchOptions::default())
        .expect("Reversed intersection search should work");

    let ab_entries = ab.page.intersections().expect("Should be intersections");
    let ba_entries = ba.page.intersections().expect("Should be intersections");
    assert_eq!(ab_entries.len(), 1);
    // Same canonical record regardless of street order, and the
    // duplicated pair resolves to the lowest segment id.
    assert_eq!(ab_entries[0].int_id, ba_entries[0].int_id);
    assert_eq!(ab_entries[0].seg_id, Some(550000));
}

#[test]
fn test_block_listing() {
    setup_test_env();
    let searcher = searcher();

    let response = searcher
        .search("1200 block of market st", &SearchOptions::default())
        .expect("Block search should work");
    assert_eq!(response.search_type, SearchType::Block);

    let entries = response.page.addresses().expect("Should be address records");
    // 1230-34, 1234 and 1234 1/2 MARKET ST; the range member 1232 is
    // a child and block listings show base addresses only.
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| !e.is_child()));
    assert!(entries.iter().all(|e| {
        let low = e.address_low.expect("Fixture rows carry house numbers");
        (1200..1300).contains(&low)
    }));
}

#[test]
fn test_owner_search() {
    setup_test_env();
    let searcher = searcher();

    let response = searcher
        .owner_search("smith john", &SearchOptions::default())
        .expect("Owner search should work");
    assert_eq!(response.search_type, SearchType::Owner);
    assert_eq!(response.normalized, vec!["SMITH", "JOHN"]);
    assert_eq!(response.page.total_items, 2);

    // All tokens must match, so a narrower query narrows the result.
    let response = searcher
        .owner_search("smith jane", &SearchOptions::default())
        .expect("Owner search should work");
    assert_eq!(response.page.total_items, 1);
}

#[test]
fn test_identifier_lookups() {
    setup_test_env();
    let searcher = searcher();
    let options = SearchOptions::default();

    // Routed through the parser.
    let response = searcher
        .search("A2710440", &options)
        .expect("Account query should route through the dispatcher");
    assert_eq!(response.search_type, SearchType::Account);

    // Direct entry points.
    let response = searcher
        .lookup_account("A2710440", &options)
        .expect("Account lookup should work");
    let entries = response.page.addresses().expect("Should be address records");
    assert_eq!(entries[0].street_address, "440 N BROAD ST");

    let response = searcher
        .lookup_registry_parcel("005N070144", &options)
        .expect("Registry parcel lookup should work");
    assert_eq!(response.page.total_items, 1);

    let response = searcher
        .lookup_utility_parcel("101", &options)
        .expect("Utility parcel lookup should work");
    assert_eq!(response.page.total_items, 1);

    // A delimited query matches on the part the parser saw, not the
    // whole delimited string.
    let response = searcher
        .search("A2710440;junk", &options)
        .expect("Identifier in a delimited query should resolve");
    assert_eq!(response.search_type, SearchType::Account);
    assert!(response.page.total_items >= 1);

    // Identifier lookups are exact, not prefix.
    let err = searcher
        .lookup_registry_parcel("005N07", &options)
        .expect_err("Prefix should not match");
    assert!(matches!(err, SearchError::NotFound { .. }));

    let err = searcher
        .lookup_account("   ", &options)
        .expect_err("Blank identifier should be rejected");
    assert!(matches!(err, SearchError::BadRequest { .. }));
}

#[test]
fn test_pagination_metadata() {
    setup_test_env();
    let searcher = searcher();

    let options = SearchOptions::builder().page("1").build();
    let response = searcher
        .owner_search("smith", &options)
        .expect("Paged search should work");
    assert_eq!(response.page.page_num, 1);
    assert_eq!(response.page.total_items, 2);
    assert!(!response.page.has_next());

    // A page past the end is an empty page, not an error.
    let options = SearchOptions::builder().page("5").build();
    let response = searcher
        .owner_search("smith", &options)
        .expect("Past-the-end page should still respond");
    assert!(response.page.is_empty());
    assert_eq!(response.page.total_items, 2);
    assert!(response.page.has_previous());

    // Bad page arguments are bad requests.
    for bad in ["0", "-1", "abc"] {
        let options = SearchOptions::builder().page(bad).build();
        let err = searcher
            .owner_search("smith", &options)
            .expect_err("Bad page should be rejected");
        assert!(matches!(err, SearchError::BadRequest { .. }), "{bad:?}");
    }
}

#[test]
fn test_query_length_ceiling() {
    setup_test_env();
    let searcher = searcher();

    // 57 characters of query; fine on its own.
    let query = format!("440 N BROAD ST{}", " ".repeat(43));
    assert_eq!(query.trim().len(), 14);
    let response = searcher.search(&query, &SearchOptions::default());
    assert!(response.is_ok(), "Trimmed query should pass the ceiling");

    let long = "A".repeat(61);
    let err = searcher
        .search(&long, &SearchOptions::default())
        .expect_err("Overlong query should be rejected");
    assert!(matches!(err, SearchError::BadRequest { .. }));

    // Reaching the ceiling exactly is a rejection too.
    let at_ceiling = "A".repeat(60);
    let err = searcher
        .search(&at_ceiling, &SearchOptions::default())
        .expect_err("Query at the ceiling should be rejected");
    match err {
        SearchError::BadRequest { message, .. } => {
            assert!(message.contains("character limit"), "{message}");
        }
        other => panic!("expected a bad request, got {other:?}"),
    }

    // One character below the ceiling reaches the parser instead.
    let below_ceiling = "A".repeat(59);
    let err = searcher
        .search(&below_ceiling, &SearchOptions::default())
        .expect_err("Unrecognized query should still be rejected");
    match err {
        SearchError::BadRequest { message, .. } => {
            assert!(!message.contains("character limit"), "{message}");
        }
        other => panic!("expected a bad request, got {other:?}"),
    }

    // Option names count toward the ceiling.
    let query = "A".repeat(50);
    let options = SearchOptions::builder()
        .include_units(true)
        .build();
    let err = searcher
        .search(&query, &options)
        .expect_err("Query plus option names should breach the ceiling");
    assert!(matches!(err, SearchError::BadRequest { .. }));
}

#[cfg(feature = "legacy-batch")]
#[test]
fn test_legacy_batch_union() {
    setup_test_env();
    let searcher = searcher();

    let response = searcher
        .search_all("440 N Broad St;1230-34 Market St", &SearchOptions::default())
        .expect("Batch search should work");
    assert_eq!(response.page.total_items, 2);
    assert_eq!(
        response.normalized,
        vec!["440 N BROAD ST", "1230-34 MARKET ST"]
    );

    // Duplicate sub-queries collapse.
    let response = searcher
        .search_all("440 N Broad St;440 N Broad St", &SearchOptions::default())
        .expect("Duplicate batch should work");
    assert_eq!(response.page.total_items, 1);

    // Output order is canonical, not sub-query order.
    let response = searcher
        .search_all("1230-34 Market St;440 N Broad St", &SearchOptions::default())
        .expect("Reversed batch should work");
    let entries = response.page.addresses().expect("Should be address records");
    assert_eq!(entries[0].street_address, "440 N BROAD ST");
}
