//! Unioning match sets from multi-part queries.

use anyhow::anyhow;
use polars::prelude::*;

use super::{MatchKind, MatchSet, Result};

/// Union any number of address match sets into one.
///
/// The result is deduplicated on the canonical street-address string
/// and re-sorted into canonical order, so the output is identical no
/// matter how members arrived across sub-queries.
pub fn union_match_sets(sets: Vec<MatchSet>) -> Result<MatchSet> {
    if sets.is_empty() {
        return Err(anyhow!("cannot union zero match sets").into());
    }
    if sets.iter().any(|s| s.kind != MatchKind::Address) {
        return Err(anyhow!("only address match sets can be unioned").into());
    }

    let frames: Vec<LazyFrame> = sets.into_iter().map(|s| s.df.lazy()).collect();
    MatchSet::from_address_lazy(concat(frames, UnionArgs::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AddressField, FilterSpec};
    use crate::resolve::{ResolvePolicy, resolve_filters_inner};
    use rowhouse_index::{schema, test_data};

    fn addresses() -> LazyFrame {
        test_data::sample_addresses().unwrap().lazy()
    }

    fn by_street_name(name: &str) -> MatchSet {
        let mut spec = FilterSpec::default();
        spec.insert_loose(AddressField::StreetName, name);
        resolve_filters_inner(addresses(), &spec, &ResolvePolicy::default()).unwrap()
    }

    #[test]
    fn union_preserves_distinct_members() {
        let juniper = by_street_name("JUNIPER");
        let chestnut = by_street_name("CHESTNUT");
        let total = juniper.total() + chestnut.total();

        let unioned = union_match_sets(vec![juniper, chestnut]).unwrap();
        assert_eq!(unioned.total(), total);
    }

    #[test]
    fn overlapping_sets_collapse() {
        let juniper = by_street_name("JUNIPER");
        let again = by_street_name("JUNIPER");
        let expected = juniper.total();

        let unioned = union_match_sets(vec![juniper, again]).unwrap();
        assert_eq!(unioned.total(), expected);
    }

    #[test]
    fn union_output_stays_canonically_ordered() {
        // Deliberately union in reverse street-code order.
        let market = by_street_name("MARKET"); // 53560
        let broad = by_street_name("BROAD"); // 2710
        let unioned = union_match_sets(vec![market, broad]).unwrap();

        let codes: Vec<i64> = unioned
            .records()
            .column(schema::STREET_CODE)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(union_match_sets(vec![]).is_err());
    }
}
