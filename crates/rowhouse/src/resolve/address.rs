//! Core address resolution against the address frame.

use polars::prelude::*;
use tracing::{debug, instrument};

use super::{MatchSet, ResolvePolicy, Result};
use crate::filter::FilterSpec;
use rowhouse_index::schema;

/// Resolve a compiled [`FilterSpec`] against the address frame,
/// applying the given policy to the matched set.
#[instrument(skip_all, fields(filters = ?spec))]
pub fn resolve_filters_inner(
    addresses: LazyFrame,
    spec: &FilterSpec,
    policy: &ResolvePolicy,
) -> Result<MatchSet> {
    let predicate = spec.predicate().unwrap_or_else(|| lit(true));
    let mut lf = addresses.clone().filter(predicate);

    if policy.exclude_children {
        lf = lf.filter(col(schema::PARENT_ADDRESS).is_null());
    }

    // Child units are pulled in by identity of the matched base
    // addresses, never for queries that already name a unit.
    if policy.include_child_units && !spec.has_unit() {
        let base = lf.collect()?;
        let parents: Vec<String> = base
            .column(schema::STREET_ADDRESS)?
            .str()?
            .into_iter()
            .flatten()
            .map(ToString::to_string)
            .collect();
        debug!(base = base.height(), "expanding child units");

        lf = if parents.is_empty() {
            base.lazy()
        } else {
            let children = addresses.filter(
                col(schema::PARENT_ADDRESS)
                    .is_in(lit(Series::new("parents".into(), parents)).implode(), false),
            );
            concat(vec![base.lazy(), children], UnionArgs::default())?
        };
    }

    if policy.identified_only {
        lf = lf.filter(col(schema::ACCOUNT_NUM).is_not_null());
    }

    if policy.parcel_geocode || policy.street_geocode {
        lf = lf.with_columns([
            geocode_fallback(policy, schema::GEOCODE_X, schema::PARCEL_X, schema::STREET_X)
                .alias(schema::GEOCODE_X),
            geocode_fallback(policy, schema::GEOCODE_Y, schema::PARCEL_Y, schema::STREET_Y)
                .alias(schema::GEOCODE_Y),
        ]);
    }

    MatchSet::from_address_lazy(lf)
}

/// Fill a missing direct geocode from the parcel centroid, then from
/// the street-segment midpoint, per the policy flags.
fn geocode_fallback(policy: &ResolvePolicy, direct: &str, parcel: &str, street: &str) -> Expr {
    let mut expr = col(direct);
    if policy.parcel_geocode {
        expr = when(expr.clone().is_null())
            .then(col(parcel))
            .otherwise(expr);
    }
    if policy.street_geocode {
        expr = when(expr.clone().is_null())
            .then(col(street))
            .otherwise(expr);
    }
    expr
}

/// Resolve an owner-name query: every whitespace token of the
/// uppercased input must appear as a substring of the record's owner
/// string.
#[instrument(skip(addresses))]
pub fn resolve_owner_inner(
    addresses: LazyFrame,
    tokens: &[String],
    policy: &ResolvePolicy,
) -> Result<MatchSet> {
    if tokens.is_empty() {
        return MatchSet::from_address_lazy(addresses.filter(lit(false)));
    }

    let mut predicate = col(schema::OWNERS).is_not_null();
    for token in tokens {
        predicate = predicate.and(
            col(schema::OWNERS)
                .str()
                .contains_literal(lit(token.clone())),
        );
    }

    let mut lf = addresses.filter(predicate);
    if policy.identified_only {
        lf = lf.filter(col(schema::ACCOUNT_NUM).is_not_null());
    }
    MatchSet::from_address_lazy(lf)
}

/// Resolve an exact identifier lookup against a single index column.
#[instrument(skip(addresses))]
pub fn resolve_identifier_inner(
    addresses: LazyFrame,
    column: &str,
    value: &str,
) -> Result<MatchSet> {
    MatchSet::from_address_lazy(addresses.filter(col(column).eq(lit(value))))
}
