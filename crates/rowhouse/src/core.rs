//! The search entry point: routing parsed queries to resolvers and
//! packaging paged responses.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::config::SearchOptions;
use crate::filter::{IntersectionKey, compile_address_filters, compile_block_filters};
use crate::page::{Page, Paginator};
use crate::query::{ParsedQuery, QueryParser, QueryType};
use crate::resolve::{
    MatchSet, ResolvePolicy, Result, SearchError, cascade_to_segment_inner,
    resolve_filters_inner, resolve_identifier_inner, resolve_intersection_inner,
};
use rowhouse_index::{AddressIndexData, schema};

/// Hard ceiling on query length plus the names of supplied options.
/// A query that reaches it is rejected before parsing.
pub const QUERY_LENGTH_CEILING: usize = 60;

/// Which resolution path produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchType {
    Address,
    Block,
    Owner,
    Intersection,
    Account,
    RegistryParcel,
    UtilityParcel,
}

impl SearchType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Block => "block",
            Self::Owner => "owner",
            Self::Intersection => "intersection",
            Self::Account => "account",
            Self::RegistryParcel => "registry_parcel",
            Self::UtilityParcel => "utility_parcel",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A paged search result plus the context needed to interpret it.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub search_type: SearchType,
    /// The query as received (sans surrounding slashes).
    pub query: String,
    /// Standardized forms of the sub-queries that were resolved.
    pub normalized: Vec<String>,
    /// Spatial reference of the reported positions.
    pub srid: u32,
    pub page: Page,
}

/// Resolves queries against an address index.
///
/// Generic over the [`QueryParser`] so the standardization strategy
/// stays pluggable; the searcher owns routing, resolution, and
/// pagination.
pub struct AddressSearcher<P> {
    parser: P,
    data: AddressIndexData,
}

impl<P: QueryParser> AddressSearcher<P> {
    #[must_use]
    pub fn new(parser: P, data: AddressIndexData) -> Self {
        Self { parser, data }
    }

    /// Open an on-disk index directory.
    pub fn open(parser: P, dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(parser, AddressIndexData::open(dir)?))
    }

    #[must_use]
    pub fn data(&self) -> &AddressIndexData {
        &self.data
    }

    /// Resolve a free-text query.
    ///
    /// The query is parsed, routed on its [`QueryType`], resolved, and
    /// paginated. Only the first semicolon-delimited part is honored
    /// here; multi-part union lives behind `search_all`.
    #[instrument(skip(self, options), fields(query = raw_query))]
    pub fn search(&self, raw_query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        let query = Self::sanitize(raw_query, options)?;
        let first = query
            .split(';')
            .map(str::trim)
            .find(|part| !part.is_empty())
            .unwrap_or("");

        let parsed = self.parser.parse(first);
        debug!(query_type = ?parsed.query_type, normalized = %parsed.output_address, "parsed query");
        self.dispatch(&query, first, &parsed, options)
    }

    /// Resolve an already-parsed query. Useful when the caller runs
    /// its own standardization pass.
    pub fn search_parsed(
        &self,
        query: &str,
        parsed: &ParsedQuery,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        self.dispatch(query, query, parsed, options)
    }

    /// Resolve every semicolon-delimited part of a query and union the
    /// results into one paged response.
    ///
    /// Kept for callers that still batch addresses into one query;
    /// new callers should issue one query per address.
    #[cfg(feature = "legacy-batch")]
    #[instrument(skip(self, options), fields(query = raw_query))]
    pub fn search_all(&self, raw_query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        use itertools::Itertools;
        use rayon::prelude::*;

        let query = Self::sanitize(raw_query, options)?;
        let parts: Vec<&str> = query
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .unique()
            .collect();
        if parts.is_empty() {
            return Err(SearchError::BadRequest {
                input: raw_query.to_string(),
                message: "query is empty".to_string(),
            });
        }

        let parsed: Vec<ParsedQuery> = parts.iter().map(|part| self.parser.parse(part)).collect();
        let policy = Self::address_policy(options);
        let addresses = self.data.addresses()?;
        let jobs: Vec<(&ParsedQuery, polars::prelude::LazyFrame)> =
            parsed.iter().map(|p| (p, addresses.clone())).collect();

        let sets: Vec<MatchSet> = jobs
            .into_par_iter()
            .map(|(p, frame)| {
                let spec = compile_address_filters(p);
                resolve_filters_inner(frame, &spec, &policy)
            })
            .collect::<Result<_>>()?;
        let matches = crate::resolve::union_match_sets(sets)?;
        info!(parts = parts.len(), total = matches.total(), "batch query resolved");

        let normalized = parsed.into_iter().map(|p| p.output_address).collect();
        Self::respond(SearchType::Address, &query, normalized, matches, options)
    }

    /// Resolve an owner-name query: match records whose owner string
    /// contains every whitespace token of the uppercased input.
    #[instrument(skip(self, options))]
    pub fn owner_search(&self, raw_query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        let query = Self::sanitize(raw_query, options)?;
        let tokens: Vec<String> = query
            .to_uppercase()
            .split_whitespace()
            .map(ToString::to_string)
            .collect();

        let policy = Self::address_policy(options);
        let matches =
            crate::resolve::resolve_owner_inner(self.data.addresses()?.clone(), &tokens, &policy)?;
        Self::respond(SearchType::Owner, &query, tokens, matches, options)
    }

    /// Resolve a hundred-block query regardless of how the parser
    /// classified the input.
    #[instrument(skip(self, options))]
    pub fn block_search(&self, raw_query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        let query = Self::sanitize(raw_query, options)?;
        let parsed = self.parser.parse(&query);
        self.resolve_block(&query, &parsed, options)
    }

    /// Exact lookup by owner-assessment account number.
    pub fn lookup_account(&self, number: &str, options: &SearchOptions) -> Result<SearchResponse> {
        self.lookup(SearchType::Account, schema::ACCOUNT_NUM, number, options)
    }

    /// Exact lookup by map-registry parcel id.
    pub fn lookup_registry_parcel(
        &self,
        parcel_id: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        self.lookup(
            SearchType::RegistryParcel,
            schema::REGISTRY_PARCEL_ID,
            parcel_id,
            options,
        )
    }

    /// Exact lookup by utility parcel id.
    pub fn lookup_utility_parcel(
        &self,
        parcel_id: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        self.lookup(
            SearchType::UtilityParcel,
            schema::UTILITY_PARCEL_ID,
            parcel_id,
            options,
        )
    }

    /// `part` is the sub-query the parser actually saw; identifier
    /// lookups match on it rather than the full delimited input.
    fn dispatch(
        &self,
        query: &str,
        part: &str,
        parsed: &ParsedQuery,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        match parsed.query_type {
            QueryType::Address => self.resolve_address(query, parsed, options),
            QueryType::Block => self.resolve_block(query, parsed, options),
            QueryType::Intersection => self.resolve_intersection(query, parsed, options),
            QueryType::Account => {
                self.lookup(SearchType::Account, schema::ACCOUNT_NUM, part, options)
            }
            QueryType::RegistryParcel => self.lookup(
                SearchType::RegistryParcel,
                schema::REGISTRY_PARCEL_ID,
                part,
                options,
            ),
            QueryType::Unknown => Err(SearchError::BadRequest {
                input: query.to_string(),
                message: "query was not recognized as an address, intersection, block, or identifier"
                    .to_string(),
            }),
        }
    }

    fn resolve_address(
        &self,
        query: &str,
        parsed: &ParsedQuery,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        let spec = compile_address_filters(parsed);
        let policy = Self::address_policy(options);
        let mut matches =
            resolve_filters_inner(self.data.addresses()?.clone(), &spec, &policy)?;

        if matches.is_empty() {
            // No record of its own; fall back to the street segment.
            match cascade_to_segment_inner(self.data.segments()?.clone(), parsed)? {
                Some(synthesized) => {
                    info!(seg_id = parsed.seg_id, "address resolved via segment");
                    matches = synthesized;
                }
                None => {
                    return Err(SearchError::NotFound {
                        query: query.to_string(),
                        normalized: vec![parsed.output_address.clone()],
                    });
                }
            }
        }

        Self::respond(
            SearchType::Address,
            query,
            vec![parsed.output_address.clone()],
            matches,
            options,
        )
    }

    fn resolve_block(
        &self,
        query: &str,
        parsed: &ParsedQuery,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        let Some(spec) = compile_block_filters(parsed) else {
            return Err(SearchError::BadRequest {
                input: query.to_string(),
                message: "no valid block number provided".to_string(),
            });
        };
        // Block listings show base addresses only.
        let policy = ResolvePolicy {
            exclude_children: true,
            include_child_units: false,
            ..Self::address_policy(options)
        };
        let matches = resolve_filters_inner(self.data.addresses()?.clone(), &spec, &policy)?;
        Self::respond(
            SearchType::Block,
            query,
            vec![parsed.output_address.clone()],
            matches,
            options,
        )
    }

    fn resolve_intersection(
        &self,
        query: &str,
        parsed: &ParsedQuery,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        let key = IntersectionKey::normalize(
            parsed.street.street_code,
            parsed.street_2.street_code,
        );
        let matches = resolve_intersection_inner(self.data.intersections()?.clone(), key)?;
        Self::respond(
            SearchType::Intersection,
            query,
            vec![parsed.output_address.clone()],
            matches,
            options,
        )
    }

    fn lookup(
        &self,
        search_type: SearchType,
        column: &str,
        value: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SearchError::BadRequest {
                input: value.to_string(),
                message: format!("{search_type} lookup needs a non-empty identifier"),
            });
        }
        let matches = resolve_identifier_inner(self.data.addresses()?.clone(), column, value)?;
        Self::respond(
            search_type,
            value,
            vec![value.to_string()],
            matches,
            options,
        )
    }

    /// Strip surrounding slashes and whitespace, then enforce the
    /// length ceiling on the query as it will be resolved. Reaching
    /// the ceiling is a rejection, not just exceeding it.
    fn sanitize(raw_query: &str, options: &SearchOptions) -> Result<String> {
        let query = raw_query.trim_matches('/').trim().to_string();
        if query.len() + options.flag_name_len() >= QUERY_LENGTH_CEILING {
            return Err(SearchError::BadRequest {
                input: query,
                message: format!(
                    "query and option names reach the {QUERY_LENGTH_CEILING} character limit"
                ),
            });
        }
        Ok(query)
    }

    fn address_policy(options: &SearchOptions) -> ResolvePolicy {
        ResolvePolicy {
            include_child_units: options.include_units,
            exclude_children: false,
            identified_only: options.identified_only,
            parcel_geocode: options.parcel_geocode,
            street_geocode: options.street_geocode,
        }
    }

    /// Package a non-empty match set into a paged response. An empty
    /// set is surfaced as not-found before pagination runs.
    fn respond(
        search_type: SearchType,
        query: &str,
        normalized: Vec<String>,
        matches: MatchSet,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        if matches.is_empty() {
            return Err(SearchError::NotFound {
                query: query.to_string(),
                normalized,
            });
        }

        let page_num = match &options.page {
            Some(raw) => Paginator::validate_page_num(raw)?,
            None => 1,
        };
        let paginator = Paginator::new(matches);
        let page = paginator.get_page(page_num);

        Ok(SearchResponse {
            search_type,
            query: query.to_string(),
            normalized,
            srid: options.srid(),
            page,
        })
    }
}
