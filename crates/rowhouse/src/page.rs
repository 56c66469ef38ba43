//! Pagination over a resolved [`MatchSet`].
//!
//! Pagination is a pure window over the canonically ordered set: it
//! never reorders or re-filters, so walking the pages of a set yields
//! every record exactly once.

use polars::prelude::DataFrame;

use crate::entry::{AddressEntry, IntersectionEntry};
use crate::resolve::{MatchKind, MatchSet, Result, SearchError};

/// Records per page when the caller does not say otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Pages over a match set.
#[derive(Debug)]
pub struct Paginator {
    matches: MatchSet,
    page_size: usize,
}

impl Paginator {
    #[must_use]
    pub fn new(matches: MatchSet) -> Self {
        Self::with_page_size(matches, DEFAULT_PAGE_SIZE)
    }

    /// A zero page size is clamped to one.
    #[must_use]
    pub fn with_page_size(matches: MatchSet, page_size: usize) -> Self {
        Self {
            matches,
            page_size: page_size.max(1),
        }
    }

    /// Validate a raw page-number argument. Page numbers are 1-based;
    /// anything non-numeric, zero, or negative is a bad request.
    ///
    /// ```rust
    /// use rowhouse::page::Paginator;
    ///
    /// assert_eq!(Paginator::validate_page_num("3").unwrap(), 3);
    /// assert!(Paginator::validate_page_num("0").is_err());
    /// assert!(Paginator::validate_page_num("-1").is_err());
    /// assert!(Paginator::validate_page_num("abc").is_err());
    /// ```
    pub fn validate_page_num(raw: &str) -> Result<usize> {
        match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(SearchError::BadRequest {
                input: raw.to_string(),
                message: "page must be a positive integer".to_string(),
            }),
        }
    }

    /// Total records across all pages.
    #[must_use]
    pub fn collection_size(&self) -> usize {
        self.matches.total()
    }

    /// Number of pages holding at least one record. Zero for an empty
    /// set; page 1 of an empty set is still a valid (empty) page.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.collection_size().div_ceil(self.page_size)
    }

    /// The given 1-based page. A page past the end is an empty page
    /// with accurate metadata, never an error; so is page 0, which no
    /// 1-based numbering reaches.
    #[must_use]
    pub fn get_page(&self, page_num: usize) -> Page {
        let records = if page_num == 0 {
            self.matches.slice(0, 0)
        } else {
            let offset = (page_num - 1) * self.page_size;
            self.matches.slice(offset as i64, self.page_size)
        };
        Page {
            kind: self.matches.kind(),
            records,
            page_num,
            page_size: self.page_size,
            total_items: self.collection_size(),
            total_pages: self.total_pages(),
        }
    }
}

/// One page of matched records plus collection metadata.
#[derive(Debug, Clone)]
pub struct Page {
    kind: MatchKind,
    records: DataFrame,
    pub page_num: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl Page {
    /// Records on this page, still in canonical order.
    #[must_use]
    pub fn records(&self) -> &DataFrame {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.height()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.height() == 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page_num < self.total_pages
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page_num > 1
    }

    /// Extract this page as typed address entries.
    pub fn addresses(&self) -> Result<Vec<AddressEntry>> {
        if self.kind != MatchKind::Address {
            return Err(anyhow::anyhow!("page does not hold address records").into());
        }
        AddressEntry::from_dataframe(&self.records)
    }

    /// Extract this page as typed intersection entries.
    pub fn intersections(&self) -> Result<Vec<IntersectionEntry>> {
        if self.kind != MatchKind::Intersection {
            return Err(anyhow::anyhow!("page does not hold intersection records").into());
        }
        IntersectionEntry::from_dataframe(&self.records)
    }
}
