//! Search options supplied alongside a query.

/// Spatial reference used when no override is given. Positions in the
/// index are stored in this system.
pub const DEFAULT_SRID: u32 = 4326;

/// Per-request options for [`AddressSearcher`](crate::AddressSearcher).
///
/// Defaults reproduce the plain lookup: no unit expansion, all records
/// eligible, no geocode substitution, first page.
///
/// # Example
///
/// ```rust
/// use rowhouse::SearchOptions;
///
/// let options = SearchOptions::builder()
///     .include_units(true)
///     .parcel_geocode(true)
///     .page("2")
///     .build();
/// assert!(options.include_units);
/// assert_eq!(options.srid(), 4326);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Expand matches with their child-unit records.
    pub include_units: bool,
    /// Keep only records carrying an owner-assessment account.
    pub identified_only: bool,
    /// Fall back to the parcel centroid for records without a direct
    /// geocode.
    pub parcel_geocode: bool,
    /// Fall back to the street-segment midpoint when no other
    /// position is available.
    pub street_geocode: bool,
    /// Spatial reference for reported positions. `None` means
    /// [`DEFAULT_SRID`].
    pub srid: Option<u32>,
    /// Raw 1-based page argument. `None` means page 1. Kept raw so
    /// validation happens inside the search and bad values report as
    /// bad requests.
    pub page: Option<String>,
}

impl SearchOptions {
    #[must_use]
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }

    #[must_use]
    pub fn srid(&self) -> u32 {
        self.srid.unwrap_or(DEFAULT_SRID)
    }

    /// Combined length of the option names the caller supplied.
    /// Counts toward the query-length ceiling, mirroring how the
    /// wire protocol transmits each option as a named argument.
    pub(crate) fn flag_name_len(&self) -> usize {
        let mut len = 0;
        if self.include_units {
            len += "include_units".len();
        }
        if self.identified_only {
            len += "identified_only".len();
        }
        if self.parcel_geocode {
            len += "parcel_geocode".len();
        }
        if self.street_geocode {
            len += "street_geocode".len();
        }
        if self.srid.is_some() {
            len += "srid".len();
        }
        if self.page.is_some() {
            len += "page".len();
        }
        len
    }
}

/// Builder for [`SearchOptions`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptionsBuilder {
    options: SearchOptions,
}

impl SearchOptionsBuilder {
    #[must_use]
    pub fn include_units(mut self, include: bool) -> Self {
        self.options.include_units = include;
        self
    }

    #[must_use]
    pub fn identified_only(mut self, identified: bool) -> Self {
        self.options.identified_only = identified;
        self
    }

    #[must_use]
    pub fn parcel_geocode(mut self, parcel: bool) -> Self {
        self.options.parcel_geocode = parcel;
        self
    }

    #[must_use]
    pub fn street_geocode(mut self, street: bool) -> Self {
        self.options.street_geocode = street;
        self
    }

    #[must_use]
    pub fn srid(mut self, srid: u32) -> Self {
        self.options.srid = Some(srid);
        self
    }

    #[must_use]
    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.options.page = Some(page.into());
        self
    }

    #[must_use]
    pub fn build(self) -> SearchOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_plain_lookup() {
        let options = SearchOptions::default();
        assert!(!options.include_units);
        assert!(!options.identified_only);
        assert_eq!(options.srid(), DEFAULT_SRID);
        assert!(options.page.is_none());
        assert_eq!(options.flag_name_len(), 0);
    }

    #[test]
    fn flag_name_len_counts_supplied_options() {
        let options = SearchOptions::builder()
            .include_units(true)
            .page("2")
            .build();
        assert_eq!(
            options.flag_name_len(),
            "include_units".len() + "page".len()
        );
    }

    #[test]
    fn srid_override_applies() {
        let options = SearchOptions::builder().srid(2272).build();
        assert_eq!(options.srid(), 2272);
    }
}
