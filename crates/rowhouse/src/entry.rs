//! Typed views over matched records.
//!
//! Pages hand back dataframes; these entry types pull the columns out
//! into plain structs for callers that want owned values rather than
//! dataframe access.

use std::fmt;

use polars::prelude::*;

use crate::resolve::Result;
use rowhouse_index::schema;

/// One matched address record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressEntry {
    /// Canonical address string, unique per record.
    pub street_address: String,
    pub address_low: Option<i64>,
    pub address_low_suffix: Option<String>,
    pub address_low_frac: Option<String>,
    pub address_high: Option<i64>,
    pub street_predir: Option<String>,
    pub street_name: Option<String>,
    pub street_suffix: Option<String>,
    pub street_postdir: Option<String>,
    pub street_code: Option<i64>,
    pub seg_id: Option<i64>,
    pub unit_type: Option<String>,
    /// Empty string when the record has no unit.
    pub unit_num: String,
    pub parent_address: Option<String>,
    pub zip_code: Option<String>,
    pub ward: Option<String>,
    /// Owner-assessment account. Null on synthesized segment matches.
    pub account_num: Option<String>,
    pub utility_parcel_id: Option<String>,
    pub registry_parcel_id: Option<String>,
    pub address_key: Option<String>,
    pub owners: Option<String>,
    pub geocode_x: Option<f64>,
    pub geocode_y: Option<f64>,
}

impl AddressEntry {
    /// Pull every row of an address-shaped frame into entries.
    pub fn from_dataframe(df: &DataFrame) -> Result<Vec<Self>> {
        let street_address = df.column(schema::STREET_ADDRESS)?.str()?;
        let address_low = df.column(schema::ADDRESS_LOW)?.i64()?;
        let address_low_suffix = df.column(schema::ADDRESS_LOW_SUFFIX)?.str()?;
        let address_low_frac = df.column(schema::ADDRESS_LOW_FRAC)?.str()?;
        let address_high = df.column(schema::ADDRESS_HIGH)?.i64()?;
        let street_predir = df.column(schema::STREET_PREDIR)?.str()?;
        let street_name = df.column(schema::STREET_NAME)?.str()?;
        let street_suffix = df.column(schema::STREET_SUFFIX)?.str()?;
        let street_postdir = df.column(schema::STREET_POSTDIR)?.str()?;
        let street_code = df.column(schema::STREET_CODE)?.i64()?;
        let seg_id = df.column(schema::SEG_ID)?.i64()?;
        let unit_type = df.column(schema::UNIT_TYPE)?.str()?;
        let unit_num = df.column(schema::UNIT_NUM)?.str()?;
        let parent_address = df.column(schema::PARENT_ADDRESS)?.str()?;
        let zip_code = df.column(schema::ZIP_CODE)?.str()?;
        let ward = df.column(schema::WARD)?.str()?;
        let account_num = df.column(schema::ACCOUNT_NUM)?.str()?;
        let utility_parcel_id = df.column(schema::UTILITY_PARCEL_ID)?.str()?;
        let registry_parcel_id = df.column(schema::REGISTRY_PARCEL_ID)?.str()?;
        let address_key = df.column(schema::ADDRESS_KEY)?.str()?;
        let owners = df.column(schema::OWNERS)?.str()?;
        let geocode_x = df.column(schema::GEOCODE_X)?.f64()?;
        let geocode_y = df.column(schema::GEOCODE_Y)?.f64()?;

        let owned = |s: Option<&str>| s.map(ToString::to_string);

        Ok((0..df.height())
            .map(|i| Self {
                street_address: street_address.get(i).unwrap_or_default().to_string(),
                address_low: address_low.get(i),
                address_low_suffix: owned(address_low_suffix.get(i)),
                address_low_frac: owned(address_low_frac.get(i)),
                address_high: address_high.get(i),
                street_predir: owned(street_predir.get(i)),
                street_name: owned(street_name.get(i)),
                street_suffix: owned(street_suffix.get(i)),
                street_postdir: owned(street_postdir.get(i)),
                street_code: street_code.get(i),
                seg_id: seg_id.get(i),
                unit_type: owned(unit_type.get(i)),
                unit_num: unit_num.get(i).unwrap_or_default().to_string(),
                parent_address: owned(parent_address.get(i)),
                zip_code: owned(zip_code.get(i)),
                ward: owned(ward.get(i)),
                account_num: owned(account_num.get(i)),
                utility_parcel_id: owned(utility_parcel_id.get(i)),
                registry_parcel_id: owned(registry_parcel_id.get(i)),
                address_key: owned(address_key.get(i)),
                owners: owned(owners.get(i)),
                geocode_x: geocode_x.get(i),
                geocode_y: geocode_y.get(i),
            })
            .collect())
    }

    /// The record belongs to another record (a unit or range member).
    #[must_use]
    pub fn is_child(&self) -> bool {
        self.parent_address.is_some()
    }

    /// The record carries no property identifiers, i.e. it was
    /// synthesized from a street segment.
    #[must_use]
    pub fn is_unidentified(&self) -> bool {
        self.account_num.is_none()
            && self.utility_parcel_id.is_none()
            && self.registry_parcel_id.is_none()
            && self.address_key.is_none()
    }
}

impl fmt::Display for AddressEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.street_address)?;
        if let Some(zip) = &self.zip_code {
            write!(f, ", {zip}")?;
        }
        Ok(())
    }
}

/// One matched intersection record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionEntry {
    pub int_id: i64,
    pub seg_id: Option<i64>,
    pub street_1_code: Option<i64>,
    pub street_1_name: Option<String>,
    pub street_1_full: Option<String>,
    pub street_2_code: Option<i64>,
    pub street_2_name: Option<String>,
    pub street_2_full: Option<String>,
    pub geocode_x: Option<f64>,
    pub geocode_y: Option<f64>,
}

impl IntersectionEntry {
    pub fn from_dataframe(df: &DataFrame) -> Result<Vec<Self>> {
        let int_id = df.column(schema::INT_ID)?.i64()?;
        let seg_id = df.column(schema::SEG_ID)?.i64()?;
        let street_1_code = df.column(schema::STREET_1_CODE)?.i64()?;
        let street_1_name = df.column(schema::STREET_1_NAME)?.str()?;
        let street_1_full = df.column(schema::STREET_1_FULL)?.str()?;
        let street_2_code = df.column(schema::STREET_2_CODE)?.i64()?;
        let street_2_name = df.column(schema::STREET_2_NAME)?.str()?;
        let street_2_full = df.column(schema::STREET_2_FULL)?.str()?;
        let geocode_x = df.column(schema::GEOCODE_X)?.f64()?;
        let geocode_y = df.column(schema::GEOCODE_Y)?.f64()?;

        let owned = |s: Option<&str>| s.map(ToString::to_string);

        Ok((0..df.height())
            .map(|i| Self {
                int_id: int_id.get(i).unwrap_or_default(),
                seg_id: seg_id.get(i),
                street_1_code: street_1_code.get(i),
                street_1_name: owned(street_1_name.get(i)),
                street_1_full: owned(street_1_full.get(i)),
                street_2_code: street_2_code.get(i),
                street_2_name: owned(street_2_name.get(i)),
                street_2_full: owned(street_2_full.get(i)),
                geocode_x: geocode_x.get(i),
                geocode_y: geocode_y.get(i),
            })
            .collect())
    }
}

impl fmt::Display for IntersectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} & {}",
            self.street_1_full.as_deref().unwrap_or("?"),
            self.street_2_full.as_deref().unwrap_or("?"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowhouse_index::test_data;

    #[test]
    fn address_entries_round_out_of_the_frame() {
        let df = test_data::sample_addresses().unwrap();
        let entries = AddressEntry::from_dataframe(&df).unwrap();
        assert_eq!(entries.len(), df.height());

        let broad = entries
            .iter()
            .find(|e| e.street_address == "440 N BROAD ST")
            .unwrap();
        assert_eq!(broad.street_predir.as_deref(), Some("N"));
        assert_eq!(broad.unit_num, "");
        assert!(!broad.is_child());
        assert!(!broad.is_unidentified());
        assert_eq!(broad.to_string(), "440 N BROAD ST, 19130");

        let unit = entries
            .iter()
            .find(|e| e.street_address == "440 N BROAD ST UNIT 510")
            .unwrap();
        assert_eq!(unit.unit_num, "510");
        assert!(unit.is_child());
    }

    #[test]
    fn intersection_entries_round_out_of_the_frame() {
        let df = test_data::sample_intersections().unwrap();
        let entries = IntersectionEntry::from_dataframe(&df).unwrap();
        assert_eq!(entries.len(), df.height());
        assert_eq!(entries[0].to_string(), "N BROAD ST & MARKET ST");
    }
}
