//! In-memory fixture dataset for tests.
//!
//! A small but structurally complete index: bare addresses, unit children,
//! a ranged record with a range member, a fractional and a suffixed address,
//! multiple owners, duplicate intersection rows for the same street pair and
//! a street segment with no address records (exercises the cascade path).

use polars::prelude::*;

use crate::{AddressIndexData, error::Result};

/// One address record of the fixture frame. Only the fields a given test row
/// cares about need to be set; the rest default to absent.
#[derive(Debug, Clone, Default)]
pub struct AddressFixture {
    pub street_address: String,
    pub address_low: Option<i64>,
    pub address_low_suffix: Option<String>,
    pub address_low_frac: Option<String>,
    pub address_high: Option<i64>,
    pub street_predir: Option<String>,
    pub street_name: String,
    pub street_suffix: Option<String>,
    pub street_postdir: Option<String>,
    pub street_code: i64,
    pub seg_id: i64,
    pub unit_type: Option<String>,
    pub unit_num: String,
    pub parent_address: Option<String>,
    pub zip_code: Option<String>,
    pub ward: Option<String>,
    pub account_num: Option<String>,
    pub utility_parcel_id: Option<String>,
    pub registry_parcel_id: Option<String>,
    pub address_key: Option<String>,
    pub owners: Option<String>,
    pub geocode_x: Option<f64>,
    pub geocode_y: Option<f64>,
    pub parcel_x: Option<f64>,
    pub parcel_y: Option<f64>,
    pub street_x: Option<f64>,
    pub street_y: Option<f64>,
}

impl AddressFixture {
    fn new(
        street_address: &str,
        address_low: i64,
        street_name: &str,
        street_code: i64,
        seg_id: i64,
    ) -> Self {
        Self {
            street_address: street_address.to_string(),
            address_low: Some(address_low),
            street_name: street_name.to_string(),
            street_suffix: Some("ST".to_string()),
            street_code,
            seg_id,
            account_num: Some(format!("A{street_code}{address_low}")),
            address_key: Some(format!("K{street_code}{address_low}")),
            geocode_x: Some(-75.16),
            geocode_y: Some(39.95),
            ..Self::default()
        }
    }

    fn predir(mut self, predir: &str) -> Self {
        self.street_predir = Some(predir.to_string());
        self
    }

    fn unit(mut self, unit_type: &str, unit_num: &str, parent: &str) -> Self {
        self.unit_type = Some(unit_type.to_string());
        self.unit_num = unit_num.to_string();
        self.parent_address = Some(parent.to_string());
        self
    }

    fn owners(mut self, owners: &str) -> Self {
        self.owners = Some(owners.to_string());
        self
    }
}

/// The fixture address rows. Kept in one place so tests can reason about
/// exact cardinalities.
#[must_use]
pub fn sample_address_rows() -> Vec<AddressFixture> {
    let mut rows = Vec::new();

    // 400 block of N BROAD ST, with two unit children under 440.
    let mut broad = AddressFixture::new("440 N BROAD ST", 440, "BROAD", 2710, 440001).predir("N");
    broad.zip_code = Some("19130".to_string());
    broad.ward = Some("15".to_string());
    broad.utility_parcel_id = Some("101".to_string());
    broad.registry_parcel_id = Some("005N070144".to_string());
    broad.owners = Some("CITY SCHOOL DISTRICT".to_string());
    rows.push(broad);
    rows.push(
        AddressFixture::new("440 N BROAD ST UNIT 510", 440, "BROAD", 2710, 440001)
            .predir("N")
            .unit("UNIT", "510", "440 N BROAD ST"),
    );
    rows.push(
        AddressFixture::new("440 N BROAD ST UNIT 520", 440, "BROAD", 2710, 440001)
            .predir("N")
            .unit("UNIT", "520", "440 N BROAD ST"),
    );

    // No assessment account and no direct position; carries both fallback
    // positions for the geocode-substitution tests.
    let mut unidentified =
        AddressFixture::new("442 N BROAD ST", 442, "BROAD", 2710, 440001).predir("N");
    unidentified.account_num = None;
    unidentified.geocode_x = None;
    unidentified.geocode_y = None;
    unidentified.parcel_x = Some(-75.158);
    unidentified.parcel_y = Some(39.961);
    unidentified.street_x = Some(-75.159);
    unidentified.street_y = Some(39.962);
    rows.push(unidentified);

    // South side of the same street, one suite child.
    rows.push(AddressFixture::new("100 S BROAD ST", 100, "BROAD", 2710, 100001).predir("S"));
    rows.push(
        AddressFixture::new("100 S BROAD ST STE 200", 100, "BROAD", 2710, 100001)
            .predir("S")
            .unit("STE", "200", "100 S BROAD ST"),
    );

    // MARKET ST: a ranged record, its single-address member, a bare address
    // and a fractional sibling, plus a low-suffix record on another block.
    let mut range = AddressFixture::new("1230-34 MARKET ST", 1230, "MARKET", 53560, 123001);
    range.address_high = Some(1234);
    rows.push(range);
    let mut member = AddressFixture::new("1232 MARKET ST", 1232, "MARKET", 53560, 123001);
    member.parent_address = Some("1230-34 MARKET ST".to_string());
    rows.push(member);
    rows.push(
        AddressFixture::new("1234 MARKET ST", 1234, "MARKET", 53560, 123001)
            .owners("COMMONWEALTH REALTY TRUST"),
    );
    let mut frac = AddressFixture::new("1234 1/2 MARKET ST", 1234, "MARKET", 53560, 123001);
    frac.address_low_frac = Some("1/2".to_string());
    rows.push(frac);
    let mut suffixed = AddressFixture::new("12A MARKET ST", 12, "MARKET", 53560, 12001);
    suffixed.address_low_suffix = Some("A".to_string());
    rows.push(suffixed);

    // JUNIPER ST owners for token-match tests.
    rows.push(
        AddressFixture::new("200 S JUNIPER ST", 200, "JUNIPER", 48140, 200001)
            .predir("S")
            .owners("SMITH JOHN"),
    );
    rows.push(
        AddressFixture::new("204 S JUNIPER ST", 204, "JUNIPER", 48140, 200001)
            .predir("S")
            .owners("SMITH JANE & SMITH JOHN"),
    );

    rows.push(
        AddressFixture::new("1500 CHESTNUT ST", 1500, "CHESTNUT", 21740, 150001)
            .owners("COMMONWEALTH REALTY TRUST"),
    );

    rows
}

/// Fixture address frame.
pub fn sample_addresses() -> Result<DataFrame> {
    address_frame(&sample_address_rows())
}

/// Build an address frame from fixture rows.
pub fn address_frame(rows: &[AddressFixture]) -> Result<DataFrame> {
    let df = df!(
        "street_address" => rows.iter().map(|r| r.street_address.clone()).collect::<Vec<_>>(),
        "address_low" => rows.iter().map(|r| r.address_low).collect::<Vec<_>>(),
        "address_low_suffix" => rows.iter().map(|r| r.address_low_suffix.clone()).collect::<Vec<_>>(),
        "address_low_frac" => rows.iter().map(|r| r.address_low_frac.clone()).collect::<Vec<_>>(),
        "address_high" => rows.iter().map(|r| r.address_high).collect::<Vec<_>>(),
        "street_predir" => rows.iter().map(|r| r.street_predir.clone()).collect::<Vec<_>>(),
        "street_name" => rows.iter().map(|r| r.street_name.clone()).collect::<Vec<_>>(),
        "street_suffix" => rows.iter().map(|r| r.street_suffix.clone()).collect::<Vec<_>>(),
        "street_postdir" => rows.iter().map(|r| r.street_postdir.clone()).collect::<Vec<_>>(),
        "street_code" => rows.iter().map(|r| r.street_code).collect::<Vec<_>>(),
        "seg_id" => rows.iter().map(|r| r.seg_id).collect::<Vec<_>>(),
        "unit_type" => rows.iter().map(|r| r.unit_type.clone()).collect::<Vec<_>>(),
        "unit_num" => rows.iter().map(|r| r.unit_num.clone()).collect::<Vec<_>>(),
        "parent_address" => rows.iter().map(|r| r.parent_address.clone()).collect::<Vec<_>>(),
        "zip_code" => rows.iter().map(|r| r.zip_code.clone()).collect::<Vec<_>>(),
        "ward" => rows.iter().map(|r| r.ward.clone()).collect::<Vec<_>>(),
        "account_num" => rows.iter().map(|r| r.account_num.clone()).collect::<Vec<_>>(),
        "utility_parcel_id" => rows.iter().map(|r| r.utility_parcel_id.clone()).collect::<Vec<_>>(),
        "registry_parcel_id" => rows.iter().map(|r| r.registry_parcel_id.clone()).collect::<Vec<_>>(),
        "address_key" => rows.iter().map(|r| r.address_key.clone()).collect::<Vec<_>>(),
        "owners" => rows.iter().map(|r| r.owners.clone()).collect::<Vec<_>>(),
        "geocode_x" => rows.iter().map(|r| r.geocode_x).collect::<Vec<_>>(),
        "geocode_y" => rows.iter().map(|r| r.geocode_y).collect::<Vec<_>>(),
        "parcel_x" => rows.iter().map(|r| r.parcel_x).collect::<Vec<_>>(),
        "parcel_y" => rows.iter().map(|r| r.parcel_y).collect::<Vec<_>>(),
        "street_x" => rows.iter().map(|r| r.street_x).collect::<Vec<_>>(),
        "street_y" => rows.iter().map(|r| r.street_y).collect::<Vec<_>>(),
    )?;
    Ok(df)
}

/// Fixture segment frame. Segment 770001 (700 block of PINE ST) deliberately
/// has no address records.
pub fn sample_segments() -> Result<DataFrame> {
    let df = df!(
        "seg_id" => [440001i64, 100001, 123001, 12001, 200001, 150001, 770001],
        "street_code" => [2710i64, 2710, 53560, 53560, 48140, 21740, 67150],
        "street_name" => ["BROAD", "BROAD", "MARKET", "MARKET", "JUNIPER", "CHESTNUT", "PINE"],
        "street_predir" => [Some("N"), Some("S"), None, None, Some("S"), None, None],
        "street_suffix" => [Some("ST"), Some("ST"), Some("ST"), Some("ST"), Some("ST"), Some("ST"), Some("ST")],
        "street_postdir" => [None::<&str>, None, None, None, None, None, None],
        "low_num" => [400i64, 100, 1200, 0, 200, 1500, 700],
        "high_num" => [498i64, 198, 1298, 98, 298, 1598, 798],
        "geocode_x" => [-75.160f64, -75.164, -75.160, -75.143, -75.163, -75.166, -75.150],
        "geocode_y" => [39.960f64, 39.948, 39.952, 39.950, 39.948, 39.950, 39.944],
    )?;
    Ok(df)
}

/// Fixture intersection frame. The BROAD & MARKET pair appears twice with
/// different segment ids so canonical-record selection is exercised.
pub fn sample_intersections() -> Result<DataFrame> {
    let df = df!(
        "int_id" => [1i64, 2, 3, 4],
        "seg_id" => [550001i64, 550000, 560000, 570000],
        "street_1_code" => [2710i64, 2710, 2710, 21740],
        "street_1_name" => ["BROAD", "BROAD", "BROAD", "CHESTNUT"],
        "street_1_full" => ["N BROAD ST", "S BROAD ST", "S BROAD ST", "CHESTNUT ST"],
        "street_2_code" => [53560i64, 53560, 21740, 48140],
        "street_2_name" => ["MARKET", "MARKET", "CHESTNUT", "JUNIPER"],
        "street_2_full" => ["MARKET ST", "MARKET ST", "CHESTNUT ST", "S JUNIPER ST"],
        "geocode_x" => [-75.1635f64, -75.1636, -75.1640, -75.1628],
        "geocode_y" => [39.9530f64, 39.9528, 39.9508, 39.9502],
    )?;
    Ok(df)
}

/// A complete fixture index.
pub fn sample_index() -> Result<AddressIndexData> {
    AddressIndexData::from_frames(
        sample_addresses()?,
        sample_segments()?,
        sample_intersections()?,
    )
}
