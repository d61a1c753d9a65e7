//! Coordinate reference system detection from LAS header records.
use crate::laz::create_reader;
use constants::coordinate_system::{USER_DEFINED_GEO_KEY_VALUE, WKT_CRS_KEYWORDS};
use las::Header;
use log::debug;
use std::path::Path;

/// Spatial reference description found in a LAS header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Crs {
    /// OGC WKT definition, NUL padding removed.
    Wkt(String),
    /// EPSG code taken from a GeoTIFF key directory.
    Epsg(u16),
}

/// True when the file carries a usable spatial reference.
/// Unreadable files and unparseable descriptions count as "no CRS".
pub fn detect_crs(path: &Path) -> bool {
    let reader = match create_reader(path) {
        Ok(reader) => reader,
        Err(e) => {
            debug!("Could not read header of {}: {e}", path.display());
            return false;
        }
    };

    match parse_crs(reader.header()) {
        Some(crs) => {
            debug!("Detected CRS in {}: {crs:?}", path.display());
            true
        }
        None => {
            debug!("No CRS metadata in {}", path.display());
            false
        }
    }
}

/// Extracts the coordinate reference system from header VLRs and EVLRs.
/// WKT takes precedence over GeoTIFF keys, matching the LAS 1.4 recommendation.
pub fn parse_crs(header: &Header) -> Option<Crs> {
    header
        .get_wkt_crs_bytes()
        .and_then(parse_wkt)
        .or_else(|| parse_geo_keys(header))
}

fn parse_wkt(data: &[u8]) -> Option<Crs> {
    let text = std::str::from_utf8(data).ok()?;
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());

    let keyword = text.split(['[', '(']).next()?.trim().to_ascii_uppercase();
    WKT_CRS_KEYWORDS
        .contains(&keyword.as_str())
        .then(|| Crs::Wkt(text.to_string()))
}

/// Projected key first, then geodetic. Omitted (0) and user-defined values carry no EPSG code.
fn parse_geo_keys(header: &Header) -> Option<Crs> {
    let geotiff = match header.get_geotiff_crs() {
        Ok(geotiff) => geotiff?,
        Err(e) => {
            debug!("Ignoring unreadable GeoTIFF keys: {e}");
            return None;
        }
    };

    let is_epsg = |value: &u16| *value != 0 && *value != USER_DEFINED_GEO_KEY_VALUE;
    geotiff
        .get_projected_crs_geo_key_value()
        .filter(is_epsg)
        .or_else(|| geotiff.get_geodetic_crs_geo_key_value().filter(is_epsg))
        .map(Crs::Epsg)
}
