/// Default output CRS: EPSG:4978, earth-centred earth-fixed (ECEF).
/// Cesium camera controls expect geocentric coordinates.
pub const DEFAULT_SRS_OUT: &str = "4978";

/// GeoTIFF marker for a user-defined (non EPSG) definition
pub const USER_DEFINED_GEO_KEY_VALUE: u16 = 32767;

/// Leading keywords of WKT1 and WKT2 coordinate reference system definitions
pub const WKT_CRS_KEYWORDS: &[&str] = &[
    "PROJCS",
    "GEOGCS",
    "GEOCCS",
    "COMPD_CS",
    "VERT_CS",
    "LOCAL_CS",
    "PROJCRS",
    "PROJECTEDCRS",
    "GEOGCRS",
    "GEOGRAPHICCRS",
    "GEODCRS",
    "GEODETICCRS",
    "BASEGEODCRS",
    "COMPOUNDCRS",
    "VERTCRS",
    "VERTICALCRS",
    "ENGCRS",
    "ENGINEERINGCRS",
];
