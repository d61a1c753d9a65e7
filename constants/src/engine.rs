/// Executable name of the external tiling engine
pub const ENGINE_NAME: &str = "py3dtiles";

/// Engine subcommand performing the conversion
pub const CONVERT_SUBCOMMAND: &str = "convert";

pub const OUT_FLAG: &str = "--out";
pub const SRS_OUT_FLAG: &str = "--srs_out";
pub const EXTRA_FIELDS_FLAG: &str = "--extra-fields";

/// Forces East,North (X,Y) axis order when the engine reprojects
pub const ALWAYS_XY_FLAG: &str = "--pyproj-always-xy";
