/// Root tileset manifest written by the tiling engine at the output root
pub const ROOT_MANIFEST: &str = "tileset.json";

/// Subdirectory holding binary tile payloads and auxiliary manifests
pub const POINTS_DIR: &str = "points";

/// URI prefix used by references that target the points subdirectory
pub const POINTS_PREFIX: &str = "points/";

/// Combined stdout/stderr transcript of the engine run
pub const ENGINE_LOG: &str = "tiles_log.txt";

/// Auxiliary manifest filename parts: `tileset.<N>.json`
pub const MANIFEST_STEM: &str = "tileset.";
pub const MANIFEST_EXTENSION: &str = ".json";
