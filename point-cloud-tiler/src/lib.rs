//! LAS/LAZ point cloud to Cesium 3D Tiles conversion.
//!
//! Wraps an external tiling engine: prepares its input, decides whether a
//! reprojection is safe, runs it, and repairs the URIs of the tileset manifests
//! it writes.
pub mod converter;
pub mod crs;
pub mod engine;
pub mod error;
pub mod laz;
pub mod manifest;
pub mod normalizer;
mod progress;
pub mod repair;
pub mod request;

pub use converter::convert;
pub use error::{Result, TilerError};
pub use request::ConversionRequest;
