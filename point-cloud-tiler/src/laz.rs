//! LAS/LAZ file access shared by the normalizer and the CRS detector.
use crate::error::{Result, TilerError};
use las::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Point cloud container formats accepted as pipeline input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCloudFormat {
    /// Uncompressed interchange format, consumed directly by the engine.
    Las,
    /// LASzip-compressed container.
    Laz,
}

impl PointCloudFormat {
    /// Classifies a file by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "las" => Ok(Self::Las),
            "laz" => Ok(Self::Laz),
            _ => Err(TilerError::InputFormat {
                path: path.to_path_buf(),
                extension: format!(".{extension}"),
            }),
        }
    }
}

/// Create LAS file reader for point cloud access.
/// Handles both .las and .laz compressed formats; only the header is parsed up front.
pub fn create_reader(file_path: &Path) -> las::Result<Reader> {
    let file = File::open(file_path)?;
    let buf_reader = BufReader::new(file);
    Reader::new(buf_reader)
}
