//! Conversion parameters driving the pipeline.
use constants::coordinate_system::DEFAULT_SRS_OUT;
use std::fmt;
use std::path::{Path, PathBuf};

/// Parameters for one LAS/LAZ to 3D Tiles conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    input_path: PathBuf,
    output_dir: PathBuf,
    extra_fields: Vec<String>,
    srs_out: Option<String>,
    overwrite: bool,
    engine: Option<PathBuf>,
}

impl ConversionRequest {
    /// Request with defaults: no extra fields, ECEF output CRS, no overwrite.
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            extra_fields: Vec::new(),
            srs_out: Some(DEFAULT_SRS_OUT.to_string()),
            overwrite: false,
            engine: None,
        }
    }

    /// Extra point attributes to carry into the tiles.
    pub fn with_extra_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Target CRS identifier. `None` or an empty string keeps source coordinates.
    pub fn with_srs_out(mut self, srs_out: Option<impl Into<String>>) -> Self {
        self.srs_out = srs_out.map(Into::into).filter(|srs: &String| !srs.is_empty());
        self
    }

    /// Clears the output directory before converting.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Pins the engine executable instead of searching for it.
    pub fn with_engine(mut self, engine: Option<PathBuf>) -> Self {
        self.engine = engine;
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn extra_fields(&self) -> &[String] {
        &self.extra_fields
    }

    pub fn srs_out(&self) -> Option<&str> {
        self.srs_out.as_deref()
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn engine(&self) -> Option<&Path> {
        self.engine.as_deref()
    }
}

impl fmt::Display for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input={}, output_dir={}, extra_fields={:?}, srs_out={:?}, overwrite={}",
            self.input_path.display(),
            self.output_dir.display(),
            self.extra_fields,
            self.srs_out,
            self.overwrite
        )
    }
}
