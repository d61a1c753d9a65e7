//! Pipeline orchestration: LAS/LAZ in, repaired tileset out.
use crate::crs::detect_crs;
use crate::engine::{Engine, EngineArgs};
use crate::error::{Result, TilerError};
use crate::laz::PointCloudFormat;
use crate::normalizer::ensure_engine_input;
use crate::repair::repair_output;
use crate::request::ConversionRequest;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Converts a LAS/LAZ point cloud to a 3D Tiles tileset and returns the root manifest path.
///
/// Input validation and engine lookup happen before the output directory is
/// touched. Manifest repair runs last and never fails the conversion.
pub fn convert(request: &ConversionRequest) -> Result<PathBuf> {
    let input_path = request.input_path();
    if !input_path.exists() {
        return Err(TilerError::InputNotFound {
            path: input_path.to_path_buf(),
        });
    }
    PointCloudFormat::from_path(input_path)?;

    let engine = Engine::resolve(request.engine())?;

    let output_dir = request.output_dir();
    prepare_output_dir(output_dir, request.overwrite())?;

    // The engine reads LAS more reliably than LAZ.
    let tiles_input = match ensure_engine_input(input_path) {
        Ok(path) => path,
        Err(e) => {
            warn!("{e}; using {} directly", input_path.display());
            input_path.to_path_buf()
        }
    };

    let has_crs = detect_crs(&tiles_input);
    if !has_crs && request.srs_out().is_some() {
        info!("No CRS metadata found, keeping original coordinates");
    }

    let manifest = engine.run(&EngineArgs {
        output_dir,
        input: &tiles_input,
        has_crs,
        srs_out: request.srs_out(),
        extra_fields: request.extra_fields(),
    })?;

    if !manifest.is_file() {
        return Err(TilerError::MissingOutput { expected: manifest });
    }

    repair_output(output_dir);

    Ok(manifest)
}

/// Creates the output directory, wiping any previous content when `overwrite` is set.
fn prepare_output_dir(output_dir: &Path, overwrite: bool) -> Result<()> {
    let create = |dir: &Path| {
        fs::create_dir_all(dir).map_err(|e| {
            TilerError::io(format!("failed to create output directory {}", dir.display()), e)
        })
    };

    create(output_dir)?;
    if overwrite {
        info!("Clearing output directory {}", output_dir.display());
        fs::remove_dir_all(output_dir).map_err(|e| {
            TilerError::io(format!("failed to clear {}", output_dir.display()), e)
        })?;
        create(output_dir)?;
    }
    Ok(())
}
