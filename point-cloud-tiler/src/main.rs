//! Point cloud to 3D Tiles converter entry point
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::{error, info};
use point_cloud_tiler::{ConversionRequest, convert};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert LAS/LAZ point clouds to Cesium 3D Tiles format
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input LAS or LAZ point cloud file
    #[arg(long = "input", alias = "dataset-path", value_name = "PATH")]
    input_path: PathBuf,

    /// Output directory for 3D tiles
    #[arg(long, value_name = "PATH")]
    output_dir: PathBuf,

    /// Comma-separated list of extra fields to include (e.g. 'PredInstance' for segmentation)
    #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
    extra_fields: Vec<String>,

    /// Output CRS EPSG code (4978 is ECEF). Set to an empty string to preserve the original CRS
    #[arg(long, value_name = "CODE", default_value = constants::coordinate_system::DEFAULT_SRS_OUT)]
    srs_out: String,

    /// Overwrite existing output directory if it exists
    #[arg(long)]
    overwrite: bool,

    /// Tiling engine executable, instead of searching next to this binary and in PATH
    #[arg(long, value_name = "PATH")]
    engine: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

impl Cli {
    fn request(&self) -> ConversionRequest {
        ConversionRequest::new(&self.input_path, &self.output_dir)
            .with_extra_fields(self.extra_fields.iter().cloned())
            .with_srs_out(Some(self.srs_out.clone()))
            .with_overwrite(self.overwrite)
            .with_engine(self.engine.clone())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    let request = cli.request();
    info!("Starting conversion with parameters: {request}");

    match convert(&request) {
        Ok(tileset) => {
            info!("Conversion completed successfully!");
            info!("Tileset written to: {}", tileset.display());
            info!("Output directory: {}", request.output_dir().display());
            info!(
                "Generated {} files in output directory",
                count_entries(request.output_dir())
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Conversion failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Recursive count of files and directories below `dir`.
fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| {
                    let path = entry.path();
                    if path.is_dir() {
                        1 + count_entries(&path)
                    } else {
                        1
                    }
                })
                .sum()
        })
        .unwrap_or(0)
}
