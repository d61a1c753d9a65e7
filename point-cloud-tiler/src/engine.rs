//! External tiling engine: executable lookup, command line and execution.
use crate::error::{Result, TilerError};
use crate::progress::engine_spinner;
use constants::engine::{
    ALWAYS_XY_FLAG, CONVERT_SUBCOMMAND, ENGINE_NAME, EXTRA_FIELDS_FLAG, OUT_FLAG, SRS_OUT_FLAG,
};
use constants::layout::{ENGINE_LOG, ROOT_MANIFEST};
use log::{debug, info};
use std::env;
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Resolved tiling engine executable.
#[derive(Debug, Clone)]
pub struct Engine {
    program: PathBuf,
}

impl Engine {
    /// Locates the engine executable.
    /// An explicit path wins, then a sibling of the running executable, then `PATH`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let program = match explicit {
            Some(path) => path.is_file().then(|| path.to_path_buf()),
            None => adjacent_to_current_exe().or_else(|| search_path(&executable_name())),
        };

        match program {
            Some(program) => {
                debug!("Using tiling engine {}", program.display());
                Ok(Self { program })
            }
            None => Err(TilerError::ToolNotFound {
                name: explicit
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| ENGINE_NAME.to_string()),
            }),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the engine to completion and returns the root manifest path.
    /// Stdout and stderr share one handle on `tiles_log.txt`, which is created before
    /// the process starts and therefore exists whatever the outcome.
    pub fn run(&self, args: &EngineArgs) -> Result<PathBuf> {
        let log_path = args.output_dir.join(ENGINE_LOG);
        let mut log = File::create(&log_path)
            .map_err(|e| TilerError::io(format!("failed to create {}", log_path.display()), e))?;
        let share = |log: &File| {
            log.try_clone()
                .map_err(|e| TilerError::io(format!("failed to share {}", log_path.display()), e))
        };
        let log_out = share(&log)?;
        let log_err = share(&log)?;

        let argv = args.to_args();
        info!(
            "Running {} {}",
            self.program.display(),
            argv.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let pb = engine_spinner(format!("Tiling {}", args.input.display()));
        let status = Command::new(&self.program)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log_out))
            .stderr(Stdio::from(log_err))
            .status();
        pb.finish_and_clear();

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                // Keep the reason next to the (empty) engine transcript.
                if let Err(log_error) =
                    writeln!(log, "failed to start {}: {e}", self.program.display())
                {
                    debug!(
                        "Could not record start failure in {}: {log_error}",
                        log_path.display()
                    );
                }
                return Err(TilerError::io(
                    format!("failed to start {}", self.program.display()),
                    e,
                ));
            }
        };

        if !status.success() {
            return Err(TilerError::EngineFailed {
                engine: ENGINE_NAME.to_string(),
                status: status.to_string(),
                log: log_path,
            });
        }

        let manifest = args.output_dir.join(ROOT_MANIFEST);
        if !manifest.is_file() {
            return Err(TilerError::MissingOutput { expected: manifest });
        }

        info!("Engine finished, transcript in {}", log_path.display());
        Ok(manifest)
    }
}

/// Engine invocation parameters.
#[derive(Debug, Clone)]
pub struct EngineArgs<'a> {
    pub output_dir: &'a Path,
    pub input: &'a Path,
    /// Whether the input carries spatial reference metadata.
    pub has_crs: bool,
    /// Requested output CRS; `None` or empty keeps the source coordinates.
    pub srs_out: Option<&'a str>,
    pub extra_fields: &'a [String],
}

impl EngineArgs<'_> {
    /// CRS to reproject into, if reprojection is safe.
    /// Without source metadata the coordinates are kept as they are, assumed local.
    pub fn transform_target(&self) -> Option<&str> {
        self.srs_out.filter(|srs| self.has_crs && !srs.is_empty())
    }

    /// Builds the argument vector, input path last.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut argv: Vec<OsString> = vec![
            CONVERT_SUBCOMMAND.into(),
            OUT_FLAG.into(),
            self.output_dir.into(),
        ];

        if let Some(srs) = self.transform_target() {
            argv.push(SRS_OUT_FLAG.into());
            argv.push(srs.into());
            argv.push(ALWAYS_XY_FLAG.into());
        }

        let fields: Vec<&str> = self
            .extra_fields
            .iter()
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .collect();
        if !fields.is_empty() {
            argv.push(EXTRA_FIELDS_FLAG.into());
            argv.push(fields.join(",").into());
        }

        argv.push(self.input.into());
        argv
    }
}

fn executable_name() -> String {
    format!("{ENGINE_NAME}{}", env::consts::EXE_SUFFIX)
}

fn adjacent_to_current_exe() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let candidate = exe.parent()?.join(executable_name());
    candidate.is_file().then_some(candidate)
}

fn search_path(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
