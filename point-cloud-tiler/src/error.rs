//! Error types for the conversion pipeline.
use std::path::PathBuf;

/// Fatal and recoverable failures raised by the pipeline stages.
/// Manifest repair never produces one of these, it reports diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum TilerError {
    /// The tiling engine could not be located next to this executable or on `PATH`.
    #[error("tiling engine {name} not found (checked next to the current executable and PATH)")]
    ToolNotFound { name: String },

    /// The engine exited with a nonzero status.
    #[error("tiles conversion ({engine}) failed with {status}; see {}", .log.display())]
    EngineFailed {
        engine: String,
        status: String,
        log: PathBuf,
    },

    /// The engine reported success but wrote no root manifest.
    #[error("tiles conversion did not produce {}", .expected.display())]
    MissingOutput { expected: PathBuf },

    /// The input is not a LAS or LAZ file.
    #[error("input file must be LAS or LAZ format, got {extension:?}: {}", .path.display())]
    InputFormat { path: PathBuf, extension: String },

    #[error("input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// LAZ to LAS decompression failed. Recoverable: the orchestrator falls back to the LAZ file.
    #[error("failed to uncompress {} to LAS: {source}", .path.display())]
    Decompression {
        path: PathBuf,
        #[source]
        source: las::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl TilerError {
    /// Wraps an I/O error with a short description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TilerError>;
