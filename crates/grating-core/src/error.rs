use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::PipelineStage;

#[derive(Error, Debug)]
pub enum GratingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty frame list")]
    EmptyFrameList,

    #[error("Cannot decode frame {}: {reason}", path.display())]
    UndecodableFrame { path: PathBuf, reason: String },

    #[error("Unsupported frame file type: {}", .0.display())]
    UnsupportedFrameType(PathBuf),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Print width must be positive, got {0} cm")]
    InvalidPrintWidth(f64),

    #[error("Computed output size {width}x{height} is smaller than one pixel")]
    OutputTooSmall { width: u32, height: u32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Row length mismatch: expected {expected} bytes, got {actual}")]
    RowLengthMismatch { expected: usize, actual: usize },

    #[error("Cannot allocate {bytes} bytes for the output image")]
    Allocation { bytes: usize },

    #[error("Failed to encode output {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    #[error("A composite run is already in progress")]
    PipelineBusy,

    #[error("{stage} failed: {source}")]
    Pipeline {
        stage: PipelineStage,
        #[source]
        source: Box<GratingError>,
    },
}

/// Coarse classification used by callers to decide how to report an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad frames: empty list, undecodable or zero-area images.
    Input,
    /// Bad numbers: widths, band widths, LPIs, computed sizes.
    Parameter,
    /// Allocation, disk or encoder failures.
    Resource,
}

impl GratingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyFrameList
            | Self::UndecodableFrame { .. }
            | Self::UnsupportedFrameType(_)
            | Self::InvalidDimensions { .. }
            | Self::FrameIndexOutOfRange { .. } => ErrorKind::Input,
            Self::InvalidPrintWidth(_)
            | Self::OutputTooSmall { .. }
            | Self::InvalidParameter(_)
            | Self::RowLengthMismatch { .. } => ErrorKind::Parameter,
            Self::Io(_)
            | Self::Allocation { .. }
            | Self::Encode { .. }
            | Self::PipelineBusy => ErrorKind::Resource,
            Self::Pipeline { source, .. } => source.kind(),
        }
    }

    pub(crate) fn in_stage(self, stage: PipelineStage) -> Self {
        match self {
            already @ Self::Pipeline { .. } => already,
            other => Self::Pipeline {
                stage,
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, GratingError>;
