use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning a video file into a frame sequence.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: ffmpeg_next::Error,
    },
    #[error("no video stream found")]
    NoVideoStream,
    #[error("decode failed: {0}")]
    Decode(#[from] ffmpeg_next::Error),
    #[error("video contains no frames")]
    Empty,
    #[error("invalid frame rate {0}")]
    InvalidFrameRate(f64),
    #[error("frame buffer is {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("no video loaded")]
    NotLoaded,
    #[error("no frame at index {index}")]
    NoFrame { index: usize },
    #[error("speed multiplier must be positive, got {0}")]
    InvalidSpeed(f64),
    #[error("unsupported image format for {path}, expected .png or .jpg")]
    UnsupportedImageFormat { path: PathBuf },
    #[error("failed to save frame to {path}: {source}")]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

pub type Result<T, E = PlayerError> = std::result::Result<T, E>;
