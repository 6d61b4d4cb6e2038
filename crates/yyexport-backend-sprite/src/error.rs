//! Error types for sprite conversion.

use thiserror::Error;

use crate::png::PngError;

/// Geometry that cannot be turned into a valid mask or bounding box.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionError {
    #[error("mask dimensions must be non-zero, got {width}x{height}")]
    EmptyMask { width: u32, height: u32 },

    #[error("mask dimensions {width}x{height} are too large")]
    TooLarge { width: u32, height: u32 },

    #[error("inverted bounding box: left {left}, right {right}, top {top}, bottom {bottom}")]
    InvertedBoundingBox {
        left: i32,
        right: i32,
        top: i32,
        bottom: i32,
    },

    #[error(
        "bounding box left {left}, right {right}, top {top}, bottom {bottom} \
         lies outside the {width}x{height} canvas"
    )]
    OutsideCanvas {
        left: i32,
        right: i32,
        top: i32,
        bottom: i32,
        width: u32,
        height: u32,
    },

    #[error("mask data holds {actual} bytes, expected {expected} for {width}x{height}")]
    MaskDataLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("masks differ in size: {0}x{1} vs {2}x{3}")]
    MismatchedMasks(u32, u32, u32, u32),

    #[error("unknown bounding box mode {0}")]
    UnknownBboxMode(u32),
}

/// Failure to produce the image for one frame.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture '{0}' not found")]
    NotFound(String),

    #[error("failed to read texture '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: PngError,
    },
}

/// A resource name was registered twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resource name '{name}' is already taken by a {existing_kind} resource")]
pub struct DuplicateNameError {
    pub name: String,
    pub existing_kind: String,
}

/// Errors that abort the conversion of a single sprite.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error("frame {index}: {source}")]
    TextureAcquisition {
        index: u32,
        #[source]
        source: TextureError,
    },

    #[error(transparent)]
    DuplicateName(#[from] DuplicateNameError),
}
