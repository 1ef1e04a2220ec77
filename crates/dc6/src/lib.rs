//! # dc6
//!
//! A 100% Rust decoder for DC6 sprite containers: multi-directional
//! animation sheets made of run-length-encoded, indexed-color frames.
//!
//! ## Features
//!
//! - **Decoder**: strict header, offset table and RLE validation. Every
//!   format invariant is a real error, so truncated or padded files are
//!   rejected instead of silently producing garbage.
//! - **Compositor**: palette lookup, vertical orientation and shared
//!   per-direction canvases for animation output.
//! - **Sink**: a small trait that receives RGBA buffers plus timing and
//!   disposal metadata, so the crate never depends on an image encoder.
//! - **Encoder**: the matching RLE encoder and a DC6 file builder.
//!
//! ## Quick Start
//!
//! ```ignore
//! use dc6::{dc6_decode, Palette};
//!
//! let data = std::fs::read("invgold.dc6")?;
//! let image = dc6_decode(&data)?;
//! let palette = Palette::grayscale();
//!
//! for frame in image.frames() {
//!     let rgba = frame.to_rgba(&palette);
//!     println!("{}x{} ({} bytes)", rgba.width, rgba.height, rgba.pixels.len());
//! }
//! ```

use thiserror::Error;

pub mod compositor;
pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod frame;
pub mod header;
pub mod palette;
pub mod sink;

pub use compositor::{
    canvas_size, compose_direction, Canvas, RgbaFrame, MAX_CANVAS_BYTES, MAX_CANVAS_DIMENSION,
};
pub use cursor::Cursor;
pub use decoder::{dc6_decode, dc6_decode_with_options, DecodeOptions, Dc6Image};
pub use encoder::{dc6_encode, encode_rle, EncodeFrame};
pub use frame::{FrameHeader, IndexedFrame};
pub use header::{Dc6Header, Termination};
pub use palette::Palette;
pub use sink::{
    convert, AnimatedFrame, Animation, ConversionMode, ConvertError, ConvertOptions, Disposal,
    OutputKind, PixelSink, StillFrame,
};

/// Errors that can occur while decoding a DC6 container.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Dc6Error {
    /// A read would run past the end of the buffer
    #[error("read of {requested} bytes at offset {position} exceeds buffer of {length} bytes")]
    OutOfRange {
        position: usize,
        requested: usize,
        length: usize,
    },

    /// The final frame's payload or trailer ends beyond the buffer
    #[error("unexpected end of file at offset {position} (file is {length} bytes)")]
    UnexpectedEndOfFile { position: usize, length: usize },

    /// Bad version or implausible direction/frame counts
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The buffer ends inside the frame offset table
    #[error("truncated offset table: expected {expected} bytes, {available} available")]
    TruncatedOffsetTable { expected: usize, available: usize },

    /// RLE payload produced the wrong number of rows or columns
    #[error("malformed frame {frame}: {reason}")]
    MalformedFrame { frame: usize, reason: String },

    /// Gap between a frame's payload and the next frame does not match the trailer size
    #[error("frame {frame} misaligned: expected {expected} bytes before next frame, found {actual}")]
    FrameAlignment {
        frame: usize,
        expected: usize,
        actual: i64,
    },

    /// Bytes remain after the last frame
    #[error("trailing data: decode stopped at offset {position} of {length}")]
    TrailingData { position: usize, length: usize },

    /// Palette table has an unsupported size
    #[error("invalid palette: {length} bytes")]
    InvalidPalette { length: usize },

    /// Frame offsets spread further apart than a canvas may span, or the
    /// composed frames would exceed the byte budget
    #[error("canvas of {width}x{height} exceeds size limit")]
    CanvasTooLarge { width: usize, height: usize },

    /// Pixel buffer does not match the declared dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Frame list does not match directions × frames per direction
    #[error("frame count mismatch: expected {expected} frames, got {actual}")]
    FrameCountMismatch { expected: usize, actual: usize },

    /// Requested (direction, frame) does not exist
    #[error("no frame {frame} in direction {direction}")]
    InvalidFrameIndex { direction: usize, frame: usize },
}

/// Result type for DC6 operations.
pub type Result<T> = core::result::Result<T, Dc6Error>;

// Format constants
pub(crate) const DC6_VERSION: u32 = 6;
pub(crate) const HEADER_SIZE: usize = 24;
pub(crate) const FRAME_HEADER_SIZE: usize = 32;
pub(crate) const END_OF_LINE: u8 = 0x80;
pub(crate) const TRAILER_GAP: usize = 3;
pub(crate) const MAX_DIRECTIONS: u32 = 64;
pub(crate) const MAX_FRAMES_PER_DIRECTION: u32 = 256;
pub(crate) const MAX_FRAME_DIMENSION: u32 = 4096;
