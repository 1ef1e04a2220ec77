//! Hand-off of decoded frames to an external image encoder.
//!
//! The crate never writes PNG or GIF itself. [`convert`] composes RGBA
//! buffers and passes them, with timing and disposal metadata, to a
//! [`PixelSink`] implementation supplied by the caller.

use std::fmt;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

use crate::compositor::{canvas_size, compose_direction, RgbaFrame, MAX_CANVAS_BYTES};
use crate::decoder::Dc6Image;
use crate::palette::Palette;
use crate::Dc6Error;

/// Requested output style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConversionMode {
    /// Still images for single-frame files, animations otherwise
    #[default]
    Auto,
    /// Always one still image per frame
    Png,
    /// Always one animation per direction
    Gif,
}

impl ConversionMode {
    pub fn resolve(self, frame_count: usize) -> OutputKind {
        match self {
            ConversionMode::Auto if frame_count == 1 => OutputKind::Still,
            ConversionMode::Auto => OutputKind::Animated,
            ConversionMode::Png => OutputKind::Still,
            ConversionMode::Gif => OutputKind::Animated,
        }
    }
}

impl FromStr for ConversionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ConversionMode::Auto),
            "png" => Ok(ConversionMode::Png),
            "gif" => Ok(ConversionMode::Gif),
            _ => Err(format!("\"{s}\" is not a supported format")),
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionMode::Auto => write!(f, "auto"),
            ConversionMode::Png => write!(f, "png"),
            ConversionMode::Gif => write!(f, "gif"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Still,
    Animated,
}

/// What happens to a frame's area before the next one is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Disposal {
    Keep,
    #[default]
    RestoreToBackground,
}

#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub mode: ConversionMode,
    /// Per-frame delay in centiseconds
    pub delay: u16,
    pub disposal: Disposal,
    /// RGBA bytes one direction's animation may occupy, all frames together
    pub max_canvas_bytes: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: ConversionMode::Auto,
            delay: 10,
            disposal: Disposal::RestoreToBackground,
            max_canvas_bytes: MAX_CANVAS_BYTES,
        }
    }
}

/// One frame delivered as a standalone image.
#[derive(Debug)]
pub struct StillFrame<'a> {
    pub direction: usize,
    /// Frame within its direction
    pub frame: usize,
    /// Frame index across the whole file
    pub index: usize,
    /// Number of frames in the file
    pub frame_count: usize,
    pub image: &'a RgbaFrame,
}

#[derive(Debug, Clone)]
pub struct AnimatedFrame {
    pub image: RgbaFrame,
    pub delay: u16,
    pub disposal: Disposal,
}

/// All frames of one direction on a shared canvas.
#[derive(Debug)]
pub struct Animation<'a> {
    pub direction: usize,
    /// Number of directions in the file
    pub directions: usize,
    pub width: usize,
    pub height: usize,
    pub frames: &'a [AnimatedFrame],
}

/// Receiver for converted frames, typically backed by an image encoder.
pub trait PixelSink {
    type Error;

    fn write_still(&mut self, still: &StillFrame<'_>) -> Result<(), Self::Error>;

    fn write_animation(&mut self, animation: &Animation<'_>) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum ConvertError<E> {
    #[error(transparent)]
    Decode(#[from] Dc6Error),

    #[error("pixel sink failed: {0}")]
    Sink(E),
}

/// Composes `image` with `palette` and feeds the result to `sink`.
///
/// Still output calls [`PixelSink::write_still`] once per frame in
/// frame-index order. Animated output calls [`PixelSink::write_animation`]
/// once per direction. Every direction's canvas is checked against
/// `options.max_canvas_bytes` before the sink sees the first frame, so an
/// oversized sprite never leaves partial output. Only one direction is held
/// in memory at a time.
pub fn convert<S: PixelSink>(
    image: &Dc6Image,
    palette: &Palette,
    options: &ConvertOptions,
    sink: &mut S,
) -> Result<OutputKind, ConvertError<S::Error>> {
    let kind = options.mode.resolve(image.frame_count());
    debug!(
        "converting {} frames as {:?} (mode {})",
        image.frame_count(),
        kind,
        options.mode
    );

    match kind {
        OutputKind::Still => {
            let per = image.frames_per_direction();
            let frame_count = image.frame_count();
            for (index, frame) in image.frames().iter().enumerate() {
                let rgba = frame.to_rgba(palette);
                let still = StillFrame {
                    direction: index / per,
                    frame: index % per,
                    index,
                    frame_count,
                    image: &rgba,
                };
                sink.write_still(&still).map_err(ConvertError::Sink)?;
            }
        }
        OutputKind::Animated => {
            for frames in image.iter_directions() {
                canvas_size(frames, options.max_canvas_bytes)?;
            }

            let directions = image.directions();
            for (direction, frames) in image.iter_directions().enumerate() {
                let canvas = compose_direction(frames, palette, options.max_canvas_bytes)?;
                let animated: Vec<AnimatedFrame> = canvas
                    .frames
                    .into_iter()
                    .map(|image| AnimatedFrame {
                        image,
                        delay: options.delay,
                        disposal: options.disposal,
                    })
                    .collect();
                let animation = Animation {
                    direction,
                    directions,
                    width: canvas.width,
                    height: canvas.height,
                    frames: &animated,
                };
                sink.write_animation(&animation).map_err(ConvertError::Sink)?;
            }
        }
    }

    Ok(kind)
}
