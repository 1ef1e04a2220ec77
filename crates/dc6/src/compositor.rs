//! Palette lookup, orientation and canvas placement.
//!
//! Decoded frames keep their scanlines in stream order. Every path from an
//! [`IndexedFrame`] to RGBA goes through [`IndexedFrame::to_rgba`], which is
//! the single place where bottom-up frames are turned upright.

use crate::frame::IndexedFrame;
use crate::palette::Palette;
use crate::{Dc6Error, Result};

/// Largest canvas [`compose_direction`] will allocate along either axis.
pub const MAX_CANVAS_DIMENSION: usize = 16384;

/// Default budget for the RGBA bytes of one composed direction, summed over
/// all of its frames.
pub const MAX_CANVAS_BYTES: usize = 256 * 1024 * 1024;

/// An RGBA image, 4 bytes per pixel, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl RgbaFrame {
    /// Fully transparent image.
    pub fn transparent(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Copies `src` into `self` with its top-left corner at (`x`, `y`).
    /// The source must fit entirely.
    fn blit(&mut self, src: &RgbaFrame, x: usize, y: usize) {
        let stride = src.width * 4;
        for row in 0..src.height {
            let dst = ((y + row) * self.width + x) * 4;
            self.pixels[dst..dst + stride]
                .copy_from_slice(&src.pixels[row * stride..(row + 1) * stride]);
        }
    }
}

impl IndexedFrame {
    /// Converts to top-down RGBA.
    ///
    /// Frames with `flip == 0` are stored bottom-up and get their rows
    /// reversed here; top-down frames are copied as they are.
    pub fn to_rgba(&self, palette: &Palette) -> RgbaFrame {
        let (width, height) = (self.width(), self.height());
        let top_down = self.header().is_top_down();
        let mut out = RgbaFrame::transparent(width, height);

        for (row, line) in self.pixels().chunks_exact(width.max(1)).enumerate() {
            let y = if top_down { row } else { height - 1 - row };
            let dst = &mut out.pixels[y * width * 4..(y + 1) * width * 4];
            for (px, &index) in dst.chunks_exact_mut(4).zip(line) {
                px.copy_from_slice(&palette.color(index));
            }
        }
        out
    }
}

/// Frames placed on one shared canvas, as needed for animation.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    /// Sprite coordinate of the canvas' left edge
    pub origin_x: i32,
    /// Sprite coordinate of the canvas' top edge
    pub origin_y: i32,
    /// One full-canvas image per input frame, in input order
    pub frames: Vec<RgbaFrame>,
}

/// Returns the shared canvas size for `frames` without allocating it.
///
/// Fails with [`Dc6Error::CanvasTooLarge`] when either side exceeds
/// [`MAX_CANVAS_DIMENSION`] or when one full-canvas RGBA image per frame
/// would take more than `max_canvas_bytes`.
pub fn canvas_size(frames: &[IndexedFrame], max_canvas_bytes: usize) -> Result<(usize, usize)> {
    let Some((left, top, right, bottom)) = bounds(frames) else {
        return Ok((0, 0));
    };
    let width = (right - left) as usize;
    let height = (bottom - top) as usize;
    if width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION {
        return Err(Dc6Error::CanvasTooLarge { width, height });
    }

    let total = (width * height * 4).checked_mul(frames.len());
    match total {
        Some(bytes) if bytes <= max_canvas_bytes => Ok((width, height)),
        _ => Err(Dc6Error::CanvasTooLarge { width, height }),
    }
}

/// Places the frames of one direction on a shared canvas.
///
/// A frame covers columns `offset_x .. offset_x + width` and rows
/// `offset_y - height .. offset_y` in sprite space. The canvas is the union of
/// those rectangles, so every offset is honored; pixels no frame covers stay
/// transparent. The size is checked with [`canvas_size`] before anything is
/// allocated.
pub fn compose_direction(
    frames: &[IndexedFrame],
    palette: &Palette,
    max_canvas_bytes: usize,
) -> Result<Canvas> {
    let (width, height) = canvas_size(frames, max_canvas_bytes)?;
    let Some((left, top, _, _)) = bounds(frames) else {
        return Ok(Canvas {
            width: 0,
            height: 0,
            origin_x: 0,
            origin_y: 0,
            frames: Vec::new(),
        });
    };

    let placed = frames
        .iter()
        .map(|frame| {
            let header = frame.header();
            let x = (header.offset_x as i64 - left) as usize;
            let y = (header.offset_y as i64 - header.height as i64 - top) as usize;
            let mut canvas = RgbaFrame::transparent(width, height);
            canvas.blit(&frame.to_rgba(palette), x, y);
            canvas
        })
        .collect();

    Ok(Canvas {
        width,
        height,
        origin_x: left as i32,
        origin_y: top as i32,
        frames: placed,
    })
}

fn bounds(frames: &[IndexedFrame]) -> Option<(i64, i64, i64, i64)> {
    frames.iter().fold(None, |acc, frame| {
        let h = frame.header();
        let left = h.offset_x as i64;
        let right = left + h.width as i64;
        let bottom = h.offset_y as i64;
        let top = bottom - h.height as i64;
        Some(match acc {
            None => (left, top, right, bottom),
            Some((l, t, r, b)) => (l.min(left), t.min(top), r.max(right), b.max(bottom)),
        })
    })
}
