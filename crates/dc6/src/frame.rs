use crate::cursor::Cursor;
use crate::decoder::DecodeOptions;
use crate::{Dc6Error, Result, END_OF_LINE};

/// Per-frame metadata stored in front of every RLE payload.
///
/// On disk this is 32 bytes: flip, width, height, offset x, offset y,
/// an unknown field, the next block pointer and the payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Zero when scanlines are stored bottom-to-top, non-zero when top-down.
    pub flip: u32,
    pub width: u32,
    pub height: u32,
    /// Left edge relative to the sprite origin
    pub offset_x: i32,
    /// Bottom edge relative to the sprite origin
    pub offset_y: i32,
    pub unknown: u32,
    pub next_block: u32,
    /// Encoded payload length in bytes
    pub length: u32,
}

impl FrameHeader {
    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            flip: cursor.read_u32()?,
            width: cursor.read_u32()?,
            height: cursor.read_u32()?,
            offset_x: cursor.read_i32()?,
            offset_y: cursor.read_i32()?,
            unknown: cursor.read_u32()?,
            next_block: cursor.read_u32()?,
            length: cursor.read_u32()?,
        })
    }

    /// True when the payload stores scanlines top-down already.
    #[inline]
    pub fn is_top_down(&self) -> bool {
        self.flip != 0
    }
}

/// A decoded frame: its header plus `width × height` palette indices.
///
/// Rows are kept in stream order, row 0 being the first scanline of the
/// payload. [`IndexedFrame::to_rgba`](crate::compositor) resolves orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    header: FrameHeader,
    pixels: Vec<u8>,
}

impl IndexedFrame {
    /// Runs the scanline RLE decoder over `payload`.
    ///
    /// `index` is only used to label errors.
    pub fn decode(
        header: FrameHeader,
        payload: &[u8],
        index: usize,
        options: &DecodeOptions,
    ) -> Result<Self> {
        if header.width > options.max_frame_dimension || header.height > options.max_frame_dimension
        {
            return Err(Dc6Error::MalformedFrame {
                frame: index,
                reason: format!(
                    "dimensions {}x{} exceed limit {}",
                    header.width, header.height, options.max_frame_dimension
                ),
            });
        }
        let pixels = decode_rle(
            payload,
            header.width as usize,
            header.height as usize,
            index,
        )?;
        Ok(Self { header, pixels })
    }

    #[inline]
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.header.width as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.header.height as usize
    }

    /// Palette indices in stream row order.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// One scanline in stream order.
    pub fn scanline(&self, row: usize) -> Option<&[u8]> {
        let width = self.width();
        if row >= self.height() {
            return None;
        }
        Some(&self.pixels[row * width..(row + 1) * width])
    }
}

fn decode_rle(payload: &[u8], width: usize, height: usize, frame: usize) -> Result<Vec<u8>> {
    let malformed = |reason: String| Dc6Error::MalformedFrame { frame, reason };

    let mut pixels = vec![0u8; width * height];
    let mut x = 0usize;
    let mut y = 0usize;
    let mut idx = 0usize;

    while idx < payload.len() {
        let cmd = payload[idx];
        idx += 1;

        if cmd == END_OF_LINE {
            if y >= height {
                return Err(malformed(format!(
                    "end of line beyond declared height {height}"
                )));
            }
            x = 0;
            y += 1;
            continue;
        }

        let run = (cmd & 0x7f) as usize;
        if run == 0 {
            continue;
        }
        if y >= height {
            return Err(malformed(format!(
                "run on scanline {y} beyond declared height {height}"
            )));
        }
        if x + run > width {
            return Err(malformed(format!(
                "run of {run} at column {x} overflows width {width} on scanline {y}"
            )));
        }

        if cmd & 0x80 == 0 {
            if idx + run > payload.len() {
                return Err(malformed(format!(
                    "literal run of {run} at payload offset {idx} exceeds payload length {}",
                    payload.len()
                )));
            }
            let start = y * width + x;
            pixels[start..start + run].copy_from_slice(&payload[idx..idx + run]);
            idx += run;
        }
        x += run;
    }

    // An unterminated final line still counts when something was placed on it.
    let scanlines = y + usize::from(x > 0);
    if scanlines != height {
        return Err(malformed(format!(
            "decoded {scanlines} scanlines, header declares {height}"
        )));
    }

    Ok(pixels)
}
