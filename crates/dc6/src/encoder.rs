//! RLE encoder and DC6 file builder.
//!
//! Produces the canonical encoding the decoder accepts: per scanline,
//! transparent pixels become skip runs, everything else literal runs (both
//! capped at 127), trailing transparency is left to the end-of-line marker.

use crate::{
    Dc6Error, Result, DC6_VERSION, END_OF_LINE, FRAME_HEADER_SIZE, HEADER_SIZE, TRAILER_GAP,
};

const MAX_RUN: usize = 0x7f;
const TRAILER: [u8; TRAILER_GAP] = [0xee; TRAILER_GAP];

/// A frame to be written into a DC6 file.
#[derive(Clone, Debug)]
pub struct EncodeFrame {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub flip: u32,
    /// Palette indices in stream row order (bottom-up unless `flip != 0`)
    pub pixels: Vec<u8>,
}

impl EncodeFrame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            offset_x: 0,
            offset_y: 0,
            flip: 0,
            pixels,
        }
    }

    pub fn with_offset(mut self, offset_x: i32, offset_y: i32) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    pub fn with_flip(mut self, flip: u32) -> Self {
        self.flip = flip;
        self
    }
}

/// Run-length encodes `width × height` palette indices.
///
/// Every scanline is terminated with an end-of-line marker.
pub fn encode_rle(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    let expected = width * height;
    if pixels.len() != expected {
        return Err(Dc6Error::BufferSizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let mut out = Vec::with_capacity(expected + height);
    for line in pixels.chunks_exact(width.max(1)).take(height) {
        encode_scanline(&mut out, line);
        out.push(END_OF_LINE);
    }
    if width == 0 {
        out.extend(std::iter::repeat(END_OF_LINE).take(height));
    }
    Ok(out)
}

fn encode_scanline(out: &mut Vec<u8>, line: &[u8]) {
    let used = line.iter().rposition(|&p| p != 0).map_or(0, |i| i + 1);
    let line = &line[..used];

    let mut x = 0;
    while x < line.len() {
        let transparent = line[x] == 0;
        let run = line[x..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&p| (p == 0) == transparent)
            .count();
        if transparent {
            out.push(0x80 | run as u8);
        } else {
            out.push(run as u8);
            out.extend_from_slice(&line[x..x + run]);
        }
        x += run;
    }
}

/// Builds a complete DC6 file.
///
/// `frames` is in frame-index order and must hold exactly
/// `directions × frames_per_direction` entries.
///
/// # Example
///
/// ```rust
/// use dc6::{dc6_encode, EncodeFrame};
///
/// let frames = vec![EncodeFrame::new(1, 1, vec![7]); 4];
/// let data = dc6_encode(2, 2, &frames)?;
/// assert_eq!(&data[..4], &6u32.to_le_bytes());
/// # Ok::<(), dc6::Dc6Error>(())
/// ```
#[must_use = "this returns the encoded DC6 bytes"]
pub fn dc6_encode(
    directions: u32,
    frames_per_direction: u32,
    frames: &[EncodeFrame],
) -> Result<Vec<u8>> {
    let expected = directions as usize * frames_per_direction as usize;
    if frames.len() != expected {
        return Err(Dc6Error::FrameCountMismatch {
            expected,
            actual: frames.len(),
        });
    }

    let payloads = frames
        .iter()
        .map(|f| encode_rle(&f.pixels, f.width as usize, f.height as usize))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::new();
    for field in [DC6_VERSION, 1, 0, 0xEEEE_EEEE, directions, frames_per_direction] {
        out.extend_from_slice(&field.to_le_bytes());
    }

    let mut offset = HEADER_SIZE + 4 * frames.len();
    for payload in &payloads {
        out.extend_from_slice(&(offset as i32).to_le_bytes());
        offset += FRAME_HEADER_SIZE + payload.len() + TRAILER.len();
    }

    for (frame, payload) in frames.iter().zip(&payloads) {
        for field in [frame.flip, frame.width, frame.height] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&frame.offset_x.to_le_bytes());
        out.extend_from_slice(&frame.offset_y.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(&TRAILER);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_runs_per_scanline() {
        let pixels = [0, 0, 3, 4, 0, 0];
        let rle = encode_rle(&pixels, 3, 2).unwrap();
        assert_eq!(rle, vec![0x82, 0x01, 3, 0x80, 0x01, 4, 0x80]);
    }

    #[test]
    fn long_runs_are_split() {
        let pixels = vec![1u8; 200];
        let rle = encode_rle(&pixels, 200, 1).unwrap();
        assert_eq!(rle[0], 127);
        assert_eq!(rle[128], 73);
        assert_eq!(rle.len(), 1 + 127 + 1 + 73 + 1);
    }

    #[test]
    fn blank_rows_are_bare_end_of_line() {
        let rle = encode_rle(&[0; 8], 4, 2).unwrap();
        assert_eq!(rle, vec![0x80, 0x80]);
        let rle = encode_rle(&[], 0, 3).unwrap();
        assert_eq!(rle, vec![0x80, 0x80, 0x80]);
    }

    #[test]
    fn buffer_size_mismatch() {
        assert_eq!(
            encode_rle(&[1, 2, 3], 2, 2),
            Err(Dc6Error::BufferSizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn frame_count_mismatch() {
        let frames = vec![EncodeFrame::new(1, 1, vec![1]); 3];
        assert!(matches!(
            dc6_encode(2, 2, &frames),
            Err(Dc6Error::FrameCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn file_layout() {
        let frames = [EncodeFrame::new(1, 1, vec![9]).with_offset(-2, 5)];
        let data = dc6_encode(1, 1, &frames).unwrap();
        // header + table + frame header + [1, 9, EOL] + trailer
        assert_eq!(data.len(), 24 + 4 + 32 + 3 + 3);
        assert_eq!(&data[24..28], &28i32.to_le_bytes());
        assert_eq!(&data[40..44], &(-2i32).to_le_bytes());
        assert_eq!(&data[56..60], &3u32.to_le_bytes());
        assert_eq!(&data[60..63], &[1, 9, 0x80]);
    }
}
