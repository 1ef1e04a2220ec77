use log::{debug, trace};

use crate::cursor::Cursor;
use crate::frame::{FrameHeader, IndexedFrame};
use crate::header::{read_offset_table, Dc6Header};
use crate::{
    Dc6Error, Result, MAX_DIRECTIONS, MAX_FRAMES_PER_DIRECTION, MAX_FRAME_DIMENSION, TRAILER_GAP,
};

/// Limits and format-variant knobs for the decoder.
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Unexplained bytes between a payload and the next frame.
    /// Every file seen so far uses 3.
    pub trailer_gap: usize,
    /// Upper bound for the header's direction count (1..=this).
    pub max_directions: u32,
    /// Upper bound for the header's frames per direction (1..=this).
    pub max_frames_per_direction: u32,
    /// Upper bound for a single frame's width and height.
    pub max_frame_dimension: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            trailer_gap: TRAILER_GAP,
            max_directions: MAX_DIRECTIONS,
            max_frames_per_direction: MAX_FRAMES_PER_DIRECTION,
            max_frame_dimension: MAX_FRAME_DIMENSION,
        }
    }
}

/// A fully decoded DC6 container.
///
/// Frames are stored in frame-index order, that is
/// `direction * frames_per_direction + frame`.
#[derive(Debug, Clone)]
pub struct Dc6Image {
    header: Dc6Header,
    offsets: Vec<i32>,
    frames: Vec<IndexedFrame>,
}

impl Dc6Image {
    #[inline]
    pub fn header(&self) -> &Dc6Header {
        &self.header
    }

    /// Absolute frame offsets as stored in the file.
    #[inline]
    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    #[inline]
    pub fn frames(&self) -> &[IndexedFrame] {
        &self.frames
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn directions(&self) -> usize {
        self.header.directions as usize
    }

    #[inline]
    pub fn frames_per_direction(&self) -> usize {
        self.header.frames_per_direction as usize
    }

    /// All frames of one direction, in order.
    pub fn direction(&self, direction: usize) -> Option<&[IndexedFrame]> {
        let per = self.frames_per_direction();
        if direction >= self.directions() {
            return None;
        }
        Some(&self.frames[direction * per..(direction + 1) * per])
    }

    /// Iterates directions as frame slices.
    pub fn iter_directions(&self) -> impl Iterator<Item = &[IndexedFrame]> + '_ {
        self.frames.chunks(self.frames_per_direction())
    }

    pub fn frame(&self, direction: usize, frame: usize) -> Result<&IndexedFrame> {
        self.direction(direction)
            .and_then(|frames| frames.get(frame))
            .ok_or(Dc6Error::InvalidFrameIndex { direction, frame })
    }

    /// Consumes the image, returning the header and its frames.
    pub fn into_frames(self) -> (Dc6Header, Vec<IndexedFrame>) {
        (self.header, self.frames)
    }
}

/// Decodes a complete DC6 file with default limits.
///
/// Either every frame decodes and the whole buffer is accounted for, or an
/// error is returned and nothing is produced.
///
/// # Example
///
/// ```rust
/// use dc6::{dc6_decode, dc6_encode, EncodeFrame};
///
/// let frame = EncodeFrame::new(2, 1, vec![3, 4]);
/// let data = dc6_encode(1, 1, &[frame])?;
/// let image = dc6_decode(&data)?;
/// assert_eq!(image.frame_count(), 1);
/// assert_eq!(image.frames()[0].pixels(), &[3, 4]);
/// # Ok::<(), dc6::Dc6Error>(())
/// ```
///
/// # Errors
///
/// See [`Dc6Error`] for the full taxonomy. Format invariants (trailer gap,
/// exact end of buffer, scanline counts) are always checked.
#[must_use = "this returns the decoded Dc6Image"]
pub fn dc6_decode(data: &[u8]) -> Result<Dc6Image> {
    dc6_decode_with_options(data, &DecodeOptions::default())
}

#[must_use = "this returns the decoded Dc6Image"]
pub fn dc6_decode_with_options(data: &[u8], options: &DecodeOptions) -> Result<Dc6Image> {
    let mut cursor = Cursor::new(data);

    let header = Dc6Header::read(&mut cursor, options)?;
    let frame_count = header.frame_count();
    debug!(
        "dc6 header: {} directions x {} frames, {} bytes",
        header.directions,
        header.frames_per_direction,
        data.len()
    );

    let offsets = read_offset_table(&mut cursor, frame_count)?;

    let mut frames = Vec::with_capacity(frame_count);
    for index in 0..frame_count {
        let frame = decode_next_frame(&mut cursor, &offsets, index, options)?;
        trace!(
            "frame {}: {}x{} at ({}, {}), {} payload bytes",
            index,
            frame.header().width,
            frame.header().height,
            frame.header().offset_x,
            frame.header().offset_y,
            frame.header().length
        );
        frames.push(frame);
    }

    if cursor.position() != cursor.len() {
        return Err(Dc6Error::TrailingData {
            position: cursor.position(),
            length: cursor.len(),
        });
    }

    Ok(Dc6Image {
        header,
        offsets,
        frames,
    })
}

fn decode_next_frame(
    cursor: &mut Cursor<'_>,
    offsets: &[i32],
    index: usize,
    options: &DecodeOptions,
) -> Result<IndexedFrame> {
    let header = FrameHeader::read(cursor).map_err(|_| eof(cursor))?;
    let payload_end = cursor.position() as i64 + header.length as i64;

    if let Some(&next) = offsets.get(index + 1) {
        let actual = next as i64 - payload_end;
        if actual != options.trailer_gap as i64 {
            return Err(Dc6Error::FrameAlignment {
                frame: index,
                expected: options.trailer_gap,
                actual,
            });
        }
    }

    let payload = cursor
        .read_bytes(header.length as usize)
        .map_err(|_| eof(cursor))?;
    let frame = IndexedFrame::decode(header, payload, index, options)?;
    cursor.skip(options.trailer_gap).map_err(|_| eof(cursor))?;
    Ok(frame)
}

fn eof(cursor: &Cursor<'_>) -> Dc6Error {
    Dc6Error::UnexpectedEndOfFile {
        position: cursor.position(),
        length: cursor.len(),
    }
}
