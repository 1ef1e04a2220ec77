use crate::cursor::Cursor;
use crate::decoder::DecodeOptions;
use crate::{Dc6Error, Result, DC6_VERSION};

/// Known values of the header's termination marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `EE EE EE EE`
    Ee,
    /// `CD CD CD CD`
    Cd,
    /// Anything else. Not rejected, the field carries no decoding meaning.
    Other(u32),
}

impl From<u32> for Termination {
    fn from(value: u32) -> Self {
        match value {
            0xEEEE_EEEE => Termination::Ee,
            0xCDCD_CDCD => Termination::Cd,
            other => Termination::Other(other),
        }
    }
}

/// The fixed 24-byte DC6 file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dc6Header {
    pub version: u32,
    pub reserved1: u32,
    pub reserved2: u32,
    pub termination: u32,
    pub directions: u32,
    pub frames_per_direction: u32,
}

impl Dc6Header {
    /// Reads and validates the header at the cursor.
    pub fn read(cursor: &mut Cursor<'_>, options: &DecodeOptions) -> Result<Self> {
        let header = Self {
            version: cursor.read_u32()?,
            reserved1: cursor.read_u32()?,
            reserved2: cursor.read_u32()?,
            termination: cursor.read_u32()?,
            directions: cursor.read_u32()?,
            frames_per_direction: cursor.read_u32()?,
        };
        header.validate(options)?;
        Ok(header)
    }

    fn validate(&self, options: &DecodeOptions) -> Result<()> {
        if self.version != DC6_VERSION {
            return Err(Dc6Error::InvalidHeader(format!(
                "unsupported version {} (expected {})",
                self.version, DC6_VERSION
            )));
        }
        if self.directions == 0 || self.directions > options.max_directions {
            return Err(Dc6Error::InvalidHeader(format!(
                "direction count {} outside 1..={}",
                self.directions, options.max_directions
            )));
        }
        if self.frames_per_direction == 0
            || self.frames_per_direction > options.max_frames_per_direction
        {
            return Err(Dc6Error::InvalidHeader(format!(
                "frames per direction {} outside 1..={}",
                self.frames_per_direction, options.max_frames_per_direction
            )));
        }
        Ok(())
    }

    /// Total number of frames: `directions × frames_per_direction`.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.directions as usize * self.frames_per_direction as usize
    }

    #[inline]
    pub fn termination_kind(&self) -> Termination {
        Termination::from(self.termination)
    }
}

/// Reads one absolute frame offset per frame, in frame-index order.
///
/// The table must be strictly increasing and the first entry must point
/// directly behind the table itself.
pub fn read_offset_table(cursor: &mut Cursor<'_>, frame_count: usize) -> Result<Vec<i32>> {
    let expected = frame_count.saturating_mul(4);
    if cursor.remaining() < expected {
        return Err(Dc6Error::TruncatedOffsetTable {
            expected,
            available: cursor.remaining(),
        });
    }

    let mut offsets = Vec::with_capacity(frame_count);
    for _ in 0..frame_count {
        offsets.push(cursor.read_i32()?);
    }

    let table_end = cursor.position() as i64;
    if let Some(&first) = offsets.first() {
        if first as i64 != table_end {
            return Err(Dc6Error::FrameAlignment {
                frame: 0,
                expected: 0,
                actual: first as i64 - table_end,
            });
        }
    }
    for (i, pair) in offsets.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(Dc6Error::FrameAlignment {
                frame: i + 1,
                expected: 0,
                actual: pair[1] as i64 - pair[0] as i64,
            });
        }
    }

    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header_bytes(fields: [u32; 6]) -> Vec<u8> {
        fields.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    #[test]
    fn reads_header_fields_in_order() {
        let data = header_bytes([6, 1, 0, 0xEEEE_EEEE, 8, 16]);
        let mut cursor = Cursor::new(&data);
        let header = Dc6Header::read(&mut cursor, &DecodeOptions::default()).unwrap();
        assert_eq!(header.directions, 8);
        assert_eq!(header.frames_per_direction, 16);
        assert_eq!(header.frame_count(), 128);
        assert_eq!(header.termination_kind(), Termination::Ee);
        assert_eq!(cursor.position(), 24);
    }

    #[test]
    fn rejects_wrong_version() {
        let data = header_bytes([5, 1, 0, 0xCDCD_CDCD, 1, 1]);
        let err = Dc6Header::read(&mut Cursor::new(&data), &DecodeOptions::default());
        assert!(matches!(err, Err(Dc6Error::InvalidHeader(_))));
    }

    #[test]
    fn rejects_implausible_counts() {
        for fields in [
            [6, 1, 0, 0, 0, 1],
            [6, 1, 0, 0, 65, 1],
            [6, 1, 0, 0, 1, 0],
            [6, 1, 0, 0, 1, 0x0100_0000],
        ] {
            let data = header_bytes(fields);
            let err = Dc6Header::read(&mut Cursor::new(&data), &DecodeOptions::default());
            assert!(
                matches!(err, Err(Dc6Error::InvalidHeader(_))),
                "{fields:?} should be rejected"
            );
        }
    }

    #[test]
    fn short_header_is_out_of_range() {
        let data = [6u8, 0, 0, 0, 1];
        let err = Dc6Header::read(&mut Cursor::new(&data), &DecodeOptions::default());
        assert!(matches!(err, Err(Dc6Error::OutOfRange { .. })));
    }

    #[test]
    fn unknown_termination_is_preserved() {
        assert_eq!(Termination::from(0x1234), Termination::Other(0x1234));
        assert_eq!(Termination::from(0xCDCD_CDCD), Termination::Cd);
    }

    #[test]
    fn truncated_offset_table() {
        let data = [0u8; 7];
        let err = read_offset_table(&mut Cursor::new(&data), 2).unwrap_err();
        assert_eq!(
            err,
            Dc6Error::TruncatedOffsetTable {
                expected: 8,
                available: 7
            }
        );
    }

    #[test]
    fn offset_table_must_increase() {
        let mut data = Vec::new();
        data.extend_from_slice(&8i32.to_le_bytes());
        data.extend_from_slice(&8i32.to_le_bytes());
        let err = read_offset_table(&mut Cursor::new(&data), 2).unwrap_err();
        assert!(matches!(err, Dc6Error::FrameAlignment { frame: 1, .. }));
    }

    #[test]
    fn first_offset_must_follow_table() {
        let data = 12i32.to_le_bytes();
        let err = read_offset_table(&mut Cursor::new(&data), 1).unwrap_err();
        assert_eq!(
            err,
            Dc6Error::FrameAlignment {
                frame: 0,
                expected: 0,
                actual: 8
            }
        );
    }
}
