//! Forward-only little-endian reader over a borrowed byte buffer.

use crate::{Dc6Error, Result};

/// Sequential reader used by every stage of the decoder.
///
/// Reads never clamp: a request that would cross the end of the buffer
/// fails with [`Dc6Error::OutOfRange`] and leaves the position untouched.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read offset from the start of the buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.read_bytes(1)?[0];
        Ok(byte)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let b = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.checked_end(len)?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.pos = self.checked_end(len)?;
        Ok(())
    }

    fn checked_end(&self, len: usize) -> Result<usize> {
        self.pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(Dc6Error::OutOfRange {
                position: self.pos,
                requested: len,
                length: self.data.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_little_endian_values() {
        let data = [0x06, 0, 0, 0, 0xfe, 0xff, 0xff, 0xff, 0xab];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u32().unwrap(), 6);
        assert_eq!(cursor.read_i32().unwrap(), -2);
        assert_eq!(cursor.read_u8().unwrap(), 0xab);
        assert_eq!(cursor.position(), data.len());
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn short_read_fails_without_advancing() {
        let data = [1, 2, 3];
        let mut cursor = Cursor::new(&data);
        cursor.skip(1).unwrap();
        let err = cursor.read_u32().unwrap_err();
        assert_eq!(
            err,
            Dc6Error::OutOfRange {
                position: 1,
                requested: 4,
                length: 3
            }
        );
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_bytes(2).unwrap(), &[2, 3]);
    }

    #[test]
    fn huge_length_does_not_overflow() {
        let data = [0u8; 8];
        let mut cursor = Cursor::new(&data);
        cursor.skip(4).unwrap();
        assert!(cursor.read_bytes(usize::MAX).is_err());
        assert!(cursor.skip(5).is_err());
        assert!(cursor.skip(4).is_ok());
        assert!(cursor.read_u8().is_err());
    }
}
