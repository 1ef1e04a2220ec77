use crate::{Dc6Error, Result};

pub const PALETTE_SIZE: usize = 256;

/// A 256-entry color table. Index 0 is always transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 3]; PALETTE_SIZE],
}

impl Palette {
    /// Builds a palette from RGB triplets; missing entries are black.
    pub fn from_colors(colors: &[[u8; 3]]) -> Self {
        let mut table = [[0u8; 3]; PALETTE_SIZE];
        for (dst, src) in table.iter_mut().zip(colors) {
            *dst = *src;
        }
        Self { colors: table }
    }

    /// Loads a Diablo II style `pal.dat`: 256 entries stored as B, G, R.
    ///
    /// A 1024-byte table with a padding byte per entry (B, G, R, X) is
    /// accepted as well.
    pub fn from_pal_dat(data: &[u8]) -> Result<Self> {
        let stride = match data.len() {
            768 => 3,
            1024 => 4,
            length => return Err(Dc6Error::InvalidPalette { length }),
        };
        let mut colors = [[0u8; 3]; PALETTE_SIZE];
        for (dst, entry) in colors.iter_mut().zip(data.chunks_exact(stride)) {
            *dst = [entry[2], entry[1], entry[0]];
        }
        Ok(Self { colors })
    }

    /// Loads 768 bytes of plain R, G, B triplets.
    pub fn from_rgb_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != PALETTE_SIZE * 3 {
            return Err(Dc6Error::InvalidPalette { length: data.len() });
        }
        let mut colors = [[0u8; 3]; PALETTE_SIZE];
        for (dst, entry) in colors.iter_mut().zip(data.chunks_exact(3)) {
            *dst = [entry[0], entry[1], entry[2]];
        }
        Ok(Self { colors })
    }

    /// Linear gray ramp, used when no game palette is available.
    pub fn grayscale() -> Self {
        let mut colors = [[0u8; 3]; PALETTE_SIZE];
        for (i, c) in colors.iter_mut().enumerate() {
            *c = [i as u8; 3];
        }
        Self { colors }
    }

    /// RGBA for a palette index.
    #[inline]
    pub fn color(&self, index: u8) -> [u8; 4] {
        if index == 0 {
            return [0, 0, 0, 0];
        }
        let [r, g, b] = self.colors[index as usize];
        [r, g, b, 0xff]
    }

    #[inline]
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        self.colors[index as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}
