//! Row-major pixel grids: the 16-bit greyscale histogram the engine
//! accumulates into, and the 24-bit colour image it becomes.

use crate::error::RenderError;
use itertools::iproduct;
use std::mem;

/// A `width` x `height` grid of pixels stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<P> {
    width: usize,
    height: usize,
    pixels: Vec<P>,
}

/// Per-pixel visit counts.
pub type Histogram = Raster<u16>;

/// Red, green and blue bytes per pixel.
pub type RgbImage = Raster<[u8; 3]>;

/// Reserve room for `len` pixels, reporting failure instead of
/// aborting the process.
pub(crate) fn allocate<P: Copy>(len: usize, fill: P) -> Result<Vec<P>, RenderError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| RenderError::Allocation {
            bytes: len.saturating_mul(mem::size_of::<P>()),
        })?;
    pixels.resize(len, fill);
    Ok(pixels)
}

impl<P: Copy> Raster<P> {
    /// A grid filled with `fill`.
    pub fn filled(width: usize, height: usize, fill: P) -> Result<Self, RenderError> {
        let len = width
            .checked_mul(height)
            .ok_or(RenderError::Allocation {
                bytes: usize::max_value(),
            })?;
        Ok(Raster {
            width,
            height,
            pixels: allocate(len, fill)?,
        })
    }

    /// Wrap an existing row-major buffer.  Returns `None` if the
    /// buffer's length does not match the dimensions.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<P>) -> Option<Self> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return None;
        }
        Some(Raster {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixels, row by row.
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    /// Mutable access to the pixels, row by row.
    pub fn pixels_mut(&mut self) -> &mut [P] {
        &mut self.pixels
    }

    /// Take the pixel buffer, discarding the dimensions.
    pub fn into_pixels(self) -> Vec<P> {
        self.pixels
    }

    /// The pixel at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<P> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Rotate 90 degrees clockwise: the pixel at `(x, y)` moves to
    /// `(height - 1 - y, x)` and width and height trade places.
    pub fn rotate_right(&self) -> Result<Self, RenderError> {
        let mut rotated = match self.pixels.first() {
            Some(&fill) => allocate(self.pixels.len(), fill)?,
            None => Vec::new(),
        };
        // Source row y becomes destination column h - 1 - y.
        for (y, x) in iproduct!(0..self.height, 0..self.width) {
            rotated[x * self.height + (self.height - 1 - y)] = self.pixels[y * self.width + x];
        }
        Ok(Raster {
            width: self.height,
            height: self.width,
            pixels: rotated,
        })
    }
}

impl Histogram {
    /// The brightest pixel, or 0 for an empty histogram.
    pub fn max_value(&self) -> u16 {
        self.pixels.iter().copied().max().unwrap_or(0)
    }

    /// The sum of every count, widened so it cannot overflow.
    pub fn total(&self) -> u64 {
        self.pixels.iter().map(|&p| u64::from(p)).sum()
    }

    /// The number of pixels whose count reached the counter's limit
    /// and may have been clipped.
    pub fn saturated(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == u16::max_value()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    fn counting(width: usize, height: usize) -> Histogram {
        Raster::from_pixels(width, height, (0..(width * height) as u16).collect()).unwrap()
    }

    #[test]
    fn from_pixels_checks_length() {
        assert!(Raster::from_pixels(2, 2, vec![0u16; 3]).is_none());
        assert!(Raster::from_pixels(2, 2, vec![0u16; 4]).is_some());
    }

    #[test]
    fn rotate_right_moves_rows_to_columns() {
        //   0 1 2 3      4 0
        //   4 5 6 7  ->  5 1
        //                6 2
        //                7 3
        let rotated = counting(4, 2).rotate_right().unwrap();
        assert_eq!(rotated.width(), 2);
        assert_eq!(rotated.height(), 4);
        assert_eq!(rotated.pixels(), &[4, 0, 5, 1, 6, 2, 7, 3]);
    }

    #[test]
    fn rotate_right_follows_the_pixel_rule() {
        let (w, h) = (5, 3);
        let source = counting(w, h);
        let rotated = source.rotate_right().unwrap();
        for (y, x) in iproduct!(0..h, 0..w) {
            assert_eq!(rotated.get(h - 1 - y, x), source.get(x, y));
        }
    }

    #[test]
    fn four_rotations_are_the_identity() {
        let source = counting(7, 3);
        let mut image = source.clone();
        for _ in 0..4 {
            image = image.rotate_right().unwrap();
        }
        assert_eq!(image, source);
    }

    #[test]
    fn rotate_empty_raster() {
        let empty: Histogram = Raster::filled(0, 3, 0).unwrap();
        let rotated = empty.rotate_right().unwrap();
        assert_eq!(rotated.width(), 3);
        assert_eq!(rotated.height(), 0);
    }

    #[test]
    fn filled_reports_overflowing_dimensions() {
        match Raster::filled(usize::max_value() / 2, 3, 0u16) {
            Err(RenderError::Allocation { .. }) => (),
            other => panic!("unexpected {:?}", other.map(|r| r.width())),
        }
        assert!(Raster::from_pixels(usize::max_value() / 2, 3, vec![0u16; 3]).is_none());
    }

    #[test]
    fn histogram_statistics() {
        let mut h: Histogram = Raster::filled(3, 1, 0).unwrap();
        assert_eq!(h.max_value(), 0);
        h.pixels_mut().copy_from_slice(&[2, u16::max_value(), 7]);
        assert_eq!(h.max_value(), u16::max_value());
        assert_eq!(h.total(), 65_544);
        assert_eq!(h.saturated(), 1);
    }
}
