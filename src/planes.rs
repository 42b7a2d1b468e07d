//! The two planes of a Buddhabrot render and the maps between them.
//!
//! The *sample grid* is a finely divided lattice over the world
//! window; every lattice point is a candidate `c` for the quadratic
//! map.  The *integral plane* is the output image, onto which every
//! point of an escaping orbit is mapped and counted.  The sample grid
//! is usually `scale` times finer than the image along each axis.

use crate::config::{Config, WorldWindow};
use num::Complex;

/// Describes the x, y of a pixel in the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps a linear sample index to a point in the world window.
#[derive(Copy, Clone, Debug)]
pub struct SampleGrid {
    origin: Complex<f64>,
    columns: usize,
    rows: usize,
    // The distance in world units between neighbouring samples.
    step: (f64, f64),
}

impl SampleGrid {
    /// A grid of `columns` x `rows` samples spanning `window`, edges
    /// included.  A single column or row samples only the window's
    /// minimum on that axis.
    pub fn new(window: &WorldWindow, columns: usize, rows: usize) -> SampleGrid {
        let step = |span: f64, n: usize| if n > 1 { span / ((n - 1) as f64) } else { 0.0 };
        SampleGrid {
            origin: Complex::new(window.min_x, window.min_y),
            columns,
            rows,
            step: (step(window.width(), columns), step(window.height(), rows)),
        }
    }

    /// The grid described by a (sanitized) configuration.
    pub fn from_config(config: &Config) -> SampleGrid {
        SampleGrid::new(&config.window, config.columns(), config.rows())
    }

    /// The total number of samples in the grid.
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Describes that the grid has no samples at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The world-space point for sample `index`, walking the grid
    /// row by row.
    #[inline]
    pub fn sample(&self, index: usize) -> Complex<f64> {
        let column = index % self.columns;
        let row = index / self.columns;
        Complex::new(
            self.origin.re + (column as f64) * self.step.0,
            self.origin.im + (row as f64) * self.step.1,
        )
    }
}

/// Contains the definitions of two planes: the integral plane of the
/// output image, with its origin at 0,0, and the world window on the
/// complex plane.  Maps complex points onto image pixels.
#[derive(Debug)]
pub struct PlaneMapper {
    width: usize,
    height: usize,
    origin: Complex<f64>,
    // Multipliers taking a distance on the complex plane to a distance
    // on the integral plane.  The window's far edges land on the last
    // row and column.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// A mapper from `window` onto an image of `width` x `height`.
    pub fn new(width: usize, height: usize, window: &WorldWindow) -> PlaneMapper {
        PlaneMapper {
            width,
            height,
            origin: Complex::new(window.min_x, window.min_y),
            grid_factors: (
                ((width as f64) - 1.0) / window.width(),
                ((height as f64) - 1.0) / window.height(),
            ),
        }
    }

    /// The mapper described by a (sanitized) configuration.
    pub fn from_config(config: &Config) -> PlaneMapper {
        PlaneMapper::new(config.width, config.height, &config.window)
    }

    /// The total number of pixels in the integral plane.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes that the integral plane has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Map a complex point to the pixel it falls in, or `None` when
    /// it lies outside the image.
    #[inline]
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let left = ((point.re - self.origin.re) * self.grid_factors.0).floor();
        let top = ((point.im - self.origin.im) * self.grid_factors.1).floor();
        if !(left >= 0.0 && top >= 0.0) {
            return None;
        }
        let (left, top) = (left as usize, top as usize);
        if left >= self.width || top >= self.height {
            return None;
        }
        Some(Pixel(left, top))
    }

    /// Since the Buddhabrot tracks a complex number as it orbits, we
    /// map each step of the orbit back to the integral plane and count
    /// it there.  This returns the linear offset of that pixel from the
    /// root of a row-major image buffer.
    #[inline]
    pub fn point_to_offset(&self, point: &Complex<f64>) -> Option<usize> {
        self.point_to_pixel(point)
            .map(|Pixel(left, top)| top * self.width + left)
    }
}
