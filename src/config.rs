//! The immutable inputs to a render: where on the complex plane we
//! look, how finely we sample it, how deep we iterate, and how the
//! resulting histogram is turned into colour.
//!
//! Nothing here is ever rejected.  Values that would make the render
//! meaningless (a zero scale, an inverted window) are clamped to safe
//! defaults, with a warning, by `Config::sanitized`.

use log::warn;
use num::Complex;
use std::str::FromStr;

/// The largest worker pool the engine will ever spawn.
pub const MAX_WORKERS: usize = 256;

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

/// A rectangle on the complex plane, real part along x and imaginary
/// part along y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldWindow {
    /// Smallest real value sampled.
    pub min_x: f64,
    /// Largest real value sampled.
    pub max_x: f64,
    /// Smallest imaginary value sampled.
    pub min_y: f64,
    /// Largest imaginary value sampled.
    pub max_y: f64,
}

impl Default for WorldWindow {
    /// The window that frames the whole Buddhabrot.
    fn default() -> Self {
        WorldWindow {
            min_x: -2.102_613,
            max_x: 1.200_613,
            min_y: -1.237_710,
            max_y: 1.239_710,
        }
    }
}

impl WorldWindow {
    /// Build a window from its left-lower and right-upper corners.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Self {
        WorldWindow {
            min_x: leftlower.re,
            max_x: rightupper.re,
            min_y: leftlower.im,
            max_y: rightupper.im,
        }
    }

    /// Width of the window on the real axis.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the window on the imaginary axis.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when every bound is finite and both axes are non-empty.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }
}

/// Everything `compute_histogram` needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// The sampled region of the complex plane.
    pub window: WorldWindow,
    /// Output image width in pixels.
    pub width: usize,
    /// Output image height in pixels.
    pub height: usize,
    /// Maximum number of iterations per sample.
    pub max_depth: usize,
    /// Samples per pixel along each axis.
    pub scale: usize,
    /// Requested worker count; 0 means one per detected core.
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            window: WorldWindow::default(),
            width: 1024,
            height: 768,
            max_depth: 1000,
            scale: 10,
            threads: 0,
        }
    }
}

impl Config {
    /// Returns a copy in which every out-of-range value has been
    /// replaced by its safe default.
    pub fn sanitized(&self) -> Config {
        let mut config = *self;
        if config.scale < 1 {
            warn!("scale {} is below 1, using 1", config.scale);
            config.scale = 1;
        }
        if config.width == 0 {
            warn!("image width 0, using 1");
            config.width = 1;
        }
        if config.height == 0 {
            warn!("image height 0, using 1");
            config.height = 1;
        }
        if config.max_depth == 0 {
            warn!("max depth 0, using 1");
            config.max_depth = 1;
        }
        if !config.window.is_valid() {
            warn!(
                "world window {:?} is empty or not finite, using the default",
                config.window
            );
            config.window = WorldWindow::default();
        }
        config
    }

    /// Columns of the sample grid.
    pub fn columns(&self) -> usize {
        self.width.saturating_mul(self.scale)
    }

    /// Rows of the sample grid.
    pub fn rows(&self) -> usize {
        self.height.saturating_mul(self.scale)
    }

    /// Samples in the grid, or `None` if the count overflows.
    pub fn sample_count(&self) -> Option<usize> {
        self.width
            .checked_mul(self.scale)?
            .checked_mul(self.height.checked_mul(self.scale)?)
    }

    /// Pixels in the image, or `None` if the count overflows.
    pub fn pixel_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// The number of workers a render of this configuration will
    /// use: the request (or every core, if 0), capped by the cores
    /// present and by `MAX_WORKERS`.
    pub fn worker_count(&self) -> usize {
        let cores = num_cpus::get().max(1);
        let requested = if self.threads == 0 { cores } else { self.threads };
        requested.min(cores).min(MAX_WORKERS)
    }
}

/// How a histogram is turned into colour.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    /// Derive bias and scales from the brightest pixel.
    pub auto_brightness: bool,
    /// Added to every count before scaling; negative values act as a
    /// low-pass noise filter.
    pub bias: i32,
    /// Red channel multiplier.
    pub scale_r: f64,
    /// Green channel multiplier.
    pub scale_g: f64,
    /// Blue channel multiplier.
    pub scale_b: f64,
    /// Rotate the final image 90 degrees clockwise.
    pub rotate: bool,
}

impl Default for Palette {
    // Tuned for the default render, whose brightest pixel is about
    // 5010: (5010 - 230) * 0.09 = 430, * 0.11 = 525, * 0.18 = 860.
    fn default() -> Self {
        Palette {
            auto_brightness: false,
            bias: -230,
            scale_r: 0.09,
            scale_g: 0.11,
            scale_b: 0.18,
            rotate: true,
        }
    }
}
