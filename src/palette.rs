//! Turning visit counts into colour.
//!
//! The same count drives all three channels; only the multipliers
//! differ, so each channel saturates at a different brightness and the
//! image picks up the familiar blue-white-orange Buddhabrot tint.

use crate::config::Palette;
use crate::error::RenderError;
use crate::raster::{Histogram, RgbImage};
use log::info;
use num::clamp;

// Auto brightness: the fraction of the brightest count treated as
// noise, and each channel's output at the brightest count.
const AUTO_BIAS: f64 = -0.045;
const AUTO_RED: f64 = 430.0;
const AUTO_GREEN: f64 = 525.0;
const AUTO_BLUE: f64 = 860.0;

/// The constants that map a count to a colour: `channel =
/// (count + bias) * scale`, rounded and clamped to a byte.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Brightness {
    /// The brightest count in the histogram.
    pub max: u16,
    /// Added to every count before scaling.
    pub bias: i32,
    /// Red multiplier.
    pub scale_r: f64,
    /// Green multiplier.
    pub scale_g: f64,
    /// Blue multiplier.
    pub scale_b: f64,
}

impl Brightness {
    /// Measure `histogram` and pick the constants: the palette's own
    /// when it is fixed, or ones derived from the brightest count when
    /// it asks for auto brightness.  An all-black histogram yields
    /// zero scales rather than a division by zero.
    pub fn normalize(histogram: &Histogram, palette: &Palette) -> Brightness {
        let max = histogram.max_value();
        if !palette.auto_brightness {
            return Brightness {
                max,
                bias: palette.bias,
                scale_r: palette.scale_r,
                scale_g: palette.scale_g,
                scale_b: palette.scale_b,
            };
        }
        if max == 0 {
            return Brightness {
                max,
                bias: 0,
                scale_r: 0.0,
                scale_g: 0.0,
                scale_b: 0.0,
            };
        }
        let brightest = f64::from(max);
        Brightness {
            max,
            bias: (AUTO_BIAS * brightest).round() as i32,
            scale_r: AUTO_RED / brightest,
            scale_g: AUTO_GREEN / brightest,
            scale_b: AUTO_BLUE / brightest,
        }
    }

    /// The colour of a single count.
    #[inline]
    pub fn color(&self, count: u16) -> [u8; 3] {
        let biased = f64::from(i32::from(count).saturating_add(self.bias));
        let channel = |scale: f64| clamp((biased * scale).round(), 0.0, 255.0) as u8;
        [
            channel(self.scale_r),
            channel(self.scale_g),
            channel(self.scale_b),
        ]
    }
}

/// Colour every pixel of `histogram`.
pub fn colorize(histogram: &Histogram, brightness: &Brightness) -> Result<RgbImage, RenderError> {
    let mut image = RgbImage::filled(histogram.width(), histogram.height(), [0; 3])?;
    for (rgb, &count) in image.pixels_mut().iter_mut().zip(histogram.pixels()) {
        *rgb = brightness.color(count);
    }
    Ok(image)
}

/// Normalize, colour and optionally rotate a histogram into the final
/// image.
pub fn render_image(histogram: &Histogram, palette: &Palette) -> Result<RgbImage, RenderError> {
    let brightness = Brightness::normalize(histogram, palette);
    info!(
        "max brightness {}, bias {}, scales {:.6}/{:.6}/{:.6}",
        brightness.max, brightness.bias, brightness.scale_r, brightness.scale_g, brightness.scale_b
    );
    let image = colorize(histogram, &brightness)?;
    if palette.rotate {
        image.rotate_right()
    } else {
        Ok(image)
    }
}
