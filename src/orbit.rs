//! Iteration of the quadratic map `z <- z^2 + c`.
//!
//! A sample is iterated twice: once by `classify`, to learn whether it
//! escapes at all, and, only if it does, again by `plot`, which
//! replays the orbit and counts every step that lands in the image.
//! Both start at `z = 0` and stop at the first `z` with `|z|^2 > 4`,
//! so `plot` visits exactly the `depth` points `z_1 .. z_depth` of a
//! sample that `classify` reported as escaping at `depth`; the
//! escaping value itself is never counted.

use crate::planes::PlaneMapper;
use num::Complex;

/// Squared radius beyond which an orbit is known to diverge.
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// Iterate from `c` for at most `max_depth` steps.  Returns the
/// zero-based step at which the orbit escaped, or `None` if it stayed
/// bounded throughout.
#[inline]
pub fn classify(c: Complex<f64>, max_depth: usize) -> Option<usize> {
    let mut z = Complex::new(0.0, 0.0);
    for depth in 0..max_depth {
        z = z * z + c;
        if z.norm_sqr() > ESCAPE_RADIUS_SQR {
            return Some(depth);
        }
    }
    None
}

/// Replay the orbit of `c`, incrementing the pixel in `pixels` under
/// every step that falls inside the image.  Counters saturate rather
/// than wrap.
#[inline]
pub fn plot(plane: &PlaneMapper, pixels: &mut [u16], c: Complex<f64>, max_depth: usize) {
    let mut z = Complex::new(0.0, 0.0);
    for _ in 0..max_depth {
        z = z * z + c;
        if z.norm_sqr() > ESCAPE_RADIUS_SQR {
            break;
        }
        if let Some(offset) = plane.point_to_offset(&z) {
            pixels[offset] = pixels[offset].saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldWindow;

    fn square(half: f64) -> WorldWindow {
        WorldWindow {
            min_x: -half,
            max_x: half,
            min_y: -half,
            max_y: half,
        }
    }

    #[test]
    fn origin_never_escapes() {
        assert_eq!(classify(Complex::new(0.0, 0.0), 10_000), None);
        assert_eq!(classify(Complex::new(-1.0, 0.0), 10_000), None);
    }

    #[test]
    fn far_points_escape_immediately() {
        assert_eq!(classify(Complex::new(3.0, 0.0), 10), Some(0));
    }

    #[test]
    fn escape_depth_is_counted_from_zero() {
        // c = 1: z = 1, 2, 5; |5|^2 > 4 on the third step.
        assert_eq!(classify(Complex::new(1.0, 0.0), 10), Some(2));
        assert_eq!(classify(Complex::new(1.0, 0.0), 2), None);
        assert_eq!(classify(Complex::new(1.0, 0.0), 3), Some(2));
    }

    #[test]
    fn escape_depth_does_not_depend_on_the_bound() {
        let c = Complex::new(0.5, 0.5);
        let depth = classify(c, 100).unwrap();
        assert_eq!(depth, 4);
        for bound in depth + 1..depth + 50 {
            assert_eq!(classify(c, bound), Some(depth));
        }
    }

    #[test]
    fn zero_depth_classifies_nothing() {
        assert_eq!(classify(Complex::new(3.0, 0.0), 0), None);
    }

    #[test]
    fn plot_counts_the_bounded_part_of_the_orbit() {
        // c = 1 visits 1 and 2 before escaping at 5.
        let plane = PlaneMapper::new(9, 9, &square(4.0));
        let mut pixels = vec![0u16; plane.len()];
        plot(&plane, &mut pixels, Complex::new(1.0, 0.0), 100);
        let one = plane.point_to_offset(&Complex::new(1.0, 0.0)).unwrap();
        let two = plane.point_to_offset(&Complex::new(2.0, 0.0)).unwrap();
        assert_eq!(pixels[one], 1);
        assert_eq!(pixels[two], 1);
        assert_eq!(pixels.iter().map(|&p| u32::from(p)).sum::<u32>(), 2);
    }

    #[test]
    fn plot_stops_at_max_depth() {
        // The origin is a fixed point: every step lands on the centre.
        let plane = PlaneMapper::new(9, 9, &square(4.0));
        let mut pixels = vec![0u16; plane.len()];
        plot(&plane, &mut pixels, Complex::new(0.0, 0.0), 7);
        let centre = plane.point_to_offset(&Complex::new(0.0, 0.0)).unwrap();
        assert_eq!(pixels[centre], 7);
    }

    #[test]
    fn plot_saturates_instead_of_wrapping() {
        let plane = PlaneMapper::new(9, 9, &square(4.0));
        let mut pixels = vec![0u16; plane.len()];
        let centre = plane.point_to_offset(&Complex::new(0.0, 0.0)).unwrap();
        pixels[centre] = u16::max_value() - 2;
        plot(&plane, &mut pixels, Complex::new(0.0, 0.0), 10);
        assert_eq!(pixels[centre], u16::max_value());
    }
}
