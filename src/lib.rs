#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Buddhabrot renderer
//!
//! The Buddhabrot is a variant of the Mandelbrot set.  The Mandelbrot
//! takes a point `c` on the complex plane, repeatedly squares `z` and
//! adds `c`, and colours `c` by how quickly `z` runs off to infinity.
//! The Buddhabrot instead looks at the path `z` takes on its way out:
//! every intermediate `z` is itself a point on the complex plane, so
//! by mapping it to the nearest pixel and incrementing that pixel, we
//! get a density map of where escaping orbits spend their time.
//!
//! The work is a scatter/gather.  A sample grid, usually several times
//! finer than the image, is split between a fixed pool of workers,
//! each of which plots into its own private histogram.  After all of
//! them are joined the histograms are summed, and the sum is turned
//! into colour:
//!
//! ```no_run
//! use buddhabrot::{compute_histogram, render_image, Config, Palette};
//!
//! let histogram = compute_histogram(&Config::default())?;
//! let image = render_image(&histogram, &Palette::default())?;
//! buddhabrot::output::write_bmp("buddhabrot.bmp", &image)?;
//! # Ok::<(), buddhabrot::RenderError>(())
//! ```
//!
//! Given the same configuration the histogram is identical from run to
//! run and does not depend on how many workers computed it.

pub mod config;
pub mod engine;
pub mod error;
pub mod orbit;
pub mod output;
pub mod palette;
pub mod planes;
pub mod raster;

pub use crate::config::{parse_complex, parse_pair, Config, Palette, WorldWindow, MAX_WORKERS};
pub use crate::engine::{compute_histogram, compute_histogram_with_progress, Engine, Progress};
pub use crate::error::RenderError;
pub use crate::palette::{render_image, Brightness};
pub use crate::raster::{Histogram, Raster, RgbImage};
