// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The scatter/gather histogram engine.
//!
//! The sample grid is cut into one contiguous run of indices per
//! worker.  Each worker owns a private, image-sized `ThreadBuffer` for
//! the whole scatter phase and plots every escaping orbit of its run
//! into that buffer alone, so no pixel is ever shared between threads
//! and no lock or atomic is needed however hot a pixel gets.  Once
//! every worker has been joined the buffers are summed, in worker
//! order, into the final histogram.
//!
//! The phases are expressed as types: an `Engine` has its buffers
//! allocated, `Engine::scatter` consumes it and returns a `Scattered`
//! only after the join barrier, and `Scattered::gather` produces the
//! `Histogram`.  No phase can be repeated on the same buffers.

use crate::config::{Config, MAX_WORKERS};
use crate::error::RenderError;
use crate::orbit::{classify, plot};
use crate::planes::{PlaneMapper, SampleGrid};
use crate::raster::{allocate, Histogram, Raster};
use log::{debug, info, warn};
use std::ops::Range;

/// How often, in samples, the reporting worker calls back.
pub const PROGRESS_INTERVAL: usize = 1 << 20;

/// A snapshot of the reporting worker's position in its own run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Progress {
    /// Samples finished so far.
    pub done: usize,
    /// Samples in the run.
    pub total: usize,
}

impl Progress {
    /// Completion as a percentage.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            100.0 * (self.done as f64) / (self.total as f64)
        }
    }
}

/// Split `0..total` into `workers` contiguous runs whose lengths
/// differ by at most one.
pub fn partition(total: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let (base, extra) = (total / workers, total % workers);
    let mut start = 0;
    (0..workers)
        .map(|worker| {
            let len = base + if worker < extra { 1 } else { 0 };
            let run = start..start + len;
            start += len;
            run
        })
        .collect()
}

/// One worker's run of sample indices and the histogram it plots
/// them into.
#[derive(Debug)]
pub struct ThreadBuffer {
    worker: usize,
    run: Range<usize>,
    pixels: Vec<u16>,
}

impl ThreadBuffer {
    fn new(worker: usize, run: Range<usize>, len: usize) -> Result<Self, RenderError> {
        Ok(ThreadBuffer {
            worker,
            run,
            pixels: allocate(len, 0u16)?,
        })
    }

    /// Index of the owning worker.
    pub fn worker(&self) -> usize {
        self.worker
    }

    /// The sample indices this buffer is responsible for.
    pub fn run(&self) -> Range<usize> {
        self.run.clone()
    }

    /// The accumulated counts, row by row.
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// The sum of every count in this buffer.
    pub fn total(&self) -> u64 {
        self.pixels.iter().map(|&p| u64::from(p)).sum()
    }

    // Worker 0 alone reports, so progress output never interleaves.
    fn scatter(
        &mut self,
        grid: &SampleGrid,
        plane: &PlaneMapper,
        max_depth: usize,
        progress: &(dyn Fn(Progress) + Sync),
    ) {
        let reporting = self.worker == 0;
        let total = self.run.len();
        for (done, index) in self.run.clone().enumerate() {
            if reporting && done % PROGRESS_INTERVAL == 0 {
                progress(Progress { done, total });
            }
            let c = grid.sample(index);
            if classify(c, max_depth).is_some() {
                plot(plane, &mut self.pixels, c, max_depth);
            }
        }
        if reporting {
            progress(Progress { done: total, total });
        }
    }
}

/// A render with its configuration fixed and its per-worker buffers
/// allocated, ready to scatter.
#[derive(Debug)]
pub struct Engine {
    config: Config,
    grid: SampleGrid,
    plane: PlaneMapper,
    buffers: Vec<ThreadBuffer>,
}

impl Engine {
    /// An engine using as many workers as `config` asks for and the
    /// machine allows.
    pub fn new(config: &Config) -> Result<Engine, RenderError> {
        Engine::with_workers(config, config.worker_count())
    }

    /// An engine with exactly `workers` workers (at least one, at most
    /// `MAX_WORKERS`), whatever the hardware.
    pub fn with_workers(config: &Config, workers: usize) -> Result<Engine, RenderError> {
        let config = config.sanitized();
        let too_large = || RenderError::Allocation {
            bytes: usize::max_value(),
        };
        config.pixel_count().ok_or_else(too_large)?;
        config.sample_count().ok_or_else(too_large)?;
        let workers = workers.max(1).min(MAX_WORKERS);
        let grid = SampleGrid::from_config(&config);
        let plane = PlaneMapper::from_config(&config);
        debug!(
            "sample grid {}x{} ({} samples) over {} workers",
            config.columns(),
            config.rows(),
            grid.len(),
            workers
        );
        let buffers = partition(grid.len(), workers)
            .into_iter()
            .enumerate()
            .map(|(worker, run)| ThreadBuffer::new(worker, run, plane.len()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Engine {
            config,
            grid,
            plane,
            buffers,
        })
    }

    /// The configuration actually in use, after clamping.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The number of workers the scatter will spawn.
    pub fn workers(&self) -> usize {
        self.buffers.len()
    }

    /// The number of samples in the grid.
    pub fn samples(&self) -> usize {
        self.grid.len()
    }

    /// Run every worker over its run and wait for all of them.  Each
    /// worker borrows only its own buffer; the grid and the plane are
    /// shared read-only.
    pub fn scatter(
        mut self,
        progress: &(dyn Fn(Progress) + Sync),
    ) -> Result<Scattered, RenderError> {
        let grid = &self.grid;
        let plane = &self.plane;
        let max_depth = self.config.max_depth;
        let buffers = &mut self.buffers;

        let joined = crossbeam::scope(|spawner| {
            let handles: Vec<_> = buffers
                .iter_mut()
                .map(|buffer| {
                    spawner.spawn(move |_| buffer.scatter(grid, plane, max_depth, progress))
                })
                .collect();
            let mut panicked = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(worker);
                }
            }
            panicked
        });

        match joined {
            Ok(None) => (),
            Ok(Some(worker)) => return Err(RenderError::WorkerPanicked { worker }),
            Err(_) => return Err(RenderError::WorkerPanicked { worker: 0 }),
        }

        Ok(Scattered {
            width: self.config.width,
            height: self.config.height,
            buffers: self.buffers,
        })
    }
}

/// The per-worker buffers after every worker has finished.
#[derive(Debug)]
pub struct Scattered {
    width: usize,
    height: usize,
    buffers: Vec<ThreadBuffer>,
}

impl Scattered {
    /// The per-worker buffers, in worker order.
    pub fn buffers(&self) -> &[ThreadBuffer] {
        &self.buffers
    }

    /// Sum the buffers into the final histogram.
    pub fn gather(&self) -> Result<Histogram, RenderError> {
        let histogram = reduce(self.width, self.height, &self.buffers)?;
        let saturated = histogram.saturated();
        if saturated > 0 {
            warn!(
                "{} pixels reached the {} count limit and were clipped",
                saturated,
                u16::max_value()
            );
        }
        info!(
            "gathered {} buffers, {} visits, max brightness {}",
            self.buffers.len(),
            histogram.total(),
            histogram.max_value()
        );
        Ok(histogram)
    }
}

/// Element-wise sum of `buffers` into a fresh `width` x `height`
/// histogram.  Saturating, so the result does not depend on how the
/// counts were split between buffers.
pub fn reduce(
    width: usize,
    height: usize,
    buffers: &[ThreadBuffer],
) -> Result<Histogram, RenderError> {
    let mut histogram: Histogram = Raster::filled(width, height, 0)?;
    for buffer in buffers {
        for (sum, &count) in histogram.pixels_mut().iter_mut().zip(buffer.pixels.iter()) {
            *sum = sum.saturating_add(count);
        }
    }
    Ok(histogram)
}

/// Scatter and gather a whole render, silently.
pub fn compute_histogram(config: &Config) -> Result<Histogram, RenderError> {
    compute_histogram_with_progress(config, &|_| ())
}

/// Scatter and gather a whole render, calling `progress` from worker
/// 0 every `PROGRESS_INTERVAL` samples.
pub fn compute_histogram_with_progress(
    config: &Config,
    progress: &(dyn Fn(Progress) + Sync),
) -> Result<Histogram, RenderError> {
    Engine::new(config)?.scatter(progress)?.gather()
}
