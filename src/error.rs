//! The failure modes of a render.  Escaping or not escaping is never
//! an error; those are ordinary return values of the classifier.

use failure::Fail;
use std::io;

/// Everything that can stop a render, or the reading and writing of
/// its results, from completing.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A histogram or image buffer could not be reserved.
    #[fail(display = "could not allocate {} bytes for a pixel buffer", bytes)]
    Allocation {
        /// The size of the failed request.
        bytes: usize,
    },

    /// A scatter worker panicked before reaching the join barrier.
    #[fail(display = "worker {} panicked during scatter", worker)]
    WorkerPanicked {
        /// Index of the worker in the pool.
        worker: usize,
    },

    /// A RAW dump does not hold width * height 16-bit samples.
    #[fail(display = "raw dump holds {} bytes, expected {}", found, expected)]
    RawSize {
        /// Bytes implied by the requested dimensions.
        expected: usize,
        /// Bytes actually present.
        found: usize,
    },

    /// The dimensions could not be read out of a RAW file name.
    #[fail(display = "cannot find WIDTHxHEIGHT_DEPTH in file name {:?}", _0)]
    BadFileName(String),

    /// Reading or writing an image failed.
    #[fail(display = "i/o failure: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failure_names_the_request() {
        let err = RenderError::Allocation { bytes: 1024 };
        assert_eq!(
            format!("{}", err),
            "could not allocate 1024 bytes for a pixel buffer"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: RenderError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        match err {
            RenderError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
