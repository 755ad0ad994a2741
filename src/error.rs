// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong between asking for a picture and
//! having one on disk.  The arithmetic itself cannot fail; these are
//! all about shapes, memory, threads, and files.

use std::io;

/// The error type for the whole crate.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// One of the image dimensions is zero.
    #[fail(display = "Image must be at least 1x1, got {}x{}", width, height)]
    EmptyImage {
        /// Requested width in pixels
        width: usize,
        /// Requested height in pixels
        height: usize,
    },

    /// The corners of the complex plane are the wrong way around.
    #[fail(display = "The left lower corner must be left of and below the right upper corner")]
    InvertedPlane,

    /// An iteration budget of zero makes every pixel black.
    #[fail(display = "The iteration budget must be at least 1")]
    NoIterations,

    /// A render needs at least one worker.
    #[fail(display = "At least one thread is required")]
    NoThreads,

    /// The image is too big to address, either in memory or in the
    /// encoder's 32-bit dimensions.
    #[fail(display = "An image of {}x{} is too large", width, height)]
    TooLarge {
        /// Requested width in pixels
        width: usize,
        /// Requested height in pixels
        height: usize,
    },

    /// The pixel buffer could not be allocated.
    #[fail(display = "Could not allocate {} bytes for the image buffer", bytes)]
    Allocation {
        /// Size of the failed reservation
        bytes: usize,
    },

    /// A render worker panicked; the buffer is incomplete.
    #[fail(display = "A render worker panicked")]
    WorkerPanicked,

    /// The encoder was handed a buffer that does not match its
    /// dimensions.
    #[fail(display = "Expected {} bytes of pixel data, got {}", expected, actual)]
    BufferSize {
        /// width * height * 3
        expected: usize,
        /// What we were actually given
        actual: usize,
    },

    /// The output file has an extension we do not know how to encode.
    #[fail(display = "Don't know how to write '{}'; use .jpg, .png or .ppm", path)]
    UnsupportedFormat {
        /// The offending path
        path: String,
    },

    /// Writing the output file failed.
    #[fail(display = "Could not write '{}': {}", path, cause)]
    Write {
        /// The file being written
        path: String,
        /// The underlying I/O failure
        #[cause]
        cause: io::Error,
    },
}
