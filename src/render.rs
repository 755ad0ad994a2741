// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The grid renderer.  Walks every pixel of the image, maps it onto
//! the complex plane, asks the evaluator how fast it escapes, and
//! writes the corresponding color into a flat RGB buffer.
//!
//! Every pixel is independent of every other, so the buffer is cut
//! into bands of rows (see [`schedule`](../schedule/index.html)) and
//! the bands are painted in parallel.

use escape::{escape_time, Real};
use palette::{ColorTable, DirectPalette, Palette};
use viewport::{Sampler, Viewport};

use config::{Coloring, Precision, RenderConfig, Schedule};
use error::RenderError;
use schedule;

/// Bytes per pixel: red, green, blue.
pub const CHANNELS: usize = 3;

/// Renders Mandelbrot images as packed 8-bit RGB, row-major, three
/// bytes per pixel.  Once built, this object is never modified.
#[derive(Debug)]
pub struct MandelbrotRenderer {
    viewport: Viewport,
    config: RenderConfig,
}

impl MandelbrotRenderer {
    /// Checks the configuration and derives the pixel-to-plane map
    /// from it.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        if config.max_iter == 0 {
            return Err(RenderError::NoIterations);
        }
        if config.threads == 0 {
            return Err(RenderError::NoThreads);
        }
        let viewport = Viewport::new(
            config.width,
            config.height,
            config.leftlower,
            config.rightupper,
        )?;
        Ok(MandelbrotRenderer { viewport, config })
    }

    /// The pixel-to-plane map this renderer uses.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The configuration this renderer was built from.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Size of the finished buffer in bytes.
    pub fn buffer_len(&self) -> Result<usize, RenderError> {
        self.viewport
            .width()
            .checked_mul(self.viewport.height())
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(RenderError::TooLarge {
                width: self.config.width,
                height: self.config.height,
            })
    }

    /// Renders the image on the calling thread.  This is the reference
    /// the threaded renders must match byte for byte.
    pub fn render_single(&self) -> Result<Vec<u8>, RenderError> {
        let mut pixels = self.allocate()?;
        match self.config.precision {
            Precision::Double => self.with_palette::<f64>(&mut pixels, 1),
            Precision::Single => self.with_palette::<f32>(&mut pixels, 1),
        }?;
        Ok(pixels)
    }

    /// Renders the image across the configured number of threads and
    /// schedule.  Returns only once every pixel is written.
    pub fn render(&self) -> Result<Vec<u8>, RenderError> {
        let mut pixels = self.allocate()?;
        let threads = self.config.threads;
        match self.config.precision {
            Precision::Double => self.with_palette::<f64>(&mut pixels, threads),
            Precision::Single => self.with_palette::<f32>(&mut pixels, threads),
        }?;
        Ok(pixels)
    }

    fn allocate(&self) -> Result<Vec<u8>, RenderError> {
        let bytes = self.buffer_len()?;
        let mut pixels: Vec<u8> = Vec::new();
        pixels
            .try_reserve_exact(bytes)
            .map_err(|_| RenderError::Allocation { bytes })?;
        pixels.resize(bytes, 0);
        debug!(
            "allocated {} bytes for a {}x{} image",
            bytes, self.config.width, self.config.height
        );
        Ok(pixels)
    }

    // The color table, if any, is built here, before any worker
    // starts, and only ever read afterwards.
    fn with_palette<T: Real>(&self, pixels: &mut [u8], threads: usize) -> Result<(), RenderError> {
        match self.config.coloring {
            Coloring::Table => {
                let table = ColorTable::new(self.config.max_iter);
                self.dispatch::<T, _>(pixels, &table, threads)
            }
            Coloring::Direct => {
                let direct = DirectPalette::new(self.config.max_iter);
                self.dispatch::<T, _>(pixels, &direct, threads)
            }
        }
    }

    fn dispatch<T: Real, P: Palette>(
        &self,
        pixels: &mut [u8],
        palette: &P,
        threads: usize,
    ) -> Result<(), RenderError> {
        let sampler = self.viewport.sampler::<T>();
        let width = self.viewport.width();
        let max_iter = self.config.max_iter;
        let paint = |first_row: usize, band: &mut [u8]| {
            paint_band(&sampler, palette, width, max_iter, first_row, band)
        };

        let row_len = width * CHANNELS;
        if threads <= 1 {
            schedule::run_single(pixels, paint);
            return Ok(());
        }
        match self.config.schedule {
            Schedule::Static => schedule::run_static(pixels, row_len, threads, paint),
            Schedule::Dynamic { rows } => {
                schedule::run_dynamic(pixels, row_len, rows, threads, paint)
            }
        }
    }
}

/// Paints a band of whole rows whose first row is `first_row`.
pub fn paint_band<T: Real, P: Palette>(
    sampler: &Sampler<T>,
    palette: &P,
    width: usize,
    max_iter: usize,
    first_row: usize,
    band: &mut [u8],
) {
    for (offset, row) in band.chunks_mut(width * CHANNELS).enumerate() {
        let y = first_row + offset;
        for (x, pixel) in row.chunks_mut(CHANNELS).enumerate() {
            let iter = escape_time(sampler.point(x, y), max_iter);
            pixel.copy_from_slice(&palette.color(iter).0);
        }
    }
}
