// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Splits an image buffer into bands of whole rows and hands them to
//! a pool of scoped threads.
//!
//! The bands come from `chunks_mut`, so no two threads can ever hold
//! overlapping parts of the buffer, and the borrow checker proves it
//! for us.  Workers never talk to each other; the only thing they
//! share besides their own band is whatever read-only state the
//! painting closure captures.

extern crate crossbeam;

use std::sync::{Arc, Mutex};

use error::RenderError;

/// The rows per band if `rows` are divided as evenly as possible
/// between `threads` workers.  More workers than rows still leaves
/// one row per band.
pub fn rows_per_band(rows: usize, threads: usize) -> usize {
    let threads = threads.max(1).min(rows.max(1));
    (rows / threads + (rows % threads != 0) as usize).max(1)
}

/// Paints the whole buffer on the calling thread, as a single band.
pub fn run_single<F>(pixels: &mut [u8], paint: F)
where
    F: Fn(usize, &mut [u8]),
{
    paint(0, pixels)
}

/// Cuts the buffer into at most `threads` contiguous bands of rows,
/// one per thread, before any thread starts.  `paint` receives the
/// index of the first row in its band and the band itself.
pub fn run_static<F>(
    pixels: &mut [u8],
    row_len: usize,
    threads: usize,
    paint: F,
) -> Result<(), RenderError>
where
    F: Fn(usize, &mut [u8]) + Sync,
{
    let rows = pixels.len() / row_len;
    let band_rows = rows_per_band(rows, threads);
    debug!("static schedule: {} rows in bands of {}", rows, band_rows);

    let paint = &paint;
    crossbeam::scope(|spawner| {
        for (band, region) in pixels.chunks_mut(band_rows * row_len).enumerate() {
            spawner.spawn(move |_| {
                trace!("painting static band {}", band);
                paint(band * band_rows, region)
            });
        }
    })
    .map_err(|_| RenderError::WorkerPanicked)
}

/// Cuts the buffer into bands of `band_rows` rows and lets `threads`
/// workers pull bands from a shared queue until it runs dry.  Slow
/// bands (the ones full of boundary pixels) don't hold up the rest.
pub fn run_dynamic<F>(
    pixels: &mut [u8],
    row_len: usize,
    band_rows: usize,
    threads: usize,
    paint: F,
) -> Result<(), RenderError>
where
    F: Fn(usize, &mut [u8]) + Sync,
{
    // A band never holds more rows than the image, which keeps
    // `band_rows * row_len` within the buffer length.
    let rows = pixels.len() / row_len;
    let band_rows = band_rows.max(1).min(rows.max(1));
    let band_count = rows / band_rows + (rows % band_rows != 0) as usize;
    let threads = threads.max(1).min(band_count.max(1));
    debug!(
        "dynamic schedule: {} bands of {} rows across {} threads",
        band_count, band_rows, threads
    );

    let bands = Arc::new(Mutex::new(pixels.chunks_mut(band_rows * row_len).enumerate()));
    let paint = &paint;
    crossbeam::scope(|spawner| {
        for worker in 0..threads {
            let bands = bands.clone();
            spawner.spawn(move |_| loop {
                // A poisoned queue means another worker panicked; the
                // scope reports that, so just stop.
                let next = match bands.lock() {
                    Ok(mut bands) => bands.next(),
                    Err(_) => None,
                };
                match next {
                    Some((band, region)) => {
                        trace!("worker {} painting band {}", worker, band);
                        paint(band * band_rows, region)
                    }
                    None => {
                        break;
                    }
                }
            });
        }
    })
    .map_err(|_| RenderError::WorkerPanicked)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each byte records the row it belongs to, and the band writes
    // its own first row into every byte so misplaced bands show up.
    fn stamp(first_row: usize, band: &mut [u8]) {
        for (offset, row) in band.chunks_mut(3).enumerate() {
            for byte in row.iter_mut() {
                *byte = *byte + (first_row + offset) as u8 + 1;
            }
        }
    }

    fn expected(rows: usize) -> Vec<u8> {
        (0..rows).flat_map(|r| vec![r as u8 + 1; 3]).collect()
    }

    #[test]
    fn bands_cover_every_row() {
        assert_eq!(rows_per_band(10, 3), 4);
        assert_eq!(rows_per_band(9, 3), 3);
        assert_eq!(rows_per_band(2, 8), 1);
        assert_eq!(rows_per_band(5, 0), 5);
        assert_eq!(rows_per_band(5, usize::max_value()), 1);
        assert_eq!(rows_per_band(usize::max_value(), 2), usize::max_value() / 2 + 1);
    }

    #[test]
    fn more_threads_than_rows() {
        let mut pixels = vec![0_u8; 3 * 5];
        run_static(&mut pixels, 3, usize::max_value(), stamp).unwrap();
        assert_eq!(pixels, expected(5));
    }

    #[test]
    fn bands_larger_than_the_image() {
        for &band_rows in &[14, 1 << 20, 1 << 60, usize::max_value()] {
            let mut pixels = vec![0_u8; 3 * 13];
            run_dynamic(&mut pixels, 3, band_rows, 2, stamp).unwrap();
            assert_eq!(pixels, expected(13), "rows {}", band_rows);
        }
        // Wide rows, where an unchecked band size would wrap.
        let mut pixels = vec![0_u8; 48 * 9];
        run_dynamic(&mut pixels, 48, 1 << 60, 3, |first_row, band| {
            assert_eq!(first_row, 0);
            for byte in band.iter_mut() {
                *byte += 1;
            }
        })
        .unwrap();
        assert!(pixels.iter().all(|&b| b == 1));
    }

    #[test]
    fn static_schedule_writes_each_row_once() {
        for threads in 1..8 {
            let mut pixels = vec![0_u8; 3 * 11];
            run_static(&mut pixels, 3, threads, stamp).unwrap();
            assert_eq!(pixels, expected(11), "threads {}", threads);
        }
    }

    #[test]
    fn dynamic_schedule_writes_each_row_once() {
        for threads in 1..5 {
            for band_rows in 1..6 {
                let mut pixels = vec![0_u8; 3 * 13];
                run_dynamic(&mut pixels, 3, band_rows, threads, stamp).unwrap();
                assert_eq!(pixels, expected(13), "threads {} rows {}", threads, band_rows);
            }
        }
    }

    #[test]
    fn single_matches_the_schedulers() {
        let mut pixels = vec![0_u8; 3 * 7];
        run_single(&mut pixels, stamp);
        assert_eq!(pixels, expected(7));
    }

    #[test]
    fn panicking_worker_is_reported() {
        let mut pixels = vec![0_u8; 3 * 4];
        let result = run_dynamic(&mut pixels, 3, 1, 2, |first_row, _| {
            if first_row == 2 {
                panic!("boom");
            }
        });
        match result {
            Err(RenderError::WorkerPanicked) => (),
            other => panic!("expected WorkerPanicked, got {:?}", other),
        }
    }
}
