// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs for a single render.  The defaults reproduce the
//! reference picture: a 30720x17280 image of the whole set at 800
//! iterations, in double precision, on every core.

use num::Complex;
use num_cpus;
use std::str::FromStr;

/// Reference image width.
pub const WIDTH: usize = 30_720;
/// Reference image height.
pub const HEIGHT: usize = 17_280;
/// Reference iteration budget.
pub const MAX_ITER: usize = 800;
/// Rows handed out per request under the dynamic schedule.
pub const BAND_ROWS: usize = 16;

/// The working precision of the escape-time loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Precision {
    /// f64 throughout
    Double,
    /// f32 throughout
    Single,
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "f64" | "double" => Ok(Precision::Double),
            "f32" | "single" => Ok(Precision::Single),
            _ => Err(format!("Unknown precision '{}'; expected f64 or f32", s)),
        }
    }
}

/// How rows are divided between the render threads.  Either way,
/// each thread gets exclusive slices of the buffer; this only
/// changes how many and when.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Schedule {
    /// One contiguous band of rows per thread, fixed before any
    /// thread starts.
    Static,
    /// Bands of `rows` rows, handed to whichever thread asks next.
    Dynamic {
        /// Rows per band
        rows: usize,
    },
}

impl FromStr for Schedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Schedule::Static),
            "dynamic" => Ok(Schedule::Dynamic { rows: BAND_ROWS }),
            _ => Err(format!("Unknown schedule '{}'; expected static or dynamic", s)),
        }
    }
}

/// Whether colors come from a precomputed table or are worked out
/// for each pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Coloring {
    /// Build a `ColorTable` once, then look colors up.
    Table,
    /// Evaluate the color polynomials per pixel.
    Direct,
}

/// Everything a render needs to know.  Built once and passed by
/// reference into the renderer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Iteration budget per pixel
    pub max_iter: usize,
    /// Complex coordinate of pixel (0, 0)
    pub leftlower: Complex<f64>,
    /// The far corner of the complex plane
    pub rightupper: Complex<f64>,
    /// Number of render threads
    pub threads: usize,
    /// Working precision of the evaluator
    pub precision: Precision,
    /// How rows are split between threads
    pub schedule: Schedule,
    /// Table lookup or direct coloring
    pub coloring: Coloring,
}

impl RenderConfig {
    /// A configuration for an image of the given size and budget over
    /// the reference viewport, with every other setting at its default.
    pub fn new(width: usize, height: usize, max_iter: usize) -> Self {
        RenderConfig {
            width,
            height,
            max_iter,
            ..RenderConfig::default()
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: WIDTH,
            height: HEIGHT,
            max_iter: MAX_ITER,
            leftlower: Complex::new(-2.5, -1.0),
            rightupper: Complex::new(1.0, 1.0),
            threads: num_cpus::get(),
            precision: Precision::Double,
            schedule: Schedule::Dynamic { rows: BAND_ROWS },
            coloring: Coloring::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_reference_render() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height, config.max_iter), (30_720, 17_280, 800));
        assert_eq!(config.leftlower, Complex::new(-2.5, -1.0));
        assert_eq!(config.rightupper, Complex::new(1.0, 1.0));
        assert!(config.threads >= 1);
    }

    #[test]
    fn small_configs_keep_the_reference_viewport() {
        let config = RenderConfig::new(4, 4, 50);
        assert_eq!((config.width, config.height, config.max_iter), (4, 4, 50));
        assert_eq!(config.leftlower, RenderConfig::default().leftlower);
    }

    #[test]
    fn parses_precision() {
        assert_eq!("f64".parse::<Precision>(), Ok(Precision::Double));
        assert_eq!("single".parse::<Precision>(), Ok(Precision::Single));
        assert!("f16".parse::<Precision>().is_err());
    }

    #[test]
    fn parses_schedule() {
        assert_eq!("static".parse::<Schedule>(), Ok(Schedule::Static));
        assert_eq!(
            "dynamic".parse::<Schedule>(),
            Ok(Schedule::Dynamic { rows: BAND_ROWS })
        );
        assert!("guided".parse::<Schedule>().is_err());
    }
}
