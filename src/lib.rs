#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which repeatedly squaring z and adding c back, starting from zero,
//! never sends z off to infinity.  Points outside the set do escape,
//! and how many rounds that takes, the "escape time", is what we turn
//! into color.  Points still bounded when the budget runs out are
//! drawn black.
//!
//! This crate renders very large images of the whole set: the
//! reference picture is 30720x17280 pixels at 800 iterations.  Every
//! pixel is independent of every other, so the image buffer is cut
//! into disjoint bands of rows and painted on all cores at once.
//!
//! ```no_run
//! use mandelbrot::{write_image, MandelbrotRenderer, RenderConfig};
//!
//! let config = RenderConfig::new(1920, 1080, 800);
//! let renderer = MandelbrotRenderer::new(config).unwrap();
//! let pixels = renderer.render().unwrap();
//! write_image("mandelbrot.jpg", &pixels, (1920, 1080), 90).unwrap();
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod config;
pub mod error;
pub mod escape;
pub mod output;
pub mod palette;
pub mod render;
pub mod schedule;
pub mod viewport;

pub use config::{Coloring, Precision, RenderConfig, Schedule};
pub use error::RenderError;
pub use escape::{escape_time, in_main_cardioid, in_period2_bulb, Real};
pub use output::{write_image, OutputFormat};
pub use palette::{color_for, ColorTable, DirectPalette, Palette};
pub use render::MandelbrotRenderer;
pub use viewport::{Pixel, Viewport};
