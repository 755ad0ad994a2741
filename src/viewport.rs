// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane with an arbitrary pair of
//! corners defining the leftlower and rightupper corners of the
//! complex plane.  Pixel (0, 0) is the leftlower corner.
use escape::Real;
use num::Complex;

use error::RenderError;

/// Describes the x, y of a pixel in the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian
/// plane, and a complex cartesian plane.  Maps points from one to the
/// other.  Once built it is never modified, and every render worker
/// reads it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    width: usize,
    height: usize,
    leftlower: Complex<f64>,
    rightupper: Complex<f64>,
    // The size of one pixel on the complex plane, real and imaginary.
    scale: (f64, f64),
}

impl Viewport {
    /// Takes the pixel dimensions of the image and the two corners of
    /// the complex plane it covers.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<Viewport, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }

        if !(rightupper.re > leftlower.re && rightupper.im > leftlower.im) {
            return Err(RenderError::InvertedPlane);
        }

        let scale = (
            (rightupper.re - leftlower.re) / (width as f64),
            (rightupper.im - leftlower.im) / (height as f64),
        );

        Ok(Viewport {
            width,
            height,
            leftlower,
            rightupper,
            scale,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The corner that pixel (0, 0) maps to.
    pub fn leftlower(&self) -> Complex<f64> {
        self.leftlower
    }

    /// The far corner of the complex plane.
    pub fn rightupper(&self) -> Complex<f64> {
        self.rightupper
    }

    /// The width and height of one pixel on the complex plane.
    pub fn scale(&self) -> (f64, f64) {
        self.scale
    }

    /// The real and imaginary spans of the complex plane.
    pub fn span(&self) -> (f64, f64) {
        (
            self.rightupper.re - self.leftlower.re,
            self.rightupper.im - self.leftlower.im,
        )
    }

    /// Converts the origin and scale into the working precision of a
    /// render, once, so the per-pixel map is a multiply and an add.
    pub fn sampler<T: Real>(&self) -> Sampler<T> {
        Sampler {
            origin: Complex::new(
                T::lossy_from(self.leftlower.re),
                T::lossy_from(self.leftlower.im),
            ),
            scale: Complex::new(T::lossy_from(self.scale.0), T::lossy_from(self.scale.1)),
        }
    }

    /// Given a pixel on the integral cartesian plane, map that to a
    /// point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        self.sampler::<f64>().point(pixel.0, pixel.1)
    }
}

/// The affine map from pixel indices to the complex plane, in a
/// chosen precision.
#[derive(Copy, Clone, Debug)]
pub struct Sampler<T: Real> {
    origin: Complex<T>,
    scale: Complex<T>,
}

impl<T: Real> Sampler<T> {
    /// The point sampled for the pixel at column `x`, row `y`.
    #[inline]
    pub fn point(&self, x: usize, y: usize) -> Complex<T> {
        Complex::new(
            T::lossy_from(x as f64) * self.scale.re + self.origin.re,
            T::lossy_from(y as f64) * self.scale.im + self.origin.im,
        )
    }
}
