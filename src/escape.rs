// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! Takes a point on the complex plane and repeatedly squares it and
//! adds the original point back, counting how many rounds it takes
//! for the result to leave the circle of radius 2.  Points that never
//! leave within the budget are presumed to be in the set.
//!
//! Most of the expensive points are in the two big black blobs in the
//! middle of the set, the main cardioid and the period-2 bulb to its
//! left, and both of those have closed-form membership tests.  We run
//! those first and skip the loop entirely when they hit.

use num::{Complex, Float};

/// The floating-point types we know how to render in.  The choice is
/// made once per render; it changes which pixels right on the edge of
/// the set are counted as escaping, and nothing else.
pub trait Real: Float + Send + Sync {
    /// Narrow (or pass through) a double into this precision.
    fn lossy_from(v: f64) -> Self;
}

impl Real for f64 {
    #[inline]
    fn lossy_from(v: f64) -> Self {
        v
    }
}

impl Real for f32 {
    #[inline]
    fn lossy_from(v: f64) -> Self {
        v as f32
    }
}

/// Squared escape radius.
pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// True if the point lies inside the main cardioid.  With
/// q = (re - 1/4)^2 + im^2, the point is inside when
/// q * (q + (re - 1/4)) <= im^2 / 4.
#[inline]
pub fn in_main_cardioid<T: Real>(point: Complex<T>) -> bool {
    let quarter = T::lossy_from(D4);
    let x = point.re - quarter;
    let y = point.im * point.im;
    let q = x * x + y;
    q * (q + x) <= quarter * y
}

/// True if the point lies inside the period-2 bulb, the disc of radius
/// 1/4 centered on -1.
#[inline]
pub fn in_period2_bulb<T: Real>(point: Complex<T>) -> bool {
    let x = point.re + T::one();
    x * x + point.im * point.im <= T::lossy_from(D16)
}

/// Returns the number of rounds of z <- z^2 + c, starting from zero,
/// that it takes for |z|^2 to exceed 4, or `max_iter` if it never
/// does.  Points inside the cardioid or the bulb return `max_iter`
/// without iterating.
///
/// A point that is already outside the radius escapes after one
/// round, since z starts at zero.
pub fn escape_time<T: Real>(point: Complex<T>, max_iter: usize) -> usize {
    if in_main_cardioid(point) || in_period2_bulb(point) {
        return max_iter;
    }

    let radius = T::lossy_from(ESCAPE_RADIUS_SQUARED);
    let mut z = Complex::new(T::zero(), T::zero());
    let mut iter = 0;
    while iter < max_iter && z.norm_sqr() <= radius {
        z = z * z + point;
        iter += 1;
    }
    iter
}
