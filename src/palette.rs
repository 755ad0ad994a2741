// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns escape counts into colors.
//!
//! The mapping is a fixed set of Bernstein-style polynomials in
//! t = iter / max_iter: red peaks late, green in the middle, blue
//! early, and everything that never escaped is black.  It can be
//! evaluated per pixel, or once per iteration count into a
//! [`ColorTable`] that the render workers share read-only.

use image::Rgb;
use num::clamp;

/// The color of points presumed to be in the set.
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

#[inline]
fn channel(v: f64) -> u8 {
    clamp(v * 255.0, 0.0, 255.0) as u8
}

/// The color for a point that took `iter` rounds to escape out of a
/// budget of `max_iter`.
pub fn color_for(iter: usize, max_iter: usize) -> Rgb<u8> {
    if iter >= max_iter {
        return BLACK;
    }
    let t = iter as f64 / max_iter as f64;
    let u = 1.0 - t;
    Rgb([
        channel(9.0 * u * t * t * t),
        channel(15.0 * u * u * t * t),
        channel(8.5 * u * u * u * t),
    ])
}

/// Anything that can color an escape count.  Palettes are consulted
/// from every render worker at once, so they must be `Sync`.
pub trait Palette: Sync {
    /// The color for a point that escaped after `iter` rounds.
    fn color(&self, iter: usize) -> Rgb<u8>;
}

/// Evaluates the polynomials for every pixel.
#[derive(Copy, Clone, Debug)]
pub struct DirectPalette {
    max_iter: usize,
}

impl DirectPalette {
    /// A palette for renders with the given iteration budget.
    pub fn new(max_iter: usize) -> Self {
        DirectPalette { max_iter }
    }
}

impl Palette for DirectPalette {
    #[inline]
    fn color(&self, iter: usize) -> Rgb<u8> {
        color_for(iter, self.max_iter)
    }
}

/// Every color a render with a given budget can produce, indexed by
/// escape count.  There are only `max_iter + 1` of them, against tens
/// of millions of pixels.
#[derive(Clone, Debug)]
pub struct ColorTable {
    colors: Vec<Rgb<u8>>,
}

impl ColorTable {
    /// Builds the table for iteration counts `0..=max_iter`.
    pub fn new(max_iter: usize) -> Self {
        ColorTable {
            colors: (0..=max_iter).map(|iter| color_for(iter, max_iter)).collect(),
        }
    }

    /// The number of entries, always `max_iter + 1`.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Never true; a table covers at least the zero count.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Palette for ColorTable {
    #[inline]
    fn color(&self, iter: usize) -> Rgb<u8> {
        match self.colors.get(iter) {
            Some(color) => *color,
            None => BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_budget_is_black() {
        for max_iter in &[1, 2, 50, 800, 100_000] {
            assert_eq!(color_for(*max_iter, *max_iter), BLACK);
            assert_eq!(ColorTable::new(*max_iter).color(*max_iter), BLACK);
        }
    }

    #[test]
    fn zero_iterations_is_also_black() {
        // t = 0 zeroes every polynomial.
        assert_eq!(color_for(0, 800), BLACK);
    }

    #[test]
    fn known_colors() {
        // t = 0.02
        assert_eq!(color_for(1, 50), Rgb([0, 1, 40]));
        // t = 0.5: 9/16, 15/16, 8.5/16 of 255
        assert_eq!(color_for(400, 800), Rgb([143, 239, 135]));
    }

    #[test]
    fn table_matches_direct_mapping() {
        for max_iter in &[1, 7, 50, 800] {
            let table = ColorTable::new(*max_iter);
            let direct = DirectPalette::new(*max_iter);
            assert_eq!(table.len(), max_iter + 1);
            for iter in 0..=*max_iter {
                assert_eq!(table.color(iter), direct.color(iter), "iter {}", iter);
            }
        }
    }

    #[test]
    fn red_channel_truncates_toward_zero() {
        let max_iter = 10_000;
        for iter in 0..max_iter {
            let t = iter as f64 / max_iter as f64;
            let Rgb([r, _, _]) = color_for(iter, max_iter);
            assert_eq!(r, (9.0 * (1.0 - t) * t * t * t * 255.0) as u8);
        }
    }
}
