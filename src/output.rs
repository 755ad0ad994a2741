// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a finished RGB buffer to disk.  The format follows the file
//! extension; the encoding itself is the `image` crate's business.

use image::jpeg::JPEGEncoder;
use image::png::PNGEncoder;
use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;
use std::convert::TryFrom;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use error::RenderError;
use render::CHANNELS;

/// JPEG quality used when the caller doesn't pick one.
pub const DEFAULT_QUALITY: u8 = 90;

/// The file formats we can write.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// Lossy, small; the reference output.
    Jpeg,
    /// Lossless, compressed.
    Png,
    /// Lossless, uncompressed binary pixmap (P6).
    Ppm,
}

impl OutputFormat {
    /// Picks a format from a file's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<OutputFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "ppm" | "pnm" => Some(OutputFormat::Ppm),
            _ => None,
        }
    }
}

fn encode<W: Write>(
    output: &mut W,
    format: OutputFormat,
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<(), io::Error> {
    let color = ColorType::RGB(8);
    match format {
        OutputFormat::Jpeg => {
            JPEGEncoder::new_with_quality(output, quality).encode(pixels, width, height, color)
        }
        OutputFormat::Png => PNGEncoder::new(output).encode(pixels, width, height, color),
        OutputFormat::Ppm => PNMEncoder::new(output)
            .with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary))
            .encode(pixels, width, height, color),
    }
}

/// Writes `pixels`, a packed row-major RGB buffer of `bounds.0` by
/// `bounds.1` pixels, to `outfile`.  `quality` only matters for JPEG.
/// Failures are reported, not retried.
pub fn write_image<P: AsRef<Path>>(
    outfile: P,
    pixels: &[u8],
    bounds: (usize, usize),
    quality: u8,
) -> Result<(), RenderError> {
    let path = outfile.as_ref();
    let display = path.display().to_string();
    let format = OutputFormat::from_path(path).ok_or_else(|| RenderError::UnsupportedFormat {
        path: display.clone(),
    })?;

    let too_large = RenderError::TooLarge {
        width: bounds.0,
        height: bounds.1,
    };
    let expected = match bounds.0.checked_mul(bounds.1).and_then(|n| n.checked_mul(CHANNELS)) {
        Some(expected) => expected,
        None => return Err(too_large),
    };
    if pixels.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: pixels.len(),
        });
    }
    let (width, height) = match (u32::try_from(bounds.0), u32::try_from(bounds.1)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(too_large),
    };

    let write_error = |cause: io::Error| RenderError::Write {
        path: display.clone(),
        cause,
    };
    let file = File::create(path).map_err(&write_error)?;
    let mut output = BufWriter::new(file);
    encode(&mut output, format, pixels, width, height, quality.max(1).min(100))
        .map_err(&write_error)?;
    output.flush().map_err(&write_error)
}

#[cfg(test)]
mod tests {
    extern crate tempfile;

    use super::*;
    use std::fs;

    #[test]
    fn formats_follow_extensions() {
        assert_eq!(OutputFormat::from_path(Path::new("a.jpg")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("a.JPEG")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("a.png")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("a.ppm")), Some(OutputFormat::Ppm));
        assert_eq!(OutputFormat::from_path(Path::new("a.gif")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn writes_a_pixmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");
        let pixels = vec![7_u8; 2 * 3 * CHANNELS];
        write_image(&path, &pixels, (2, 3), DEFAULT_QUALITY).unwrap();
        let written = fs::read(&path).unwrap();
        assert!(written.starts_with(b"P6"));
        assert!(written.ends_with(&pixels));
    }

    #[test]
    fn writes_jpeg_and_png() {
        let dir = tempfile::tempdir().unwrap();
        let pixels = vec![128_u8; 8 * 8 * CHANNELS];
        let jpeg = dir.path().join("out.jpg");
        write_image(&jpeg, &pixels, (8, 8), 75).unwrap();
        assert!(fs::read(&jpeg).unwrap().starts_with(&[0xff, 0xd8]));
        let png = dir.path().join("out.png");
        write_image(&png, &pixels, (8, 8), DEFAULT_QUALITY).unwrap();
        assert!(fs::read(&png).unwrap().starts_with(b"\x89PNG"));
    }

    #[test]
    fn rejects_mismatched_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");
        match write_image(&path, &[0_u8; 5], (2, 2), DEFAULT_QUALITY) {
            Err(RenderError::BufferSize { expected: 12, actual: 5 }) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn reports_unwritable_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.ppm");
        match write_image(&path, &[0_u8; 3], (1, 1), DEFAULT_QUALITY) {
            Err(RenderError::Write { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_formats() {
        match write_image("out.bmp", &[0_u8; 3], (1, 1), DEFAULT_QUALITY) {
            Err(RenderError::UnsupportedFormat { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
