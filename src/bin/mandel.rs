extern crate clap;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;
extern crate mandelbrot;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use mandelbrot::config::{BAND_ROWS, HEIGHT, MAX_ITER, WIDTH};
use mandelbrot::output::DEFAULT_QUALITY;
use mandelbrot::{write_image, Coloring, MandelbrotRenderer, Precision, RenderConfig, Schedule};
use num::Complex;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Instant;

/// Splits `s` at the first `separator` and parses both halves.
fn split_parse<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let mut halves = s.splitn(2, separator);
    let first = halves.next()?.trim().parse().ok()?;
    let second = halves.next()?.trim().parse().ok()?;
    Some((first, second))
}

/// A corner of the viewport, written `re,im`.
fn corner(s: &str) -> Option<Complex<f64>> {
    split_parse(s, ',').map(|(re, im)| Complex::new(re, im))
}

// clap validators.  `what` names the value in error messages.

fn pair_of<T: FromStr>(
    separator: char,
    what: &'static str,
) -> impl Fn(String) -> Result<(), String> {
    move |s| match split_parse::<T>(&s, separator) {
        Some(_) => Ok(()),
        None => Err(format!("Could not parse {}", what)),
    }
}

fn within<T>(low: T, high: T, what: &'static str) -> impl Fn(String) -> Result<(), String>
where
    T: FromStr + PartialOrd + Display,
{
    move |s| match s.parse::<T>() {
        Ok(n) if n >= low && n <= high => Ok(()),
        Ok(_) => Err(format!("The {} must be between {} and {}", what, low, high)),
        Err(_) => Err(format!("Could not parse {}", what)),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const PRECISION: &str = "precision";
const SCHEDULE: &str = "schedule";
const BAND: &str = "band-rows";
const DIRECT: &str = "direct";
const QUALITY: &str = "quality";

fn args<'a>(
    size: &'a str,
    iterations: &'a str,
    band: &'a str,
    quality: &'a str,
) -> ArgMatches<'a> {
    let max_threads = num_cpus::get();
    // No image is taller than this, so larger bands buy nothing.
    let band_limit = u32::max_value() as usize;

    App::new("mandel")
        .version("0.1.0")
        .about("High-resolution Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("mandelbrot.jpg")
                .help("Output file; .jpg, .png or .ppm"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value(size)
                .validator(pair_of::<u32>('x', "output image size"))
                .help("Size of output image, WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.5,-1.0")
                .validator(pair_of::<f64>(',', "left lower corner"))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.0,1.0")
                .validator(pair_of::<f64>(',', "right upper corner"))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(within::<usize>(1, max_threads, "thread count"))
                .help("Number of threads to use in solver (default: all cores)"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value(iterations)
                .validator(within::<usize>(1, 1_000_000, "iteration count"))
                .help("Iteration budget per pixel"),
        )
        .arg(
            Arg::with_name(PRECISION)
                .required(false)
                .long(PRECISION)
                .short("p")
                .takes_value(true)
                .possible_values(&["f64", "double", "f32", "single"])
                .default_value("f64")
                .help("Floating-point precision of the escape-time loop"),
        )
        .arg(
            Arg::with_name(SCHEDULE)
                .required(false)
                .long(SCHEDULE)
                .takes_value(true)
                .possible_values(&["static", "dynamic"])
                .default_value("dynamic")
                .help("Hand out fixed bands up front, or small bands on demand"),
        )
        .arg(
            Arg::with_name(BAND)
                .required(false)
                .long(BAND)
                .takes_value(true)
                .default_value(band)
                .validator(within::<usize>(1, band_limit, "band size"))
                .help("Rows per band under the dynamic schedule"),
        )
        .arg(
            Arg::with_name(DIRECT)
                .long(DIRECT)
                .help("Compute colors per pixel instead of from a table"),
        )
        .arg(
            Arg::with_name(QUALITY)
                .required(false)
                .long(QUALITY)
                .short("q")
                .takes_value(true)
                .default_value(quality)
                .validator(within::<u8>(1, 100, "JPEG quality"))
                .help("JPEG quality"),
        )
        .get_matches()
}

// Everything has been through a validator by now, so a parse failure
// here is a bug in the validators.
fn config_from(matches: &ArgMatches) -> Result<RenderConfig, failure::Error> {
    let size = matches.value_of(SIZE).unwrap_or_default();
    let (width, height) = split_parse::<u32>(size, 'x')
        .ok_or_else(|| failure::err_msg("Error parsing image dimensions"))?;
    let leftlower = corner(matches.value_of(LEFTLOWER).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing left lower point"))?;
    let rightupper = corner(matches.value_of(RIGHTUPPER).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing right upper point"))?;
    let threads = match matches.value_of(THREADS) {
        Some(t) => usize::from_str(t)?,
        None => num_cpus::get(),
    };
    let max_iter = usize::from_str(matches.value_of(ITERATIONS).unwrap_or_default())?;
    let precision = Precision::from_str(matches.value_of(PRECISION).unwrap_or_default())
        .map_err(failure::err_msg)?;
    let schedule = match Schedule::from_str(matches.value_of(SCHEDULE).unwrap_or_default())
        .map_err(failure::err_msg)?
    {
        Schedule::Dynamic { .. } => Schedule::Dynamic {
            rows: usize::from_str(matches.value_of(BAND).unwrap_or_default())?,
        },
        Schedule::Static => Schedule::Static,
    };
    let coloring = if matches.is_present(DIRECT) {
        Coloring::Direct
    } else {
        Coloring::Table
    };

    Ok(RenderConfig {
        width: width as usize,
        height: height as usize,
        max_iter,
        leftlower,
        rightupper,
        threads,
        precision,
        schedule,
        coloring,
    })
}

fn run() -> Result<(), failure::Error> {
    let size = format!("{}x{}", WIDTH, HEIGHT);
    let iterations = MAX_ITER.to_string();
    let band = BAND_ROWS.to_string();
    let quality = DEFAULT_QUALITY.to_string();
    let matches = args(&size, &iterations, &band, &quality);

    let config = config_from(&matches)?;
    let outfile = matches.value_of(OUTPUT).unwrap_or_default();
    let quality = u8::from_str(matches.value_of(QUALITY).unwrap_or_default())?;
    let renderer = MandelbrotRenderer::new(config)?;

    info!(
        "rendering {}x{} at {} iterations on {} threads ({:?}, {:?}, {:?})",
        config.width,
        config.height,
        config.max_iter,
        config.threads,
        config.precision,
        config.schedule,
        config.coloring
    );
    let start = Instant::now();
    let pixels = renderer.render()?;
    let rendered = start.elapsed();
    info!("render time: {:.3} seconds", duration_secs(rendered));

    write_image(outfile, &pixels, (config.width, config.height), quality)?;
    info!("full time: {:.3} seconds", duration_secs(start.elapsed()));
    info!("wrote {}", outfile);
    Ok(())
}

fn duration_secs(d: std::time::Duration) -> f64 {
    d.as_secs() as f64 + f64::from(d.subsec_nanos()) * 1e-9
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
