use buddhabrot::output::{bmp_name, raw_name, write_bmp, write_raw};
use buddhabrot::{
    parse_complex, parse_pair, render_image, Config, Engine, Palette, Progress, RenderError,
    WorldWindow,
};
use clap::{App, Arg, ArgMatches};
use log::info;
use std::str::FromStr;
use std::time::Instant;

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const DEPTH: &str = "depth";
const SCALE: &str = "scale";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const AUTO_BRIGHTNESS: &str = "auto-brightness";
const NO_ROTATE: &str = "no-rotate";
const NO_RAW: &str = "no-raw";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    App::new("buddha")
        .version("0.3.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Buddhabrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output bitmap (default: buddhabrot_WxH_DEPTH.bmp)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1024x768")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(DEPTH)
                .long(DEPTH)
                .short("d")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse depth",
                        "Depth must be between 1 and 1000000",
                    )
                })
                .help("Maximum iterations per sample"),
        )
        .arg(
            Arg::with_name(SCALE)
                .long(SCALE)
                .short("x")
                .takes_value(true)
                .default_value("10")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        1000,
                        "Could not parse scale",
                        "Scale must be between 0 and 1000",
                    )
                })
                .help("Samples per pixel along each axis (0 is treated as 1)"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.102613,-1.237710")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.200613,1.239710")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("j")
                .takes_value(true)
                .default_value("0")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        buddhabrot::MAX_WORKERS,
                        "Could not parse thread count",
                        &format!(
                            "Thread count must be between 0 (auto) and {}",
                            buddhabrot::MAX_WORKERS
                        ),
                    )
                })
                .help("Number of threads to use in solver, 0 for one per core"),
        )
        .arg(
            Arg::with_name(AUTO_BRIGHTNESS)
                .long(AUTO_BRIGHTNESS)
                .short("b")
                .help("Derive brightness from the brightest pixel"),
        )
        .arg(
            Arg::with_name(NO_ROTATE)
                .long(NO_ROTATE)
                .help("Do not rotate the bitmap 90 degrees right"),
        )
        .arg(
            Arg::with_name(NO_RAW)
                .long(NO_RAW)
                .help("Do not save the raw 16-bit histogram"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .help("Report progress and timing"),
        )
        .get_matches()
}

// Validators have already run, so the lookups below cannot fail.
fn config(matches: &ArgMatches) -> Config {
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap_or_default(), 'x')
        .unwrap_or((1024, 768));
    let number = |name: &str, default: usize| {
        matches
            .value_of(name)
            .and_then(|s| usize::from_str(s).ok())
            .unwrap_or(default)
    };
    let corner = |name: &str| matches.value_of(name).and_then(parse_complex);
    let window = match (corner(LEFTLOWER), corner(RIGHTUPPER)) {
        (Some(leftlower), Some(rightupper)) => WorldWindow::from_corners(leftlower, rightupper),
        _ => WorldWindow::default(),
    };
    Config {
        window,
        width,
        height,
        max_depth: number(DEPTH, 1000),
        scale: number(SCALE, 10),
        threads: number(THREADS, 0),
    }
}

fn run(matches: &ArgMatches) -> Result<(), RenderError> {
    let engine = Engine::new(&config(matches))?;
    let config = *engine.config();
    info!(
        "Width: {}  Height: {}  Depth: {}  Scale: {}  Using: {} / {} cores",
        config.width,
        config.height,
        config.max_depth,
        config.scale,
        engine.workers(),
        num_cpus::get()
    );

    let samples = engine.samples();
    let started = Instant::now();
    let report = |p: Progress| info!("{:6.2}% = {} / {}", p.percent(), p.done, p.total);
    let histogram = engine.scatter(&report)?.gather()?;
    let elapsed = started.elapsed().as_secs_f64();
    info!(
        "{} samples in {:.3}s ({:.0} samples/s)",
        samples,
        elapsed,
        if elapsed > 0.0 { samples as f64 / elapsed } else { 0.0 }
    );

    if !matches.is_present(NO_RAW) {
        let name = raw_name(config.width, config.height, config.max_depth, config.scale);
        write_raw(&name, &histogram)?;
        println!("Saved: {}", name);
    }

    let palette = Palette {
        auto_brightness: matches.is_present(AUTO_BRIGHTNESS),
        rotate: !matches.is_present(NO_ROTATE),
        ..Palette::default()
    };
    let image = render_image(&histogram, &palette)?;
    let name = matches
        .value_of(OUTPUT)
        .map(String::from)
        .unwrap_or_else(|| bmp_name(image.width(), image.height(), config.max_depth));
    write_bmp(&name, &image)?;
    println!("Saved: {}", name);
    Ok(())
}

fn main() {
    let matches = args();
    let level = if matches.is_present(VERBOSE) { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
