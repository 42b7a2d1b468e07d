use buddhabrot::output::{bmp_name, dimensions_from_name, read_raw, write_bmp};
use buddhabrot::{render_image, Palette, RenderError};
use clap::{App, Arg, ArgMatches};
use log::info;
use std::path::Path;

const INPUT: &str = "input";
const OUTPUT: &str = "output";
const AUTO_BRIGHTNESS: &str = "auto-brightness";
const ROTATE: &str = "rotate";

fn args<'a>() -> ArgMatches<'a> {
    App::new("raw2bmp")
        .version("0.3.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Colour a raw 16-bit Buddhabrot histogram into a bitmap")
        .arg(
            Arg::with_name(INPUT)
                .required(true)
                .index(1)
                .help("Raw dump named like raw_buddhabrot_WxH_DEPTH_SCALEx.u16.data"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output bitmap (default: buddhabrot_WxH_DEPTH.bmp)"),
        )
        .arg(
            Arg::with_name(AUTO_BRIGHTNESS)
                .long(AUTO_BRIGHTNESS)
                .short("b")
                .help("Derive brightness from the brightest pixel"),
        )
        .arg(
            Arg::with_name(ROTATE)
                .long(ROTATE)
                .short("r")
                .help("Rotate the bitmap 90 degrees right"),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> Result<(), RenderError> {
    let input = matches.value_of(INPUT).unwrap_or_default();
    let name = Path::new(input)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(input);
    let (width, height, depth) =
        dimensions_from_name(name).ok_or_else(|| RenderError::BadFileName(name.to_string()))?;
    info!("Auto detect ... {} x {} @ {:?}", width, height, depth);

    let histogram = read_raw(input, width, height)?;
    let palette = Palette {
        auto_brightness: matches.is_present(AUTO_BRIGHTNESS),
        rotate: matches.is_present(ROTATE),
        ..Palette::default()
    };
    let image = render_image(&histogram, &palette)?;
    let output = matches
        .value_of(OUTPUT)
        .map(String::from)
        .unwrap_or_else(|| bmp_name(image.width(), image.height(), depth.unwrap_or(0)));
    write_bmp(&output, &image)?;
    println!("Saved BMP: {}", output);
    Ok(())
}

fn main() {
    let matches = args();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(&matches) {
        eprintln!("Conversion failure: {}", e);
        std::process::exit(1);
    }
}
