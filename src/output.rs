//! Getting results on and off the disk.
//!
//! Two formats: a 24-bit bitmap of the coloured image, and a RAW dump
//! of the unrotated histogram, row-major little-endian `u16`, from
//! which the bitmap can later be regenerated with other brightness
//! settings.  A RAW dump carries no header, so its dimensions travel
//! in its file name.

use crate::error::RenderError;
use crate::raster::{Histogram, Raster, RgbImage};
use image::bmp::BMPEncoder;
use image::ColorType;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// The default bitmap name for an image of the given final size.
pub fn bmp_name(width: usize, height: usize, max_depth: usize) -> String {
    format!("buddhabrot_{}x{}_{}.bmp", width, height, max_depth)
}

/// The RAW dump name for a histogram; `dimensions_from_name` reads it
/// back.
pub fn raw_name(width: usize, height: usize, max_depth: usize, scale: usize) -> String {
    format!(
        "raw_buddhabrot_{}x{}_{}_{}x.u16.data",
        width, height, max_depth, scale
    )
}

fn leading_number(s: &str) -> Option<usize> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or_else(|| s.len());
    s[..end].parse().ok()
}

/// Find `_<width>x<height>` and an optional `_<depth>` after it in a
/// file name.
pub fn dimensions_from_name(name: &str) -> Option<(usize, usize, Option<usize>)> {
    let mut parts = name.split('_');
    while let Some(part) = parts.next() {
        let mut halves = part.splitn(2, 'x');
        let width = halves.next().and_then(|w| w.parse::<usize>().ok());
        let height = halves.next().and_then(leading_number);
        if let (Some(width), Some(height)) = (width, height) {
            return Some((width, height, parts.next().and_then(leading_number)));
        }
    }
    None
}

/// Write `image` as a 24-bit bitmap.
pub fn write_bmp<P: AsRef<Path>>(path: P, image: &RgbImage) -> Result<(), RenderError> {
    let bytes: Vec<u8> = image.pixels().iter().flat_map(|p| p.iter().copied()).collect();
    let mut output = BufWriter::new(File::create(path)?);
    BMPEncoder::new(&mut output).encode(
        &bytes,
        image.width() as u32,
        image.height() as u32,
        ColorType::RGB(8),
    )?;
    output.flush()?;
    Ok(())
}

/// Write `histogram` as a headerless little-endian `u16` dump.
pub fn write_raw<P: AsRef<Path>>(path: P, histogram: &Histogram) -> Result<(), RenderError> {
    let mut output = BufWriter::new(File::create(path)?);
    for count in histogram.pixels() {
        output.write_all(&count.to_le_bytes())?;
    }
    output.flush()?;
    Ok(())
}

/// Read a dump written by `write_raw`.  The file must hold exactly
/// `width * height` samples.
pub fn read_raw<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
) -> Result<Histogram, RenderError> {
    let bytes = fs::read(path)?;
    let expected = width
        .checked_mul(height)
        .and_then(|samples| samples.checked_mul(2))
        .unwrap_or_else(usize::max_value);
    if bytes.len() != expected {
        return Err(RenderError::RawSize {
            expected,
            found: bytes.len(),
        });
    }
    let counts = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Raster::from_pixels(width, height, counts).ok_or(RenderError::RawSize {
        expected,
        found: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn raw_names_carry_their_dimensions() {
        let name = raw_name(1024, 768, 1000, 10);
        assert_eq!(name, "raw_buddhabrot_1024x768_1000_10x.u16.data");
        assert_eq!(dimensions_from_name(&name), Some((1024, 768, Some(1000))));
    }

    #[test]
    fn dimensions_without_depth() {
        assert_eq!(
            dimensions_from_name("nebula_640x480.raw"),
            Some((640, 480, None))
        );
        assert_eq!(dimensions_from_name("nebula.raw"), None);
        assert_eq!(dimensions_from_name("x_by_y"), None);
    }

    #[test]
    fn raw_dump_is_little_endian_row_major() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("h.data");
        let h = Raster::from_pixels(2, 2, vec![1u16, 0x0203, 0, 0xffff]).unwrap();
        write_raw(&path, &h).unwrap();
        assert_eq!(
            fs::read(&path).unwrap(),
            vec![1, 0, 3, 2, 0, 0, 0xff, 0xff]
        );
        assert_eq!(read_raw(&path, 2, 2).unwrap(), h);
    }

    #[test]
    fn short_raw_dump_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("h.data");
        fs::write(&path, &[0u8; 6]).unwrap();
        match read_raw(&path, 2, 2) {
            Err(RenderError::RawSize { expected, found }) => {
                assert_eq!((expected, found), (8, 6));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bitmap_is_bottom_up_bgr_and_padded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("i.bmp");
        // 3 pixels wide: 9 bytes per row, padded to 12.
        let image = Raster::from_pixels(
            3,
            2,
            vec![
                [1, 2, 3],
                [4, 5, 6],
                [7, 8, 9],
                [10, 11, 12],
                [13, 14, 15],
                [16, 17, 18],
            ],
        )
        .unwrap();
        write_bmp(&path, &image).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"BM");
        let offset = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]) as usize;
        // The bottom row comes first.
        assert_eq!(&bytes[offset..offset + 3], &[12, 11, 10]);
        assert_eq!(&bytes[offset + 12..offset + 15], &[3, 2, 1]);
        assert_eq!(bytes.len(), offset + 24);
    }

    #[test]
    fn huge_raw_dimensions_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("h.data");
        fs::write(&path, &[0u8; 6]).unwrap();
        match read_raw(&path, usize::max_value() / 2, 3) {
            Err(RenderError::RawSize { found, .. }) => assert_eq!(found, 6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_raw_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        match read_raw(dir.path().join("absent"), 1, 1) {
            Err(RenderError::Io(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
