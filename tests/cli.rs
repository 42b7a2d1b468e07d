use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn renders_bitmap_and_raw_dump() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("buddha")
        .unwrap()
        .current_dir(dir.path())
        .args(&["-s", "16x12", "-d", "50", "-x", "1", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Saved: raw_buddhabrot_16x12_50_1x.u16.data",
        ))
        .stdout(predicate::str::contains("Saved: buddhabrot_12x16_50.bmp"));

    let raw = fs::read(dir.path().join("raw_buddhabrot_16x12_50_1x.u16.data")).unwrap();
    assert_eq!(raw.len(), 16 * 12 * 2);
    let bmp = fs::read(dir.path().join("buddhabrot_12x16_50.bmp")).unwrap();
    assert_eq!(&bmp[..2], b"BM");
}

#[test]
fn honours_output_name_and_skips_raw() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("small.bmp");
    Command::cargo_bin("buddha")
        .unwrap()
        .current_dir(dir.path())
        .args(&["-s", "8x8", "-d", "20", "-x", "1", "--no-raw", "--no-rotate", "-b"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    assert!(out.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn rejects_unparseable_size() {
    Command::cargo_bin("buddha")
        .unwrap()
        .args(&["-s", "big"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));
}

#[test]
fn raw_dump_converts_back_to_a_bitmap() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("buddha")
        .unwrap()
        .current_dir(dir.path())
        .args(&["-s", "10x6", "-d", "30", "-x", "1", "-o", "first.bmp"])
        .assert()
        .success();

    Command::cargo_bin("raw2bmp")
        .unwrap()
        .current_dir(dir.path())
        .args(&["raw_buddhabrot_10x6_30_1x.u16.data", "-b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved BMP: buddhabrot_10x6_30.bmp"));
    assert!(dir.path().join("buddhabrot_10x6_30.bmp").exists());
}

#[test]
fn raw2bmp_needs_dimensions_in_the_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("histogram.data");
    fs::write(&path, &[0u8; 8]).unwrap();
    Command::cargo_bin("raw2bmp")
        .unwrap()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot find WIDTHxHEIGHT_DEPTH"));
}
