#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_tool() {
    Command::cargo_bin("sudoku-grid")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sudoku"));
}

#[test]
fn processes_a_single_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("grid.png");
    let out_dir = dir.path().join("out");

    let mut img = image::GrayImage::from_pixel(400, 400, image::Luma([255u8]));
    for k in 0..10u32 {
        let c = 40 + k * 36;
        for i in 0..400 {
            img.put_pixel(i, c, image::Luma([0]));
            img.put_pixel(c, i, image::Luma([0]));
        }
    }
    img.save(&input).unwrap();

    Command::cargo_bin("sudoku-grid")
        .unwrap()
        .args(["--file", input.to_str().unwrap()])
        .args(["--out-dir", out_dir.to_str().unwrap()])
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("horizontal"));

    assert!(out_dir.join("grid_overlay.png").is_file());
    assert!(out_dir.join("grid_rectified.png").is_file());
}
