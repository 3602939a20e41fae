#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Write a colourful RGB test image so grayscale conversion has work to do.
pub fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let path = dir.join(name);
    img.save_with_format(&path, format).unwrap();
    path
}

pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\x89PNG but not really").unwrap();
    path
}

/// Decode by content; outputs are JPEG whatever their extension says.
pub fn read_output(path: &Path) -> (ImageFormat, DynamicImage) {
    let reader = ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap();
    let format = reader.format().unwrap();
    (format, reader.decode().unwrap())
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Like [`file_names`], but a directory that was never created is empty.
pub fn files_if_any(dir: &Path) -> Vec<String> {
    if dir.exists() { file_names(dir) } else { Vec::new() }
}

/// File names of the items a report lists as succeeded.
pub fn succeeded_names(report: &pipeline_bench::models::BatchReport) -> Vec<String> {
    let mut names: Vec<String> = report
        .outcomes
        .iter()
        .filter(|o| o.is_success())
        .map(|o| o.source.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
