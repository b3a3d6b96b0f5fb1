//! I/O helpers for rasters and JSON reports.
//!
//! - `load_raster`: read a PNG/JPEG/etc. into an owned [`Raster`], keeping
//!   grayscale inputs single-channel and everything else as RGB.
//! - `load_grayscale`: read and convert to a single-channel [`Raster`].
//! - `save_raster_png`: write a 1- or 3-channel [`Raster`] to a PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::Raster;
use image::{DynamicImage, GrayImage, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk. Grayscale files stay single-channel; color files
/// become 3-channel RGB.
pub fn load_raster(path: &Path) -> Result<Raster, String> {
    let img =
        image::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let raster = match img {
        DynamicImage::ImageLuma8(gray) => {
            let (w, h) = (gray.width() as usize, gray.height() as usize);
            Raster::from_raw(w, h, 1, gray.into_raw())
        }
        other => {
            let rgb = other.into_rgb8();
            let (w, h) = (rgb.width() as usize, rgb.height() as usize);
            Raster::from_raw(w, h, 3, rgb.into_raw())
        }
    };
    Ok(raster)
}

/// Load an image from disk and convert to a single-channel grayscale raster.
pub fn load_grayscale(path: &Path) -> Result<Raster, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    Ok(Raster::from_raw(w, h, 1, img.into_raw()))
}

/// Write a 1- or 3-channel raster to a PNG file.
pub fn save_raster_png(path: &Path, raster: &Raster) -> Result<(), String> {
    match raster.channels {
        1 => {
            let img = GrayImage::from_raw(
                raster.w as u32,
                raster.h as u32,
                raster.data.clone(),
            )
            .ok_or_else(|| "Raster buffer does not match its dimensions".to_string())?;
            img.save(path)
                .map_err(|e| format!("Failed to save {}: {e}", path.display()))
        }
        3 => {
            let img = RgbImage::from_raw(
                raster.w as u32,
                raster.h as u32,
                raster.data.clone(),
            )
            .ok_or_else(|| "Raster buffer does not match its dimensions".to_string())?;
            img.save(path)
                .map_err(|e| format!("Failed to save {}: {e}", path.display()))
        }
        n => Err(format!("Cannot encode a {n}-channel raster as PNG")),
    }
}

/// Serialize `value` as pretty JSON into `path`.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
    fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}
