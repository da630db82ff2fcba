use crate::error::ServiceError;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformCfg {
    pub width: u32,
    pub height: u32,
}

impl TransformCfg {
    pub fn new(w: u32, h: u32) -> Self {
        TransformCfg {
            width: w,
            height: h,
        }
    }
}

/// Resizes to exactly `cfg.width` x `cfg.height`, scaling to cover the box and
/// cropping the overflow around the center, and re-encodes as JPEG.
pub fn resize_jpeg(bytes: &[u8], cfg: TransformCfg) -> Result<Vec<u8>, ServiceError> {
    let og_img = image::load_from_memory(bytes)?;
    let resized = og_img.resize_to_fill(cfg.width, cfg.height, FilterType::Gaussian);

    // jpeg has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)?;

    Ok(out.into_inner())
}
