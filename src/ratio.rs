//! Aspect-ratio compositing for mobile chat display.
//!
//! Stickers are close to square, but the target chat client renders them on
//! a 22:13 card. This pass flattens transparency against white, adds a thin
//! light-grey side border, and letterboxes the result onto a white canvas of
//! the target ratio.

use std::collections::HashMap;

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, imageops};

/// Target aspect ratio, width over height.
const RATIO_WIDE: u32 = 22;
const RATIO_HIGH: u32 = 13;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// CSS `lightgrey`.
const LIGHT_GREY: Rgba<u8> = Rgba([211, 211, 211, 255]);

/// Letterboxed width for a bitmap of height `height`: `height * 22 / 13`
/// rounded to the nearest integer, then down to the nearest even one (the
/// downstream renderer requires even pixel widths).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn target_width(height: u32) -> u32 {
    let ideal = f64::from(height) / f64::from(RATIO_HIGH) * f64::from(RATIO_WIDE);
    (ideal.round() as u32) / 2 * 2
}

/// Re-letterboxes every bitmap to the 22:13 card layout, preserving keys.
///
/// Pure: no network or cache interaction. Not idempotent: each application
/// adds another grey border pair before letterboxing, so feeding the output
/// back in changes pixel content again even though the dimensions settle.
#[must_use]
pub fn fix_ratio_slack(images: &HashMap<String, DynamicImage>) -> HashMap<String, DynamicImage> {
    images
        .iter()
        .map(|(name, image)| (name.clone(), fix_ratio(image)))
        .collect()
}

/// Single-image pass: flatten, border, place on the white card.
fn fix_ratio(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let wide = target_width(height);
    let bordered = add_side_border(&flatten_onto_white(image));

    let mut card = RgbaImage::from_pixel(wide, height, WHITE);
    // Centered against the pre-border width, so the border sits one pixel
    // off-center whenever `wide != width + 2`. When `wide < width` the
    // offset goes negative and the bordered image clips equally on both
    // sides; that is allowed, not an error.
    let offset = (i64::from(wide) - i64::from(width)).div_euclid(2);
    imageops::overlay(&mut card, &bordered, offset, 0);
    DynamicImage::ImageRgba8(card)
}

/// Flattens transparency against an opaque white background of equal size.
fn flatten_onto_white(image: &DynamicImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut flat = RgbaImage::from_pixel(width, height, WHITE);
    imageops::overlay(&mut flat, &image.to_rgba8(), 0, 0);
    flat
}

/// Adds a 1-pixel light-grey margin on each side, preserving height.
fn add_side_border(flat: &RgbaImage) -> RgbaImage {
    let mut bordered = RgbaImage::from_pixel(flat.width() + 2, flat.height(), LIGHT_GREY);
    imageops::overlay(&mut bordered, flat, 1, 0);
    bordered
}
