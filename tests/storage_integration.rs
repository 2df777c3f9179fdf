//! Integration tests for image persistence.
//!
//! Exercises save-then-reload round trips against real temp directories.

use std::collections::HashMap;

use dccon::{StorageError, fix_ratio_slack, save_package_images, target_width};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

fn opaque_image(width: u32, height: u32, pixel: Rgba<u8>) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, pixel))
}

#[test]
fn test_save_round_trip_preserves_dimensions_and_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let original = opaque_image(5, 7, Rgba([12, 200, 34, 255]));
    let mut images = HashMap::new();
    images.insert("1-0-dot.png".to_string(), original.clone());

    save_package_images(&images, dir.path()).unwrap();

    let reloaded = image::open(dir.path().join("1-0-dot.png")).unwrap();
    assert_eq!(reloaded.dimensions(), original.dimensions());
    assert_eq!(
        reloaded.to_rgba8().as_raw(),
        original.to_rgba8().as_raw(),
        "opaque pixels must survive the round trip"
    );
}

#[test]
fn test_save_infers_format_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut images = HashMap::new();
    images.insert(
        "2-1-anim.gif".to_string(),
        opaque_image(8, 6, Rgba([255, 0, 0, 255])),
    );
    images.insert(
        "3-2-photo.jpeg".to_string(),
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(9, 4, image::Rgb([10, 20, 30]))),
    );

    save_package_images(&images, dir.path()).unwrap();

    assert_eq!(
        image::open(dir.path().join("2-1-anim.gif"))
            .unwrap()
            .dimensions(),
        (8, 6)
    );
    assert_eq!(
        image::open(dir.path().join("3-2-photo.jpeg"))
            .unwrap()
            .dimensions(),
        (9, 4)
    );
}

#[test]
fn test_missing_directory_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let mut images = HashMap::new();
    images.insert(
        "1-0-a.png".to_string(),
        opaque_image(3, 3, Rgba([0, 0, 0, 255])),
    );

    let err = save_package_images(&images, &missing).unwrap_err();
    let StorageError::Save { path, .. } = err;
    assert!(path.starts_with(&missing));
}

#[test]
fn test_fix_then_save_pipeline_lands_on_card_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let mut images = HashMap::new();
    images.insert(
        "1-0-a.png".to_string(),
        opaque_image(100, 100, Rgba([0, 128, 255, 255])),
    );

    save_package_images(&fix_ratio_slack(&images), dir.path()).unwrap();

    let reloaded = image::open(dir.path().join("1-0-a.png")).unwrap();
    assert_eq!(reloaded.dimensions(), (target_width(100), 100));
}
