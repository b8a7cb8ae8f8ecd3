//! Integration tests for image normalization.
//!
//! Tests cover:
//! - Power-of-two downsampling of real encoded images
//! - EXIF orientation applied to both output buffers
//! - Decode failures producing no result

mod common;

use detectview::{
    DecodeError, ImageNormalizer, NormalizeConfig, Rotation, Sampling, SourceImage, downsample_factor,
};

use common::*;

fn normalizer(target: u32) -> ImageNormalizer {
    ImageNormalizer::new(NormalizeConfig {
        target_min_dimension: target,
        ..Default::default()
    })
}

#[test]
fn test_reference_photo_factor() {
    assert_eq!(downsample_factor(4000, 3000, 640), 4);
}

#[test]
fn test_downsampled_dimensions_match_factor() -> anyhow::Result<()> {
    // Same proportions as 4000x3000 at threshold 640.
    let source = SourceImage::new(encode_png(400, 300));
    let (normalized, display) = normalizer(64).normalize(&source)?;

    assert_eq!(normalized.factor, 4);
    assert_eq!(normalized.pixels.dimensions(), (100, 75));
    assert_eq!(display.pixels.dimensions(), (400, 300));
    Ok(())
}

#[test]
fn test_stride_sampling_picks_every_nth_pixel() -> anyhow::Result<()> {
    let source = SourceImage::new(encode_png(64, 64));
    let (normalized, _) = normalizer(16).normalize(&source)?;

    assert_eq!(normalized.factor, 4);
    // Gradient encodes (x, y) into red and green.
    let pixel = normalized.pixels.get_pixel(3, 5);
    assert_eq!((pixel[0], pixel[1]), (12, 20));
    Ok(())
}

#[test]
fn test_area_sampling_keeps_dimensions() -> anyhow::Result<()> {
    let normalizer = ImageNormalizer::new(NormalizeConfig {
        target_min_dimension: 16,
        sampling: Sampling::Area,
        ..Default::default()
    });
    let (normalized, _) = normalizer.normalize(&SourceImage::new(encode_png(64, 48)))?;
    assert_eq!(normalized.factor, 2);
    assert_eq!(normalized.pixels.dimensions(), (32, 24));
    Ok(())
}

#[test]
fn test_small_image_is_not_reduced() -> anyhow::Result<()> {
    let source = SourceImage::new(encode_png(100, 60));
    let (normalized, display) = normalizer(640).normalize(&source)?;

    assert_eq!(normalized.factor, 1);
    assert_eq!(normalized.pixels.dimensions(), (100, 60));
    assert_eq!(display.pixels.dimensions(), (100, 60));
    Ok(())
}

#[test]
fn test_exif_rotate_90_turns_both_buffers() -> anyhow::Result<()> {
    let source = SourceImage::new(encode_jpeg_with_orientation(40, 20, 6));
    let (normalized, display) = normalizer(8).normalize(&source)?;

    assert_eq!(display.rotation, Rotation::Cw90);
    assert_eq!(normalized.rotation, Rotation::Cw90);
    assert_eq!(display.pixels.dimensions(), (20, 40));
    assert_eq!(normalized.factor, 2);
    assert_eq!(normalized.pixels.dimensions(), (10, 20));

    // Red left half ends up on top after a clockwise turn.
    let top = display.pixels.get_pixel(10, 5);
    let bottom = display.pixels.get_pixel(10, 34);
    assert!(top[0] > 180 && top[2] < 80, "top was {top:?}");
    assert!(bottom[2] > 180 && bottom[0] < 80, "bottom was {bottom:?}");
    Ok(())
}

#[test]
fn test_exif_rotate_180_and_270() -> anyhow::Result<()> {
    let normalizer = normalizer(640);

    let (_, upside_down) = normalizer.normalize(&SourceImage::new(encode_jpeg_with_orientation(40, 20, 3)))?;
    assert_eq!(upside_down.rotation.degrees(), 180);
    assert_eq!(upside_down.pixels.dimensions(), (40, 20));
    assert!(upside_down.pixels.get_pixel(35, 10)[0] > 180);

    let (_, counter) = normalizer.normalize(&SourceImage::new(encode_jpeg_with_orientation(40, 20, 8)))?;
    assert_eq!(counter.rotation.degrees(), 270);
    assert_eq!(counter.pixels.dimensions(), (20, 40));
    Ok(())
}

#[test]
fn test_mirrored_orientation_is_ignored() -> anyhow::Result<()> {
    let source = SourceImage::new(encode_jpeg_with_orientation(40, 20, 2));
    let (_, display) = normalizer(640).normalize(&source)?;
    assert_eq!(display.rotation, Rotation::None);
    assert_eq!(display.pixels.dimensions(), (40, 20));
    Ok(())
}

#[test]
fn test_missing_metadata_is_not_fatal() -> anyhow::Result<()> {
    let (_, display) = normalizer(640).normalize(&SourceImage::new(encode_png(30, 10)))?;
    assert_eq!(display.rotation, Rotation::None);
    Ok(())
}

#[test]
fn test_garbage_bytes_fail_to_decode() {
    let result = normalizer(640).normalize(&SourceImage::new(vec![0xff, 0xfe, 0x00, 0x01]));
    assert!(result.is_err());
}

#[test]
fn test_truncated_png_fails_to_decode() {
    let mut png = encode_png(50, 50);
    png.truncate(png.len() / 2);
    let result = normalizer(640).normalize(&SourceImage::new(png));
    assert!(matches!(result, Err(DecodeError::Image(_))));
}

#[test]
fn test_empty_source_is_rejected() {
    let result = normalizer(640).normalize(&SourceImage::new(Vec::new()));
    assert!(matches!(result, Err(DecodeError::EmptySource)));
}
