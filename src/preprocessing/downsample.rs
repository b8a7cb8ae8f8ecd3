use image::{imageops, ImageBuffer, RgbaImage};

use crate::config::Sampling;

/// Largest power-of-two divisor that keeps both sides at or above
/// `target_min_dimension`. Halving stops as soon as either side's next
/// halving would fall below the target.
pub fn downsample_factor(width: u32, height: u32, target_min_dimension: u32) -> u32 {
    let target = target_min_dimension.max(1);
    let (mut w, mut h) = (width, height);
    let mut factor = 1;
    while w / 2 >= target && h / 2 >= target {
        w /= 2;
        h /= 2;
        factor *= 2;
    }
    factor
}

/// Dimensions of an image reduced by `factor`, never below 1x1.
pub fn reduced_dimensions(width: u32, height: u32, factor: u32) -> (u32, u32) {
    let factor = factor.max(1);
    ((width / factor).max(1), (height / factor).max(1))
}

/// Sample `image` down by `factor` along both axes.
pub fn sample(image: &RgbaImage, factor: u32, sampling: Sampling) -> RgbaImage {
    if factor <= 1 {
        return image.clone();
    }
    let (width, height) = reduced_dimensions(image.width(), image.height(), factor);
    match sampling {
        Sampling::Stride => ImageBuffer::from_fn(width, height, |x, y| {
            *image.get_pixel(x * factor, y * factor)
        }),
        Sampling::Area => imageops::thumbnail(image, width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    #[test]
    fn reference_photo_halves_twice() {
        let factor = downsample_factor(4000, 3000, 640);
        assert_eq!(factor, 4);
        assert_eq!(reduced_dimensions(4000, 3000, factor), (1000, 750));
    }

    #[test]
    fn small_images_are_not_reduced() {
        assert_eq!(downsample_factor(1279, 5000, 640), 1);
        assert_eq!(downsample_factor(5000, 1279, 640), 1);
        assert_eq!(downsample_factor(640, 480, 640), 1);
        assert_eq!(downsample_factor(0, 0, 640), 1);
    }

    #[test]
    fn exact_boundary_halves() {
        assert_eq!(downsample_factor(1280, 1280, 640), 2);
        assert_eq!(downsample_factor(2560, 1280, 640), 2);
    }

    #[test]
    fn zero_target_is_treated_as_one() {
        assert_eq!(downsample_factor(8, 8, 0), 8);
    }

    #[test]
    fn stride_sampling_takes_every_nth_pixel() {
        let img = RgbaImage::from_fn(8, 4, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let reduced = sample(&img, 2, Sampling::Stride);
        assert_eq!(reduced.dimensions(), (4, 2));
        assert_eq!(reduced.get_pixel(3, 1), &Rgba([6, 2, 0, 255]));
    }

    #[test]
    fn area_sampling_averages_blocks() {
        let img = RgbaImage::from_fn(4, 2, |x, _| {
            if x % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([200, 200, 200, 255])
            }
        });
        let reduced = sample(&img, 2, Sampling::Area);
        assert_eq!(reduced.dimensions(), (2, 1));
        let value = reduced.get_pixel(0, 0)[0];
        assert!((99..=101).contains(&value), "got {value}");
    }

    #[test]
    fn factor_one_returns_copy() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 4]));
        assert_eq!(sample(&img, 1, Sampling::Stride), img);
    }

    proptest! {
        #[test]
        fn factor_is_largest_power_of_two(
            width in 640u32..40_000,
            height in 640u32..40_000,
        ) {
            let factor = downsample_factor(width, height, 640);
            prop_assert!(factor.is_power_of_two());

            let (w, h) = (width / factor, height / factor);
            prop_assert!(w >= 640 && h >= 640);
            prop_assert!(w / 2 < 640 || h / 2 < 640);
        }

        #[test]
        fn below_double_target_is_identity(
            width in 1u32..1280,
            height in 1u32..40_000,
        ) {
            prop_assert_eq!(downsample_factor(width, height, 640), 1);
            prop_assert_eq!(downsample_factor(height, width, 640), 1);
        }
    }
}
