use detectview::{Detection, DisplayImage, Rotation};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use tempfile::NamedTempFile;

/// PNG bytes with a coordinate gradient so sampled pixels are identifiable.
pub fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode test png");
    buffer.into_inner()
}

/// JPEG whose left half is red and right half is blue, carrying an EXIF
/// orientation tag in an APP1 segment right after SOI.
pub fn encode_jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg)
        .expect("Failed to encode test jpeg");
    let jpeg = buffer.into_inner();

    // Big-endian TIFF header, IFD0 at offset 8 with a single SHORT entry.
    let mut tiff = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut app1 = b"Exif\x00\x00".to_vec();
    app1.extend_from_slice(&tiff);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xff, 0xe1]);
    out.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Writes a PNG of the given size to a temp file that is removed on drop.
pub fn create_test_image(width: u32, height: u32) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    std::fs::write(file.path(), encode_png(width, height)).expect("Failed to write test image");
    file
}

pub const CANVAS_GREY: Rgba<u8> = Rgba([90, 90, 90, 255]);

pub fn grey_canvas(width: u32, height: u32) -> DisplayImage {
    DisplayImage {
        pixels: RgbaImage::from_pixel(width, height, CANVAS_GREY),
        rotation: Rotation::None,
    }
}

pub fn make_detection(x: f32, y: f32, w: f32, h: f32, label: &str, confidence: f32) -> Detection {
    Detection::new(x, y, w, h, label, confidence).expect("Invalid test detection")
}
