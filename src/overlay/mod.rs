//! Draws detection boxes and captions onto a copy of the display image.

pub mod label;
pub mod palette;

pub use label::{LabelLayout, TextMetrics, place_label};
pub use palette::ColorPalette;

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::borrow::Cow;
use tracing::{debug, instrument, warn};

use crate::config::OverlayStyle;
use crate::error::FontError;
use crate::models::{Detection, DisplayImage};

const EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Result of a render call. Borrows the canvas when there was nothing to draw.
#[derive(Debug, Clone)]
pub struct AnnotatedImage<'a> {
    pub image: Cow<'a, RgbaImage>,
    pub labels: Vec<LabelLayout>,
}

impl AnnotatedImage<'_> {
    pub fn pixels(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_owned(self) -> RgbaImage {
        self.image.into_owned()
    }
}

pub struct OverlayRenderer {
    style: OverlayStyle,
    font: FontArc,
    palette: ColorPalette,
}

impl std::fmt::Debug for OverlayRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayRenderer")
            .field("style", &self.style)
            .field("palette_len", &self.palette.len())
            .finish()
    }
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Result<Self, FontError> {
        let font = match &style.font_path {
            Some(path) => FontArc::try_from_vec(std::fs::read(path)?)?,
            None => FontArc::try_from_slice(EMBEDDED_FONT)?,
        };
        Ok(Self {
            style,
            font,
            palette: ColorPalette::STANDARD,
        })
    }

    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    fn scale(&self) -> PxScale {
        PxScale::from(self.style.text_size)
    }

    pub fn measure(&self, text: &str) -> TextMetrics {
        label::measure_text(&self.font, self.scale(), text)
    }

    /// Draw `detections` in the order given. `None` means detection has not
    /// run and returns the canvas itself.
    #[instrument(skip_all, fields(count = detections.map(|d| d.len())))]
    pub fn render<'a>(&self, canvas: &'a DisplayImage, detections: Option<&[Detection]>) -> AnnotatedImage<'a> {
        let Some(detections) = detections else {
            return AnnotatedImage {
                image: Cow::Borrowed(&canvas.pixels),
                labels: Vec::new(),
            };
        };

        let mut image = canvas.pixels.clone();
        let (canvas_width, canvas_height) = (image.width() as f32, image.height() as f32);
        let [tr, tg, tb] = self.style.text_color;
        let [br, bg, bb] = self.style.background_color;
        let text_color = Rgba([tr, tg, tb, 255]);
        let background = Rgba([br, bg, bb, 255]);

        let mut labels = Vec::with_capacity(detections.len());
        for (index, detection) in detections.iter().enumerate() {
            if !detection.has_finite_geometry() {
                warn!(index, label = %detection.label, "skipping detection with non-finite box");
                continue;
            }
            let color = self.palette.color(index);
            stroke_box(&mut image, detection, self.style.stroke_width, color);

            let text = detection.label_text();
            let metrics = self.measure(&text);
            let (x, y) = place_label(detection.x, detection.y, metrics.width, metrics.height, canvas_width);

            fill(&mut image, x, y, x + metrics.width, y + metrics.height, background);
            // Off-canvas origins saturate the i32 cast and overflow glyph placement.
            let on_canvas = x < canvas_width
                && x + metrics.width > 0.0
                && y < canvas_height
                && y + metrics.height > 0.0;
            if on_canvas {
                // Glyphs are laid out with their baseline `ascent` below the origin.
                draw_text_mut(
                    &mut image,
                    text_color,
                    x.round() as i32,
                    y.round() as i32,
                    self.scale(),
                    &self.font,
                    &text,
                );
            }

            labels.push(LabelLayout {
                text,
                x,
                y,
                width: metrics.width,
                height: metrics.height,
                color,
            });
        }

        debug!(drawn = labels.len(), "rendered overlay");
        AnnotatedImage {
            image: Cow::Owned(image),
            labels,
        }
    }
}

/// Unfilled rectangle with a stroke centered on the box outline.
fn stroke_box(image: &mut RgbaImage, detection: &Detection, stroke_width: f32, color: Rgba<u8>) {
    let x0 = detection.x.min(detection.x + detection.w);
    let x1 = detection.x.max(detection.x + detection.w);
    let y0 = detection.y.min(detection.y + detection.h);
    let y1 = detection.y.max(detection.y + detection.h);
    let half = stroke_width / 2.0;

    fill(image, x0 - half, y0 - half, x1 + half, y0 + half, color);
    fill(image, x0 - half, y1 - half, x1 + half, y1 + half, color);
    fill(image, x0 - half, y0 - half, x0 + half, y1 + half, color);
    fill(image, x1 - half, y0 - half, x1 + half, y1 + half, color);
}

/// Fill `[left, right) x [top, bottom)`, clipped to the image.
fn fill(image: &mut RgbaImage, left: f32, top: f32, right: f32, bottom: f32, color: Rgba<u8>) {
    let (width, height) = (image.width() as f32, image.height() as f32);
    let l = left.round().clamp(0.0, width);
    let r = right.round().clamp(0.0, width);
    let t = top.round().clamp(0.0, height);
    let b = bottom.round().clamp(0.0, height);
    if r <= l || b <= t {
        return;
    }
    let rect = Rect::at(l as i32, t as i32).of_size((r - l) as u32, (b - t) as u32);
    draw_filled_rect_mut(image, rect, color);
}
