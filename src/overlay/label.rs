use ab_glyph::{Font, GlyphId, PxScale, ScaleFont, point};
use image::Rgba;

/// Rendered size of a line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    /// `ascent - descent`.
    pub height: f32,
    /// Distance from the top of the line to the baseline.
    pub ascent: f32,
}

/// Width follows imageproc's glyph layout so the label background matches
/// the run `draw_text_mut` paints: advance first, then kern against the
/// previous outlined glyph.
pub fn measure_text<F: Font>(font: &F, scale: PxScale, text: &str) -> TextMetrics {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0;
    let mut last: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        let glyph = id.with_scale_and_position(scale, point(width, scaled.ascent()));
        width += scaled.h_advance(id);
        if scaled.outline_glyph(glyph).is_some() {
            if let Some(last) = last {
                width += scaled.kern(id, last);
            }
            last = Some(id);
        }
    }
    TextMetrics {
        width,
        height: scaled.ascent() - scaled.descent(),
        ascent: scaled.ascent(),
    }
}

/// Top-left corner of a label attached above a box at `(x, y)`.
///
/// The label moves down to 0 when it would leave the top edge and shifts
/// left when it would leave the right edge. Text wider than the canvas
/// ends up with a negative x.
pub fn place_label(x: f32, y: f32, text_width: f32, text_height: f32, canvas_width: f32) -> (f32, f32) {
    let mut label_x = x;
    let mut label_y = y - text_height;
    if label_y < 0.0 {
        label_y = 0.0;
    }
    if label_x + text_width > canvas_width {
        label_x = canvas_width - text_width;
    }
    (label_x, label_y)
}

/// A label as it was drawn on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgba<u8>,
}
