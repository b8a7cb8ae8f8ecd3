use image::Rgba;

const STANDARD_COLORS: [[u8; 3]; 19] = [
    [54, 67, 244],
    [99, 30, 233],
    [176, 39, 156],
    [183, 58, 103],
    [181, 81, 63],
    [243, 150, 33],
    [244, 169, 3],
    [212, 188, 0],
    [136, 150, 0],
    [80, 175, 76],
    [74, 195, 139],
    [57, 220, 205],
    [59, 235, 255],
    [7, 193, 255],
    [0, 152, 255],
    [34, 87, 255],
    [72, 85, 121],
    [158, 158, 158],
    [139, 125, 96],
];

/// Fixed box colors, assigned by detection index rather than class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    colors: &'static [[u8; 3]],
}

impl ColorPalette {
    pub const STANDARD: ColorPalette = ColorPalette {
        colors: &STANDARD_COLORS,
    };

    /// Returns `None` for an empty color list.
    pub const fn new(colors: &'static [[u8; 3]]) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors })
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> Rgba<u8> {
        let [r, g, b] = self.colors[index % self.colors.len()];
        Rgba([r, g, b, 255])
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::STANDARD
    }
}
