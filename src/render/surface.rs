/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const AXIS: Color = Color::rgb(0xcc, 0xcc, 0xcc);
    pub const GRID: Color = Color::rgb(0x55, 0x55, 0x55);
    pub const LABEL: Color = Color::rgb(0x66, 0x66, 0x66);
    pub const CURSOR: Color = Color::rgb(0xff, 0x45, 0x45);
    pub const COMBINED: Color = Color::rgb(0x4a, 0x8f, 0xe7);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }

    /// `hue` in degrees, `saturation` and `lightness` in `0.0..=1.0`.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let hue = hue.rem_euclid(360.0);
        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = lightness - chroma / 2.0;

        let (r, g, b) = match hue as u32 / 60 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let channel = |value: f64| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;

        Color::rgb(channel(r), channel(g), channel(b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
}

/// The 2D drawing primitives a renderer needs from a viewport.
///
/// Paths follow the canvas model: `move_to` opens a sub-path, `line_to`
/// extends it, `stroke` draws everything since the last stroke.
pub trait Surface {
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    fn clear(&mut self);

    fn move_to(&mut self, x: f32, y: f32);

    fn line_to(&mut self, x: f32, y: f32);

    fn stroke(&mut self, color: Color, width: f32);

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);

    /// Renderers draw nothing on a surface that is not ready.
    fn is_ready(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }
}
