use crate::render::{Color, Surface, TextAlign, TextStyle};
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};

pub(crate) fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn anchor(align: TextAlign) -> Align2 {
    match align {
        TextAlign::Left => Align2::LEFT_BOTTOM,
        TextAlign::Center => Align2::CENTER_BOTTOM,
        TextAlign::Right => Align2::RIGHT_BOTTOM,
    }
}

/// [`Surface`] backed by an egui painter clipped to one rectangle.
///
/// Coordinates are relative to the top-left corner of `rect`.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
    background: Color32,
    paths: Vec<Vec<Pos2>>,
}

impl PainterSurface<'_> {
    fn pos(&self, x: f32, y: f32) -> Pos2 {
        self.rect.min + egui::vec2(x, y)
    }
}

impl Surface for PainterSurface<'_> {
    fn width(&self) -> f32 {
        self.rect.width()
    }

    fn height(&self) -> f32 {
        self.rect.height()
    }

    fn clear(&mut self) {
        self.paths.clear();
        self.painter.rect_filled(self.rect, 0.0, self.background);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let pos = self.pos(x, y);
        self.paths.push(vec![pos]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let pos = self.pos(x, y);
        match self.paths.last_mut() {
            Some(path) => path.push(pos),
            None => self.paths.push(vec![pos]),
        }
    }

    fn stroke(&mut self, color: Color, width: f32) {
        let stroke = Stroke::new(width, to_color32(color));
        for path in std::mem::take(&mut self.paths) {
            if path.len() >= 2 {
                self.painter.add(Shape::line(path, stroke));
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.painter.text(
            self.pos(x, y),
            anchor(style.align),
            text,
            FontId::proportional(style.size),
            to_color32(style.color),
        );
    }
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect, background: Color32) -> Self {
        PainterSurface {
            painter,
            rect,
            background,
            paths: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion() {
        assert_eq!(to_color32(Color::rgb(10, 20, 30)), Color32::from_rgb(10, 20, 30));
        assert_eq!(to_color32(Color::rgb(255, 255, 255).with_alpha(0)).a(), 0);
    }
}
