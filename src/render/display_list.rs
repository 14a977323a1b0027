use crate::render::surface::{Color, Surface, TextStyle};

pub type Path = Vec<(f32, f32)>;

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeRecord {
    pub paths: Vec<Path>,
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Stroke(StrokeRecord),
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
}

/// Surface that records what is drawn on it instead of rasterising.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    current: Vec<Path>,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        DisplayList {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn strokes(&self) -> Vec<&StrokeRecord> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Stroke(stroke) => Some(stroke),
                _ => None,
            })
            .collect()
    }

    pub fn strokes_with(&self, color: Color) -> Vec<&StrokeRecord> {
        self.strokes()
            .into_iter()
            .filter(|stroke| stroke.color == color)
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DisplayList {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.current.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.current.push(vec![(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        match self.current.last_mut() {
            Some(path) => path.push((x, y)),
            None => self.current.push(vec![(x, y)]),
        }
    }

    fn stroke(&mut self, color: Color, width: f32) {
        let paths = std::mem::take(&mut self.current);
        self.commands
            .push(DrawCommand::Stroke(StrokeRecord { paths, color, width }));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }
}
