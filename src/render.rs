pub mod combined_renderer;
pub mod display_list;
pub mod surface;
pub(crate) mod util;
pub mod wave_renderer;

pub use combined_renderer::{AutoScale, CombinedRenderer, CombinedTrace};
pub use display_list::{DisplayList, DrawCommand};
pub use surface::{Color, Surface, TextAlign, TextStyle};
pub use util::{fit_viewport, format_time_label, label_decimals};
pub use wave_renderer::WaveRenderer;

/// The span of time shown across one viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub visible_cycles: u32,
    pub base_frequency: f64,
}

impl TimeWindow {
    pub fn new(visible_cycles: u32, base_frequency: f64) -> Self {
        TimeWindow {
            visible_cycles,
            base_frequency,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.visible_cycles > 0 && self.base_frequency.is_finite() && self.base_frequency > 0.0
    }

    /// `visible_cycles / base_frequency` seconds.
    pub fn duration(&self) -> f64 {
        self.visible_cycles as f64 / self.base_frequency
    }

    pub fn cycle_period(&self) -> f64 {
        1.0 / self.base_frequency
    }

    /// Horizontal position of the playback cursor after `elapsed` seconds.
    pub fn cursor_x(&self, elapsed: f64, width: f32) -> f32 {
        let cycles = self.visible_cycles as f64;
        let position = (elapsed * self.base_frequency).rem_euclid(cycles) / cycles;
        (position * width as f64) as f32
    }
}

const LABEL_STYLE: TextStyle = TextStyle {
    size: 10.0,
    color: Color::LABEL,
    align: TextAlign::Center,
};

/// Axis line, one gridline per cycle and the time labels under them.
pub(crate) fn draw_time_grid(surface: &mut dyn Surface, window: &TimeWindow, axis: Color) {
    let width = surface.width();
    let height = surface.height();
    let mid_y = height / 2.0;

    surface.move_to(0.0, mid_y);
    surface.line_to(width, mid_y);
    surface.stroke(axis, 0.5);

    let decimals = label_decimals(window.cycle_period());
    for cycle in 0..=window.visible_cycles {
        let x = cycle as f32 / window.visible_cycles as f32 * width;
        surface.move_to(x, 0.0);
        surface.line_to(x, height);
        surface.stroke(Color::GRID, 0.5);

        let label = format_time_label(cycle as f64 * window.cycle_period(), decimals);
        surface.fill_text(&label, x, height - 2.0, LABEL_STYLE);
    }
}

pub(crate) fn draw_cursor(surface: &mut dyn Surface, x: f32) {
    let height = surface.height();
    surface.move_to(x, 0.0);
    surface.line_to(x, height);
    surface.stroke(Color::CURSOR, 1.5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_duration() {
        let window = TimeWindow::new(10, 20.0);
        assert!(window.is_valid());
        assert_eq!(window.duration(), 0.5);
        assert_eq!(window.cycle_period(), 0.05);
        assert!(!TimeWindow::new(0, 20.0).is_valid());
        assert!(!TimeWindow::new(3, 0.0).is_valid());
    }

    #[test]
    fn test_cursor_wraps_every_window() {
        let window = TimeWindow::new(4, 20.0);
        assert_eq!(window.cursor_x(0.0, 400.0), 0.0);
        assert!((window.cursor_x(0.1, 400.0) - 200.0).abs() < 1e-3);
        assert!((window.cursor_x(0.3, 400.0) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_grid_labels() {
        let mut list = DisplayList::new(200.0, 100.0);
        draw_time_grid(&mut list, &TimeWindow::new(2, 20.0), Color::AXIS);
        assert_eq!(list.texts(), vec!["0.00s", "0.05s", "0.10s"]);
        // axis plus one line per gridline
        assert_eq!(list.strokes().len(), 4);
    }
}
