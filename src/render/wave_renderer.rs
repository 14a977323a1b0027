use crate::render::surface::{Color, Surface, TextAlign, TextStyle};
use crate::render::util::sample_points;
use crate::render::{draw_cursor, draw_time_grid, TimeWindow};
use crate::wave::{Wave, WaveId};

/// Golden angle in degrees, spreads consecutive ids around the hue circle.
pub const GOLDEN_ANGLE: f64 = 137.508;

const INACTIVE_ALPHA: u8 = 70;

/// Draws a single wave into its own viewport.
#[derive(Debug, Clone)]
pub struct WaveRenderer {
    wave_id: WaveId,
    color: Color,
    padding: f32,
    step: f32,
}

impl WaveRenderer {
    pub fn wave_id(&self) -> WaveId {
        self.wave_id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn color_for(id: WaveId) -> Color {
        Color::from_hsl((id as f64 * GOLDEN_ANGLE) % 360.0, 0.7, 0.6)
    }

    /// Pixel polyline of `wave` over `window` on a `width × height` viewport.
    ///
    /// `Wave::value_at` already carries the amplitude, so a sample maps to
    /// `mid_y - v * drawable_height / 2` with no second amplitude factor.
    pub fn trace(
        &self,
        wave: &Wave,
        window: &TimeWindow,
        width: f32,
        height: f32,
    ) -> Vec<(f32, f32)> {
        let mid_y = height / 2.0;
        let half = ((height - 2.0 * self.padding) / 2.0) as f64;

        sample_points(width, self.step, window.duration())
            .map(|(x, t)| (x, mid_y - (wave.value_at(t) * half) as f32))
            .collect()
    }

    /// Redraws the viewport. A playback cursor is added when `elapsed` is
    /// given and the wave is active. Does nothing on a surface that is not
    /// ready or too small to hold the padding.
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        wave: &Wave,
        base_frequency: f64,
        elapsed: Option<f64>,
    ) {
        if !surface.is_ready() {
            return;
        }
        let width = surface.width();
        let height = surface.height();
        if height - 2.0 * self.padding <= 0.0 {
            return;
        }
        let window = TimeWindow::new(wave.visible_cycles(), base_frequency);
        if !window.is_valid() {
            return;
        }

        surface.clear();
        draw_time_grid(surface, &window, Color::AXIS);

        let color = if wave.is_active() {
            self.color
        } else {
            self.color.with_alpha(INACTIVE_ALPHA)
        };
        let mut points = self.trace(wave, &window, width, height).into_iter();
        if let Some((x, y)) = points.next() {
            surface.move_to(x, y);
            for (x, y) in points {
                surface.line_to(x, y);
            }
            surface.stroke(color, 1.0);
        }

        surface.fill_text(
            &format!("Wave {}", wave.id()),
            6.0,
            14.0,
            TextStyle {
                size: 11.0,
                color,
                align: TextAlign::Left,
            },
        );

        if let Some(elapsed) = elapsed {
            if wave.is_active() {
                draw_cursor(surface, window.cursor_x(elapsed, width));
            }
        }
    }

    pub fn new(wave_id: WaveId, padding: f32, step: f32) -> Self {
        WaveRenderer {
            wave_id,
            color: Self::color_for(wave_id),
            padding,
            step,
        }
    }
}
