use crate::render::surface::{Color, Surface, TextAlign, TextStyle};
use crate::render::util::{calculate_bounds, sample_points};
use crate::render::{draw_cursor, draw_time_grid, TimeWindow};
use crate::wave::formula::format_number;
use crate::wave::Wave;

/// How the combined view picks its pixels-per-unit factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScale {
    /// Floor that keeps faint signals from collapsing into a flat line.
    pub min_scaling_factor: f64,
    /// Scale used when there is no signal to fit.
    pub default_scale: f64,
    /// Peaks at or below this count as no signal.
    pub silence_threshold: f64,
}

impl Default for AutoScale {
    fn default() -> Self {
        AutoScale {
            min_scaling_factor: 0.2,
            default_scale: 1.0,
            silence_threshold: 1e-9,
        }
    }
}

impl AutoScale {
    /// Scale that makes `peak` touch the edge of the drawable area, kept
    /// within `[min_scaling_factor, drawable_height / 2]`.
    ///
    /// The ceiling wins if the viewport is so small that it falls below the
    /// floor.
    pub fn resolve(&self, peak: f64, drawable_height: f64) -> f64 {
        let ceiling = drawable_height / 2.0;
        if !(peak > self.silence_threshold) {
            return self.default_scale;
        }
        (ceiling / peak).max(self.min_scaling_factor).min(ceiling)
    }
}

/// One sampling pass over the sum of the active waves.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTrace {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
    pub peak: f64,
    pub scale: f64,
    pub active_count: usize,
}

impl CombinedTrace {
    pub fn compute(
        waves: &[Wave],
        window: &TimeWindow,
        width: f32,
        drawable_height: f32,
        step: f32,
        auto_scale: &AutoScale,
    ) -> Self {
        let active: Vec<&Wave> = waves.iter().filter(|wave| wave.is_active()).collect();
        let values: Vec<f64> = sample_points(width, step, window.duration())
            .map(|(_, t)| active.iter().map(|wave| wave.value_at(t)).sum())
            .collect();

        let (min, max) = calculate_bounds(&values).unwrap_or((0.0, 0.0));
        let peak = min.abs().max(max.abs());

        CombinedTrace {
            scale: auto_scale.resolve(peak, drawable_height as f64),
            values,
            min,
            max,
            peak,
            active_count: active.len(),
        }
    }

    /// Pixel polyline, each point held inside the padded band.
    pub fn points(&self, height: f32, padding: f32, step: f32) -> Vec<(f32, f32)> {
        let mid_y = height as f64 / 2.0;
        let top = padding;
        let bottom = (height - padding).max(top);

        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let y = (mid_y - value * self.scale) as f32;
                (i as f32 * step, y.clamp(top, bottom))
            })
            .collect()
    }
}

/// Display-only sum of the active waves, e.g. `50·sine(440t) + 25·square(220t)`.
pub fn simplified_formula(waves: &[Wave]) -> String {
    let terms: Vec<String> = waves
        .iter()
        .filter(|wave| wave.is_active())
        .map(|wave| {
            format!(
                "{}·{}({:.0}t)",
                format_number(wave.amplitude()),
                wave.wave_type(),
                wave.frequency()
            )
        })
        .collect();

    if terms.is_empty() {
        "No active waves".to_string()
    } else {
        terms.join(" + ")
    }
}

const OVERLAY_STYLE: TextStyle = TextStyle {
    size: 12.0,
    color: Color::COMBINED,
    align: TextAlign::Right,
};

/// Draws the superposition of all active waves with auto-scaling.
///
/// The sampled trace is cached until [`CombinedRenderer::invalidate`] is
/// called or the viewport size or time window changes. Playback redraws
/// reuse it and only move the cursor.
#[derive(Debug, Clone)]
pub struct CombinedRenderer {
    color: Color,
    padding: f32,
    step: f32,
    auto_scale: AutoScale,
    cache: Option<CombinedTrace>,
    cached_key: Option<(f32, f32, TimeWindow)>,
    stale: bool,
}

impl CombinedRenderer {
    pub fn trace(&self) -> Option<&CombinedTrace> {
        self.cache.as_ref()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Forces a fresh sampling pass on the next draw.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn draw(
        &mut self,
        surface: &mut dyn Surface,
        waves: &[Wave],
        window: &TimeWindow,
        elapsed: Option<f64>,
    ) {
        if !surface.is_ready() || !window.is_valid() {
            return;
        }
        let width = surface.width();
        let height = surface.height();
        let drawable_height = height - 2.0 * self.padding;
        if drawable_height <= 0.0 {
            return;
        }

        let key = (width, height, *window);
        if self.stale || self.cache.is_none() || self.cached_key != Some(key) {
            let trace = CombinedTrace::compute(
                waves,
                window,
                width,
                drawable_height,
                self.step,
                &self.auto_scale,
            );
            log::debug!(
                "Combined trace: {} active, peak {:.3}, scale {:.2}",
                trace.active_count,
                trace.peak,
                trace.scale
            );
            self.cache = Some(trace);
            self.cached_key = Some(key);
            self.stale = false;
        }
        let Some(trace) = self.cache.as_ref() else {
            return;
        };

        surface.clear();
        draw_time_grid(surface, window, Color::rgb(0xff, 0xff, 0xff));

        let mut points = trace.points(height, self.padding, self.step).into_iter();
        if let Some((x, y)) = points.next() {
            surface.move_to(x, y);
            for (x, y) in points {
                surface.line_to(x, y);
            }
            surface.stroke(self.color, 1.0);
        }

        surface.fill_text(
            &format!("{} active waves", trace.active_count),
            width - 10.0,
            20.0,
            OVERLAY_STYLE,
        );
        surface.fill_text(
            &format!("{:.1} px/unit", trace.scale),
            width - 10.0,
            36.0,
            OVERLAY_STYLE,
        );
        surface.fill_text(
            &simplified_formula(waves),
            10.0,
            20.0,
            TextStyle {
                align: TextAlign::Left,
                ..OVERLAY_STYLE
            },
        );

        if let Some(elapsed) = elapsed.filter(|_| trace.active_count > 0) {
            draw_cursor(surface, window.cursor_x(elapsed, width));
        }
    }

    pub fn new(padding: f32, step: f32, auto_scale: AutoScale) -> Self {
        CombinedRenderer {
            color: Color::COMBINED,
            padding,
            step,
            auto_scale,
            cache: None,
            cached_key: None,
            stale: true,
        }
    }
}
