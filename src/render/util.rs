/// Minimum and maximum of a sampled trace, `None` when it is empty.
pub(crate) fn calculate_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for &value in values {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }

    if values.is_empty() {
        None
    } else {
        Some((min, max))
    }
}

/// `(x, t)` pairs covering `width` pixels every `step` pixels, mapping the
/// first pixel to `t = 0` and the last one to `t = duration`.
pub(crate) fn sample_points(
    width: f32,
    step: f32,
    duration: f64,
) -> impl Iterator<Item = (f32, f64)> {
    let points = if step > 0.0 {
        (width / step).floor() as usize
    } else {
        0
    };
    (0..=points).map(move |i| {
        let t = if points == 0 {
            0.0
        } else {
            i as f64 / points as f64 * duration
        };
        (i as f32 * step, t)
    })
}

/// Fewest decimals that show every multiple of `step` exactly, up to six.
pub fn label_decimals(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    (0..=6)
        .find(|&decimals| {
            let scaled = step * 10f64.powi(decimals as i32);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.max(1.0)
        })
        .unwrap_or(6)
}

pub fn format_time_label(seconds: f64, decimals: usize) -> String {
    format!("{:.*}s", decimals, seconds)
}

/// Size of a canvas fitted into a `max_width × max_height` box.
///
/// Without a ratio the canvas takes the whole box. With one it keeps that
/// width/height ratio inside the box; a ratio of 0 gives a vertical line, an
/// infinite ratio a horizontal one, and anything invalid or a degenerate box
/// gives 0×0.
pub fn fit_viewport(max_width: f32, max_height: f32, ratio: Option<f32>) -> (u32, u32) {
    let max_width = max_width.max(0.0);
    let max_height = max_height.max(0.0);

    let (width, height) = match ratio {
        None => (max_width, max_height),
        Some(ratio) if ratio == 0.0 => (0.0, max_height),
        Some(ratio) if ratio == f32::INFINITY => (max_width, 0.0),
        Some(ratio) if ratio.is_nan() || ratio < 0.0 || !ratio.is_finite() => (0.0, 0.0),
        Some(_) if max_width == 0.0 || max_height == 0.0 => (0.0, 0.0),
        Some(ratio) => {
            if ratio > max_width / max_height {
                (max_width, max_width / ratio)
            } else {
                (max_height * ratio, max_height)
            }
        }
    };

    let round = |value: f32| if value.is_finite() { value.round().max(0.0) as u32 } else { 0 };
    (round(width), round(height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_bounds() {
        assert_eq!(calculate_bounds(&[]), None);
        assert_eq!(calculate_bounds(&[0.5, -2.0, 1.5]), Some((-2.0, 1.5)));
    }

    #[test]
    fn test_sample_points_span_window() {
        let points: Vec<_> = sample_points(10.0, 0.5, 2.0).collect();
        assert_eq!(points.len(), 21);
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[20], (10.0, 2.0));
        assert_eq!(points[10], (5.0, 1.0));
    }

    #[test]
    fn test_label_decimals() {
        assert_eq!(label_decimals(1.0), 0);
        assert_eq!(label_decimals(0.5), 1);
        assert_eq!(label_decimals(1.0 / 20.0), 2);
        assert_eq!(label_decimals(1.0 / 8.0), 3);
        assert_eq!(label_decimals(1.0 / 3.0), 6);
        assert_eq!(label_decimals(0.0), 0);
    }

    #[test]
    fn test_format_time_label() {
        assert_eq!(format_time_label(0.15, 2), "0.15s");
        assert_eq!(format_time_label(2.0, 0), "2s");
    }

    #[test]
    fn test_fit_viewport() {
        assert_eq!(fit_viewport(800.0, 100.0, None), (800, 100));
        assert_eq!(fit_viewport(800.0, 100.0, Some(4.0)), (400, 100));
        assert_eq!(fit_viewport(800.0, 400.0, Some(4.0)), (800, 200));
        assert_eq!(fit_viewport(800.0, 400.0, Some(0.0)), (0, 400));
        assert_eq!(fit_viewport(800.0, 400.0, Some(f32::INFINITY)), (800, 0));
        assert_eq!(fit_viewport(800.0, 400.0, Some(-1.0)), (0, 0));
        assert_eq!(fit_viewport(800.0, 400.0, Some(f32::NAN)), (0, 0));
        assert_eq!(fit_viewport(0.0, 400.0, Some(2.0)), (0, 0));
        assert_eq!(fit_viewport(-5.0, -5.0, None), (0, 0));
    }
}
