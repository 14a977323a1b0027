use crate::wave::kind::WaveKind;
use std::f64::consts::TAU;

/// A closed-form periodic signal together with its human-readable rendering.
///
/// A `Formula` is a value: it is built from a complete parameter set and is
/// replaced wholesale whenever any parameter changes, never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    kind: Option<WaveKind>,
    amplitude: f64,
    frequency: f64,
    phase_shift: f64,
    display: String,
}

impl Formula {
    /// Value of the signal at `t` seconds, bounded by `±amplitude/100`.
    pub fn evaluate(&self, t: f64) -> f64 {
        match self.kind {
            Some(kind) => self.scale() * kind.shape(self.cycles_at(t)),
            None => 0.0,
        }
    }

    /// Number of periods elapsed at `t`, phase included.
    pub fn cycles_at(&self, t: f64) -> f64 {
        self.frequency * t + self.phase_shift / TAU
    }

    /// Linear gain, `amplitude / 100`.
    pub fn scale(&self) -> f64 {
        self.amplitude / 100.0
    }

    pub fn kind(&self) -> Option<WaveKind> {
        self.kind
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn phase_shift(&self) -> f64 {
        self.phase_shift
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Formula that evaluates to zero everywhere.
    pub fn silent() -> Self {
        Formula {
            kind: None,
            amplitude: 0.0,
            frequency: 0.0,
            phase_shift: 0.0,
            display: "Unknown wave type".to_string(),
        }
    }
}

/// Builds the formula for one wave.
///
/// # Parameters
/// - `amplitude`: percentage, divided by 100 inside the formula.
/// - `frequency`: Hz, expected to be positive.
/// - `phase_shift`: radians.
pub fn generate(kind: WaveKind, amplitude: f64, frequency: f64, phase_shift: f64) -> Formula {
    Formula {
        kind: Some(kind),
        amplitude,
        frequency,
        phase_shift,
        display: display_string(kind, amplitude, frequency, phase_shift),
    }
}

/// Same as [`generate`] for callers holding a kind name; unknown names give
/// the silent formula.
pub fn generate_named(name: &str, amplitude: f64, frequency: f64, phase_shift: f64) -> Formula {
    match name.parse::<WaveKind>() {
        Ok(kind) => generate(kind, amplitude, frequency, phase_shift),
        Err(_) => Formula::silent(),
    }
}

fn display_string(kind: WaveKind, amplitude: f64, frequency: f64, phase_shift: f64) -> String {
    let a = format_number(amplitude);
    let f = format_number(frequency);
    let phase = if phase_shift == 0.0 {
        String::new()
    } else if phase_shift > 0.0 {
        format!(" + {:.2}", phase_shift)
    } else {
        format!(" − {:.2}", -phase_shift)
    };
    // sawtooth kinds shift time instead of angle: t' = t + φ/(2πf)
    let shifted = if phase_shift == 0.0 || frequency == 0.0 {
        format!("{}t", f)
    } else {
        let offset = phase_shift / (TAU * frequency);
        let sign = if offset > 0.0 { '+' } else { '−' };
        format!("{}(t {} {})", f, sign, trim_decimals(offset.abs(), 6))
    };

    match kind {
        WaveKind::Sine => format!("{}% × sin(2π×{}t{})", a, f, phase),
        WaveKind::Square => format!("{}% × sign(sin(2π×{}t{}))", a, f, phase),
        WaveKind::Triangle => format!("{}% × (2/π) × asin(sin(2π×{}t{}))", a, f, phase),
        WaveKind::Sawtooth => format!("{}% × 2×({} − floor(½ + {}))", a, shifted, shifted),
        WaveKind::ReverseSawtooth => {
            format!("{}% × 2×(½ − ({} − floor({})))", a, shifted, shifted)
        }
    }
}

/// Literal rendering of a parameter: integers without decimals, otherwise at
/// most two decimals.
pub fn format_number(value: f64) -> String {
    trim_decimals(value, 2)
}

fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        let text = text.trim_end_matches('0').trim_end_matches('.');
        if text == "-0" {
            "0".to_string()
        } else {
            text.to_string()
        }
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-9;

    // distance in periods to the nearest jump of a discontinuous kind
    fn near_discontinuity(formula: &Formula, t: f64) -> bool {
        let cycles = formula.cycles_at(t) * 2.0;
        (cycles - cycles.round()).abs() < 1e-6
    }

    #[test]
    fn test_periodicity() {
        let mut rng = StdRng::seed_from_u64(7);
        for kind in WaveKind::ALL {
            for _ in 0..200 {
                let frequency = rng.gen_range(20.0..2000.0);
                let amplitude = rng.gen_range(0.0..=100.0);
                let phase = rng.gen_range(-2.0 * PI..2.0 * PI);
                let formula = generate(kind, amplitude, frequency, phase);
                let t = rng.gen_range(0.0..0.1);
                if near_discontinuity(&formula, t) {
                    continue;
                }
                let a = formula.evaluate(t);
                let b = formula.evaluate(t + 1.0 / frequency);
                assert!((a - b).abs() < 1e-6, "{kind} f={frequency} t={t}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_amplitude_bound() {
        let mut rng = StdRng::seed_from_u64(11);
        for kind in WaveKind::ALL {
            for _ in 0..200 {
                let amplitude = rng.gen_range(0.0..=100.0);
                let frequency = rng.gen_range(20.0..2000.0);
                let formula = generate(kind, amplitude, frequency, rng.gen_range(-PI..PI));
                let bound = amplitude / 100.0 + EPSILON;
                for i in 0..64 {
                    let t = i as f64 * 0.000_37;
                    assert!(formula.evaluate(t).abs() <= bound);
                }
            }
        }
    }

    #[test]
    fn test_bound_reached_by_sine_and_square() {
        let sine = generate(WaveKind::Sine, 80.0, 100.0, 0.0);
        assert!((sine.evaluate(1.0 / 400.0) - 0.8).abs() < EPSILON);
        let square = generate(WaveKind::Square, 80.0, 100.0, 0.0);
        assert_eq!(square.evaluate(1.0 / 400.0), 0.8);
    }

    #[test]
    fn test_zero_amplitude_is_flat() {
        for kind in WaveKind::ALL {
            let formula = generate(kind, 0.0, 440.0, 1.0);
            for i in 0..100 {
                assert_eq!(formula.evaluate(i as f64 * 0.0001).abs(), 0.0);
            }
        }
    }

    #[test]
    fn test_square_quarter_points() {
        let formula = generate(WaveKind::Square, 50.0, 20.0, 0.0);
        assert_eq!(formula.evaluate(0.0), 0.0);
        assert!((formula.evaluate(1.0 / (4.0 * 20.0)) - 0.5).abs() < EPSILON);
        assert!((formula.evaluate(3.0 / (4.0 * 20.0)) + 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_phase_shift_moves_sawtooth_in_time() {
        let plain = generate(WaveKind::Sawtooth, 100.0, 50.0, 0.0);
        let shifted = generate(WaveKind::Sawtooth, 100.0, 50.0, PI / 2.0);
        // a quarter-period phase shift is a quarter-period time advance
        let quarter = 1.0 / (4.0 * 50.0);
        assert!((shifted.evaluate(0.001) - plain.evaluate(0.001 + quarter)).abs() < EPSILON);
    }

    #[test]
    fn test_unknown_name_is_silent() {
        let formula = generate_named("wobble", 100.0, 440.0, 0.0);
        assert_eq!(formula.kind(), None);
        assert_eq!(formula.evaluate(0.123), 0.0);
        assert_eq!(formula.display(), "Unknown wave type");

        let named = generate_named("triangle", 100.0, 440.0, 0.0);
        assert_eq!(named, generate(WaveKind::Triangle, 100.0, 440.0, 0.0));
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(generate(WaveKind::Sine, 50.0, 440.0, 0.0).display(), "50% × sin(2π×440t)");
        assert_eq!(
            generate(WaveKind::Square, 12.5, 100.0, 1.5).display(),
            "12.5% × sign(sin(2π×100t + 1.50))"
        );
        assert_eq!(
            generate(WaveKind::Triangle, 100.0, 20.0, -0.25).display(),
            "100% × (2/π) × asin(sin(2π×20t − 0.25))"
        );
        assert_eq!(
            generate(WaveKind::Sawtooth, 30.0, 200.0, 0.0).display(),
            "30% × 2×(200t − floor(½ + 200t))"
        );
        assert_eq!(
            generate(WaveKind::ReverseSawtooth, 30.0, 100.0, PI).display(),
            "30% × 2×(½ − (100(t + 0.005) − floor(100(t + 0.005))))"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(440.0), "440");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.0001), "0");
    }
}
