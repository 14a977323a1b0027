use crate::audio::AudioDriver;
use crate::wave::formula::Formula;

/// Pull-based sample synthesizer.
///
/// Native kinds run a phase accumulator, everything else evaluates the
/// formula sample by sample. Both paths produce `formula(t) * gain`.
#[derive(Debug, Clone)]
pub struct SynthDriver {
    sample_rate: f64,
    formula: Formula,
    gain: f64,
    playing: bool,
    // timeline position of the first rendered frame
    start_position: f64,
    frames: u64,
    // accumulated f·t cycles, wrapped to [0, 1)
    phase: f64,
}

impl SynthDriver {
    pub fn new(sample_rate: f64) -> Self {
        SynthDriver {
            sample_rate,
            formula: Formula::silent(),
            gain: 1.0,
            playing: false,
            start_position: 0.0,
            frames: 0,
            phase: 0.0,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Seconds on the shared timeline of the next frame to be rendered.
    pub fn position(&self) -> f64 {
        self.start_position + self.frames as f64 / self.sample_rate
    }

    /// Fills `out` with the next block. Silence when stopped.
    pub fn render(&mut self, out: &mut [f32]) {
        if !self.playing {
            out.fill(0.0);
            return;
        }

        let native = self.formula.kind().filter(|kind| kind.is_native());
        let phase_offset = self.formula.phase_shift() / std::f64::consts::TAU;
        let increment = self.formula.frequency() / self.sample_rate;

        for sample in out.iter_mut() {
            let value = match native {
                Some(kind) => self.formula.scale() * kind.shape(self.phase + phase_offset),
                None => self.formula.evaluate(self.position()),
            };
            *sample = (value * self.gain) as f32;

            self.frames += 1;
            self.phase += increment;
            self.phase -= self.phase.floor();
        }
    }
}

impl AudioDriver for SynthDriver {
    fn start(&mut self, formula: &Formula, origin: f64, now: f64) {
        if self.playing {
            return;
        }
        self.formula = formula.clone();
        self.start_position = (now - origin).max(0.0);
        self.frames = 0;
        let cycles = self.formula.frequency() * self.start_position;
        self.phase = cycles - cycles.floor();
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn update(&mut self, formula: &Formula) {
        self.formula = formula.clone();
    }

    fn set_gain(&mut self, gain: f64) {
        self.gain = if gain.is_nan() { 0.0 } else { gain.clamp(0.0, 1.0) };
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::formula::generate;
    use crate::wave::kind::WaveKind;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn near_discontinuity(formula: &Formula, t: f64) -> bool {
        let cycles = formula.cycles_at(t) * 2.0;
        (cycles - cycles.round()).abs() < 1e-6
    }

    #[test]
    fn test_output_matches_formula_for_every_kind() {
        let mut rng = StdRng::seed_from_u64(3);
        for kind in WaveKind::ALL {
            for _ in 0..8 {
                let formula = generate(
                    kind,
                    rng.gen_range(1.0..=100.0),
                    rng.gen_range(20.0..2000.0),
                    rng.gen_range(-3.0..3.0),
                );
                let gain = rng.gen_range(0.1..=1.0);
                let mut driver = SynthDriver::new(44_100.0);
                driver.set_gain(gain);
                driver.start(&formula, 0.0, 0.0);

                let mut block = vec![0.0f32; 4096];
                driver.render(&mut block);

                for (n, sample) in block.iter().enumerate() {
                    let t = n as f64 / 44_100.0;
                    if near_discontinuity(&formula, t) {
                        continue;
                    }
                    let expected = formula.evaluate(t) * gain;
                    assert!(
                        (*sample as f64 - expected).abs() < 1e-4,
                        "{kind} sample {n}: {sample} vs {expected}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_late_start_joins_shared_timeline() {
        let formula = generate(WaveKind::Sine, 100.0, 110.0, 0.4);
        let mut driver = SynthDriver::new(48_000.0);
        driver.start(&formula, 2.0, 2.5);
        assert!((driver.position() - 0.5).abs() < 1e-12);

        let mut block = [0.0f32; 16];
        driver.render(&mut block);
        for (n, sample) in block.iter().enumerate() {
            let expected = formula.evaluate(0.5 + n as f64 / 48_000.0);
            assert!((*sample as f64 - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let formula = generate(WaveKind::Square, 50.0, 200.0, 0.0);
        let mut driver = SynthDriver::new(48_000.0);
        driver.start(&formula, 0.0, 0.0);
        let mut block = [0.0f32; 100];
        driver.render(&mut block);
        let position = driver.position();

        driver.start(&formula, 0.0, 5.0);
        assert_eq!(driver.position(), position);

        driver.stop();
        driver.stop();
        assert!(!driver.is_playing());
        driver.render(&mut block);
        assert!(block.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_nan_gain_is_silence() {
        let formula = generate(WaveKind::Sine, 100.0, 440.0, 0.0);
        let mut driver = SynthDriver::new(48_000.0);
        driver.set_gain(f64::NAN);
        driver.start(&formula, 0.0, 0.0);
        let mut block = [1.0f32; 64];
        driver.render(&mut block);
        assert!(block.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_unknown_kind_is_silent() {
        let mut driver = SynthDriver::new(48_000.0);
        driver.start(&Formula::silent(), 0.0, 0.0);
        let mut block = [1.0f32; 32];
        driver.render(&mut block);
        assert!(block.iter().all(|s| *s == 0.0));
    }
}
