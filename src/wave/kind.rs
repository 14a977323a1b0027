use serde::Deserialize;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

/// The closed set of periodic shapes a wave can take.
///
/// Both the formula generator and the audio drivers dispatch on this one
/// enumeration, so the list of kinds and the subset that can be rendered by a
/// native oscillator live in a single place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaveKind {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
    ReverseSawtooth,
}

impl WaveKind {
    pub const ALL: [WaveKind; 5] = [
        WaveKind::Sine,
        WaveKind::Square,
        WaveKind::Triangle,
        WaveKind::Sawtooth,
        WaveKind::ReverseSawtooth,
    ];

    /// Kebab-case name, as accepted by [`WaveKind::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            WaveKind::Sine => "sine",
            WaveKind::Square => "square",
            WaveKind::Triangle => "triangle",
            WaveKind::Sawtooth => "sawtooth",
            WaveKind::ReverseSawtooth => "reverse-sawtooth",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaveKind::Sine => "Sine",
            WaveKind::Square => "Square",
            WaveKind::Triangle => "Triangle",
            WaveKind::Sawtooth => "Sawtooth",
            WaveKind::ReverseSawtooth => "Reverse Sawtooth",
        }
    }

    /// Whether an audio driver may use a phase-accumulating oscillator for
    /// this kind instead of evaluating the formula sample by sample.
    pub fn is_native(self) -> bool {
        matches!(
            self,
            WaveKind::Sine | WaveKind::Square | WaveKind::Triangle | WaveKind::Sawtooth
        )
    }

    /// Unit-amplitude shape evaluated at `cycles` periods from the origin,
    /// where `cycles = f·t + φ/2π`.
    pub fn shape(self, cycles: f64) -> f64 {
        match self {
            WaveKind::Sine => (TAU * cycles).sin(),
            WaveKind::Square => sign((TAU * cycles).sin()),
            WaveKind::Triangle => (2.0 / PI) * (TAU * cycles).sin().asin(),
            WaveKind::Sawtooth => 2.0 * (cycles - (0.5 + cycles).floor()),
            WaveKind::ReverseSawtooth => 2.0 * (0.5 - (cycles - cycles.floor())),
        }
    }
}

// f64::signum maps 0.0 to 1.0, the square wave needs sign(0) = 0
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl fmt::Display for WaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWaveKind(pub String);

impl fmt::Display for UnknownWaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown wave type '{}'", self.0)
    }
}

impl std::error::Error for UnknownWaveKind {}

impl FromStr for WaveKind {
    type Err = UnknownWaveKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaveKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s.trim())
            .ok_or_else(|| UnknownWaveKind(s.to_string()))
    }
}
