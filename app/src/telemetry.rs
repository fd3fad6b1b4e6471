//! Resonance readout derived from the most recent refresh.

use notepad_types::{Axis, ResonanceReading};

/// Minimum harmony change that counts as movement.
pub const TREND_THRESHOLD: f64 = 0.005;

pub const INITIAL_GUIDANCE: &str = "Start typing to initialize resonance feedback.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trend {
    Rising,
    Falling,
    #[default]
    Steady,
}

impl Trend {
    #[must_use]
    pub fn from_delta(delta: f64) -> Self {
        if delta > TREND_THRESHOLD {
            Trend::Rising
        } else if delta < -TREND_THRESHOLD {
            Trend::Falling
        } else {
            Trend::Steady
        }
    }

    #[must_use]
    pub const fn glyph(self, ascii_only: bool) -> &'static str {
        match (self, ascii_only) {
            (Trend::Rising, false) => "↑",
            (Trend::Falling, false) => "↓",
            (Trend::Steady, false) => "→",
            (Trend::Rising, true) => "^",
            (Trend::Falling, true) => "v",
            (Trend::Steady, true) => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    /// `None` until the first refresh.
    pub reading: Option<ResonanceReading>,
    pub guidance: String,
    pub autosave_seconds: u32,
    /// Harmony change spanning the last two refreshes.
    pub delta: f64,
    pub trend: Trend,
}

impl Telemetry {
    #[must_use]
    pub fn initial(autosave_seconds: u32) -> Self {
        Self {
            reading: None,
            guidance: INITIAL_GUIDANCE.to_string(),
            autosave_seconds,
            delta: 0.0,
            trend: Trend::Steady,
        }
    }

    /// Five metric lines, `L Love:` through `H Harmony:`.
    #[must_use]
    pub fn metric_lines(&self, ascii_only: bool) -> [String; 5] {
        let axis_line = |axis: Axis| {
            let label = format!("{}:", axis.display_name());
            let value = self.reading.map_or_else(
                || "--".to_string(),
                |r| format!("{:.3}", r.get(axis)),
            );
            format!("{} {label:<9}{value}", axis.symbol())
        };

        let harmony = match self.reading {
            Some(r) => format!(
                "H Harmony: {:.3}  {} {:+.3}",
                r.harmony,
                self.trend.glyph(ascii_only),
                self.delta
            ),
            None => "H Harmony: --".to_string(),
        };

        let [l, j, p, w] = Axis::ALL.map(axis_line);
        [l, j, p, w, harmony]
    }
}
