//! Decision tables over engine state.
//!
//! Both tables read the engine's state as of its last tick. Querying never
//! advances the engine; only [`ResonanceController::evaluate`] does.

use std::fmt;
use std::time::Duration;

use notepad_types::{LOW_HARMONY_THRESHOLD, ResonanceReading, ResonanceState};

use crate::engine::ResonanceEngine;
use crate::signal::{is_blank, word_count};

pub const EMPTY_TEXT_AUTOSAVE_SECONDS: u32 = 30;
pub const AUTOSAVE_MIN_SECONDS: u32 = 5;
pub const AUTOSAVE_MAX_SECONDS: u32 = 30;

/// Guidance shown next to the editor. Variants are listed in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guidance {
    Bootstrap,
    LowHarmony,
    ClarityRail,
    WisdomSignal,
    PowerOutpacingWisdom,
    Stable,
}

impl Guidance {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Guidance::Bootstrap => {
                "Start with a single sentence. Let flow come first, then refine."
            }
            Guidance::LowHarmony => {
                "Low harmony detected. Try one clarifying sentence and one concrete detail."
            }
            Guidance::ClarityRail => {
                "Justice rail is light. Add punctuation and clearer sentence boundaries."
            }
            Guidance::WisdomSignal => {
                "Wisdom signal is low. Add one question or explicit intent to deepen context."
            }
            Guidance::PowerOutpacingWisdom => {
                "Power is outpacing wisdom. Slow down and verify the core claim."
            }
            Guidance::Stable => {
                "Resonance is stable. Keep writing; refine only after the paragraph lands."
            }
        }
    }
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guidance for `text` given `state`. First matching rule wins.
#[must_use]
pub fn guidance_for(state: &ResonanceState, text: &str) -> Guidance {
    if is_blank(text) {
        Guidance::Bootstrap
    } else if state.harmony() < LOW_HARMONY_THRESHOLD {
        Guidance::LowHarmony
    } else if state.j() < 0.45 {
        Guidance::ClarityRail
    } else if state.w() < 0.50 {
        Guidance::WisdomSignal
    } else if state.p() > 0.90 && state.w() < 0.60 {
        Guidance::PowerOutpacingWisdom
    } else {
        Guidance::Stable
    }
}

/// Autosave cadence in seconds for `text` given `state`, always in `[5, 30]`.
#[must_use]
pub fn autosave_interval_for(state: &ResonanceState, text: &str) -> u32 {
    if is_blank(text) {
        return EMPTY_TEXT_AUTOSAVE_SECONDS;
    }

    let harmony = state.harmony();
    let mut base: i64 = if harmony < LOW_HARMONY_THRESHOLD {
        6
    } else if harmony < 0.70 {
        10
    } else if harmony < 0.82 {
        14
    } else {
        18
    };

    // Longer drafts save a bit more frequently.
    let words = word_count(text);
    if words > 500 {
        base -= 2;
    } else if words > 200 {
        base -= 1;
    }

    base.clamp(i64::from(AUTOSAVE_MIN_SECONDS), i64::from(AUTOSAVE_MAX_SECONDS)) as u32
}

/// One engine plus the decision tables that read it.
#[derive(Debug, Clone, Default)]
pub struct ResonanceController {
    engine: ResonanceEngine,
}

impl ResonanceController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the engine by exactly one tick and return the flattened reading.
    pub fn evaluate(&mut self, text: &str) -> ResonanceReading {
        self.engine.tick(text).reading()
    }

    #[must_use]
    pub fn state(&self) -> ResonanceState {
        self.engine.snapshot()
    }

    #[must_use]
    pub fn engine(&self) -> &ResonanceEngine {
        &self.engine
    }

    #[must_use]
    pub fn autosave_interval_seconds(&self, text: &str) -> u32 {
        autosave_interval_for(&self.engine.snapshot(), text)
    }

    #[must_use]
    pub fn autosave_interval(&self, text: &str) -> Duration {
        Duration::from_secs(u64::from(self.autosave_interval_seconds(text)))
    }

    #[must_use]
    pub fn guidance(&self, text: &str) -> Guidance {
        guidance_for(&self.engine.snapshot(), text)
    }
}
