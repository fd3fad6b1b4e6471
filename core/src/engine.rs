//! Stateful resonance integrator.
//!
//! Owns the only mutable [`ResonanceState`] of an editing session and advances
//! it by one explicit Euler step per [`ResonanceEngine::tick`].

use notepad_types::{ResonanceState, TargetVector};

use crate::signal::extract;

/// Fixed integration step.
pub const DT: f64 = 0.08;

/// Per-axis linear decay rates. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decay {
    pub l: f64,
    pub j: f64,
    pub p: f64,
    pub w: f64,
}

impl Default for Decay {
    fn default() -> Self {
        Self {
            l: 0.05,
            j: 0.05,
            p: 0.05,
            w: 0.06,
        }
    }
}

/// Continuous-state feedback model over the four resonance axes.
///
/// Not designed for concurrent mutation. Callers that share an engine across
/// threads must serialize all `tick` calls themselves.
#[derive(Debug, Clone)]
pub struct ResonanceEngine {
    state: ResonanceState,
    decay: Decay,
}

impl ResonanceEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ResonanceState::anchored(),
            decay: Decay::default(),
        }
    }

    /// Current state as of the last tick (or the anchors before any tick).
    #[must_use]
    pub fn snapshot(&self) -> ResonanceState {
        self.state
    }

    #[must_use]
    pub fn decay(&self) -> Decay {
        self.decay
    }

    /// Extract targets from `text` and advance the state by one step.
    pub fn tick(&mut self, text: &str) -> ResonanceState {
        self.advance(extract(text))
    }

    fn advance(&mut self, target: TargetVector) -> ResonanceState {
        let next = step(&self.state, &target, &self.decay);
        tracing::trace!(
            ticks = next.ticks(),
            harmony = next.harmony(),
            l = next.l(),
            j = next.j(),
            p = next.p(),
            w = next.w(),
            "resonance tick"
        );
        self.state = next;
        next
    }
}

impl Default for ResonanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One Euler step. All rates are computed from the pre-update state, and the
/// coupling gains use the harmony from before this step.
fn step(s: &ResonanceState, t: &TargetVector, decay: &Decay) -> ResonanceState {
    let h = s.harmony();

    let k_lj = 1.0 + 0.4 * h;
    let k_lw = 1.0 + 0.5 * h;
    let k_lp = 1.0 + 0.3 * h;

    let d_l = 0.12 * t.j * k_lj + 0.12 * t.w * k_lw - decay.l * s.l();
    // Saturating response: a single burst of connectors cannot swing justice far.
    let d_j = 0.14 * (t.l / (0.70 + t.l)) + 0.14 * t.w - decay.j * s.j();
    let d_p = 0.12 * t.l * k_lp + 0.12 * t.j - decay.p * s.p();
    let d_w = 0.10 * t.l * k_lw + 0.10 * t.j + 0.10 * t.p - decay.w * s.w();

    ResonanceState::from_axes(
        s.l() + DT * d_l,
        s.j() + DT * d_j,
        s.p() + DT * d_p,
        s.w() + DT * d_w,
        s.ticks() + 1,
    )
}
