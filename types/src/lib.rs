//! Core domain types for Resonant Notepad.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod cursor;
pub use cursor::{CursorIndex, CursorParseError};

use serde::{Deserialize, Serialize};

// ============================================================================
// Anchor Constants
// ============================================================================

/// The golden ratio, `(1 + √5) / 2`.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Initial Love axis: the golden ratio conjugate `1/φ`.
pub const L0: f64 = 1.0 / PHI;
/// Initial Justice axis: `√2 − 1`.
pub const J0: f64 = std::f64::consts::SQRT_2 - 1.0;
/// Initial Power axis: `e − 2`.
pub const P0: f64 = std::f64::consts::E - 2.0;
/// Initial Wisdom axis: `ln 2`.
pub const W0: f64 = std::f64::consts::LN_2;

/// Lower bound for every stateful axis. Never zero.
pub const AXIS_MIN: f64 = 0.01;
/// Upper bound for every stateful axis.
pub const AXIS_MAX: f64 = 1.0;

/// Harmony below this value is treated as a low-harmony window.
pub const LOW_HARMONY_THRESHOLD: f64 = 0.58;

// ============================================================================
// Axis
// ============================================================================

/// One of the four tracked resonance dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Love,
    Justice,
    Power,
    Wisdom,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::Love, Axis::Justice, Axis::Power, Axis::Wisdom];

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Axis::Love => 'L',
            Axis::Justice => 'J',
            Axis::Power => 'P',
            Axis::Wisdom => 'W',
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Axis::Love => "Love",
            Axis::Justice => "Justice",
            Axis::Power => "Power",
            Axis::Wisdom => "Wisdom",
        }
    }

    /// Anchor value the engine starts from on this axis.
    #[must_use]
    pub const fn anchor(self) -> f64 {
        match self {
            Axis::Love => L0,
            Axis::Justice => J0,
            Axis::Power => P0,
            Axis::Wisdom => W0,
        }
    }
}

// ============================================================================
// Harmony
// ============================================================================

/// Closeness of the four axes to the ideal corner `(1, 1, 1, 1)`.
///
/// Computed as `1 / (1 + d)` where `d` is the Euclidean distance to the ideal,
/// so the result is always in `(0, 1]` for finite inputs.
#[must_use]
pub fn harmony(l: f64, j: f64, p: f64, w: f64) -> f64 {
    let distance = ((1.0 - l).powi(2) + (1.0 - j).powi(2) + (1.0 - p).powi(2) + (1.0 - w).powi(2))
        .sqrt();
    1.0 / (1.0 + distance)
}

/// Clamp into `[AXIS_MIN, AXIS_MAX]`. Non-finite input maps to `AXIS_MIN`.
#[must_use]
pub fn clamp_axis(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(AXIS_MIN, AXIS_MAX)
    } else {
        AXIS_MIN
    }
}

/// Coarse harmony classification used for status colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarmonyBand {
    /// Below [`LOW_HARMONY_THRESHOLD`].
    Low,
    /// Between the low threshold and `0.70`.
    Mid,
    High,
}

impl HarmonyBand {
    pub const MID_UPPER: f64 = 0.70;

    #[must_use]
    pub fn classify(harmony: f64) -> Self {
        if harmony < LOW_HARMONY_THRESHOLD {
            HarmonyBand::Low
        } else if harmony < Self::MID_UPPER {
            HarmonyBand::Mid
        } else {
            HarmonyBand::High
        }
    }
}

// ============================================================================
// Target Vector
// ============================================================================

/// Per-tick heuristic targets extracted from one text snapshot.
///
/// Ephemeral: produced fresh on every evaluation and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetVector {
    pub l: f64,
    pub j: f64,
    pub p: f64,
    pub w: f64,
}

impl TargetVector {
    /// Targets used when the text is empty or whitespace-only.
    pub const BOOTSTRAP: TargetVector = TargetVector {
        l: 0.40,
        j: 0.45,
        p: 0.35,
        w: 0.30,
    };

    #[must_use]
    pub const fn new(l: f64, j: f64, p: f64, w: f64) -> Self {
        Self { l, j, p, w }
    }
}

// ============================================================================
// Resonance State
// ============================================================================

/// Snapshot of the engine's four-dimensional state.
///
/// Axes are clamped to `[AXIS_MIN, AXIS_MAX]` and `harmony` is derived from
/// them at construction. There is no way to build a value whose harmony
/// disagrees with its axes, and snapshots are plain copies: mutating one
/// never reaches the engine that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResonanceState {
    l: f64,
    j: f64,
    p: f64,
    w: f64,
    harmony: f64,
    ticks: u64,
}

impl ResonanceState {
    /// Initial state: the four anchor constants with zero ticks.
    #[must_use]
    pub fn anchored() -> Self {
        Self::from_axes(L0, J0, P0, W0, 0)
    }

    /// Clamp the axes and derive harmony from the clamped values.
    #[must_use]
    pub fn from_axes(l: f64, j: f64, p: f64, w: f64, ticks: u64) -> Self {
        let l = clamp_axis(l);
        let j = clamp_axis(j);
        let p = clamp_axis(p);
        let w = clamp_axis(w);
        Self {
            l,
            j,
            p,
            w,
            harmony: harmony(l, j, p, w),
            ticks,
        }
    }

    #[must_use]
    pub const fn l(&self) -> f64 {
        self.l
    }

    #[must_use]
    pub const fn j(&self) -> f64 {
        self.j
    }

    #[must_use]
    pub const fn p(&self) -> f64 {
        self.p
    }

    #[must_use]
    pub const fn w(&self) -> f64 {
        self.w
    }

    #[must_use]
    pub const fn harmony(&self) -> f64 {
        self.harmony
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn band(&self) -> HarmonyBand {
        HarmonyBand::classify(self.harmony)
    }

    /// Flatten into the uniformly-typed reading handed to UI collaborators.
    #[must_use]
    pub fn reading(&self) -> ResonanceReading {
        ResonanceReading {
            l: self.l,
            j: self.j,
            p: self.p,
            w: self.w,
            harmony: self.harmony,
            ticks: self.ticks as f64,
        }
    }
}

impl Default for ResonanceState {
    fn default() -> Self {
        Self::anchored()
    }
}

/// The five numeric fields of a [`ResonanceState`] with `ticks` as a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonanceReading {
    pub l: f64,
    pub j: f64,
    pub p: f64,
    pub w: f64,
    pub harmony: f64,
    pub ticks: f64,
}

impl ResonanceReading {
    #[must_use]
    pub const fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Love => self.l,
            Axis::Justice => self.j,
            Axis::Power => self.p,
            Axis::Wisdom => self.w,
        }
    }
}

impl From<ResonanceState> for ResonanceReading {
    fn from(state: ResonanceState) -> Self {
        state.reading()
    }
}
