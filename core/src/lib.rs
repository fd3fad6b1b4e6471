//! Resonance scoring for Resonant Notepad.
//!
//! Three layers, evaluated leaf-first:
//!
//! - **`signal`**: pure text statistics mapped to a [`TargetVector`]
//! - **`engine`**: the stateful integrator that owns the [`ResonanceState`]
//! - **`controller`**: decision tables for autosave cadence and guidance
//!
//! Everything here is synchronous and infallible. Callers decide when to
//! evaluate; nothing in this crate owns a timer.
//!
//! The `benchmark` module replays scripted sessions through fresh controllers
//! and summarizes the resulting harmony trajectories.

pub mod benchmark;
mod controller;
mod engine;
mod signal;

pub use controller::{
    AUTOSAVE_MAX_SECONDS, AUTOSAVE_MIN_SECONDS, EMPTY_TEXT_AUTOSAVE_SECONDS, Guidance,
    ResonanceController, autosave_interval_for, guidance_for,
};
pub use engine::{DT, Decay, ResonanceEngine};
pub use signal::{TextStats, extract, is_blank, is_space, word_count};

pub use notepad_types::{ResonanceReading, ResonanceState, TargetVector};
