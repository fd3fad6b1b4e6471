//! Heuristic signal extraction.
//!
//! Each target is a first-order proxy for its axis, not a ground truth:
//!
//! - **L** (Love / connection): density of connector words.
//! - **J** (Justice / clarity): density of punctuation marks.
//! - **P** (Power / density): characters per line.
//! - **W** (Wisdom / intent): question rate plus words per line.

use std::sync::LazyLock;

use regex::Regex;

use notepad_types::TargetVector;

static CONNECTORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:and|with|together|because|therefore|so)\b")
        .expect("valid connector regex")
});

const PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '!', '?'];

/// Unicode whitespace plus the ASCII separators `\x1c`..=`\x1f`.
#[must_use]
pub fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ('\x1c'..='\x1f').contains(&ch)
}

/// `true` for empty or whitespace-only text.
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_space)
}

/// Runs of non-whitespace characters.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split(is_space).filter(|word| !word.is_empty()).count()
}

/// Raw counts gathered in a single pass over a text snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub chars: usize,
    pub words: usize,
    /// Line breaks plus one; never zero.
    pub lines: usize,
    pub punctuation: usize,
    pub question_marks: usize,
    pub connectors: usize,
}

impl TextStats {
    #[must_use]
    pub fn of(text: &str) -> Self {
        let mut chars = 0;
        let mut breaks = 0;
        let mut punctuation = 0;
        let mut question_marks = 0;
        for ch in text.chars() {
            chars += 1;
            match ch {
                '\n' => breaks += 1,
                '?' => {
                    punctuation += 1;
                    question_marks += 1;
                }
                c if PUNCTUATION.contains(&c) => punctuation += 1,
                _ => {}
            }
        }

        Self {
            chars,
            words: word_count(text),
            lines: breaks + 1,
            punctuation,
            question_marks,
            connectors: CONNECTORS.find_iter(text).count(),
        }
    }

    /// Map the counts onto per-axis targets.
    ///
    /// The additive base keeps every target at or above 0.30; only the upper
    /// bound needs an explicit clamp.
    #[must_use]
    pub fn targets(&self) -> TargetVector {
        let words = self.words.max(1) as f64;
        let lines = self.lines.max(1) as f64;

        let l = 0.35 + (self.connectors as f64 / words) * 2.0;
        let j = 0.35 + (self.punctuation as f64 / words) * 1.6;
        let p = 0.30 + (self.chars as f64 / lines) / 250.0;
        let w = 0.30
            + (self.question_marks as f64 / lines) * 0.5
            + (self.words as f64 / lines) / 90.0;

        TargetVector::new(l.min(1.0), j.min(1.0), p.min(1.0), w.min(1.0))
    }
}

/// Extract raw per-axis targets from a text snapshot.
///
/// Pure and total: blank input yields [`TargetVector::BOOTSTRAP`].
#[must_use]
pub fn extract(text: &str) -> TargetVector {
    if is_blank(text) {
        return TargetVector::BOOTSTRAP;
    }
    TextStats::of(text).targets()
}
