//! DUST-style low-complexity scoring.
//!
//! A window's score is the number of repeated triplet pairs it contains,
//! `sum(c * (c - 1) / 2)` over the counts `c` of each distinct triplet,
//! divided by the window length in bases. Only triplets over `ACGT` are
//! counted. The score is updated incrementally as the window slides one base
//! at a time.

use crate::core::config::DustConfig;

const TRIPLET: usize = 3;
const TRIPLET_KINDS: usize = 64;

#[inline]
fn to_f64(value: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        value as f64
    }
}

#[inline]
fn base_code(base: u8) -> Option<usize> {
    match base {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// Index of a triplet in `0..64`, `None` if it holds anything but `ACGT`
#[inline]
fn triplet_code(triplet: &[u8]) -> Option<usize> {
    triplet
        .iter()
        .try_fold(0, |code, &base| Some(code * 4 + base_code(base)?))
}

/// Sliding-window low-complexity scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexityScorer {
    window: usize,
    cutoff: f64,
}

impl ComplexityScorer {
    #[must_use]
    pub fn new(config: DustConfig) -> Self {
        Self {
            window: config.window,
            cutoff: config.cutoff,
        }
    }

    /// True when any window scores at or above the cutoff
    #[must_use]
    pub fn is_low_complexity(&self, sequence: &[u8]) -> bool {
        self.scan_windows(sequence, |score| score >= self.cutoff)
    }

    /// Highest window score of the sequence (0 for reads without a triplet)
    #[must_use]
    pub fn max_score(&self, sequence: &[u8]) -> f64 {
        let mut max = 0.0_f64;
        self.scan_windows(sequence, |score| {
            max = max.max(score);
            false
        });
        max
    }

    /// Feed window scores to `visit` from left to right, stopping as soon
    /// as it returns `true`. Returns whether it stopped early.
    fn scan_windows<F>(&self, sequence: &[u8], mut visit: F) -> bool
    where
        F: FnMut(f64) -> bool,
    {
        let window = self.window.min(sequence.len());
        let span = (window + 1).saturating_sub(TRIPLET);
        if span == 0 {
            return visit(0.0);
        }

        let length = to_f64(window as u64);
        let code_at = |start: usize| triplet_code(&sequence[start..start + TRIPLET]);

        let mut counts = [0_u64; TRIPLET_KINDS];
        let mut pairs = 0_u64;

        for code in (0..span).filter_map(code_at) {
            pairs += counts[code];
            counts[code] += 1;
        }
        if visit(to_f64(pairs) / length) {
            return true;
        }

        let triplets = sequence.len() + 1 - TRIPLET;
        for start in 1..=(triplets - span) {
            if let Some(old) = code_at(start - 1) {
                counts[old] -= 1;
                pairs -= counts[old];
            }
            if let Some(new) = code_at(start + span - 1) {
                pairs += counts[new];
                counts[new] += 1;
            }
            if visit(to_f64(pairs) / length) {
                return true;
            }
        }

        false
    }
}
