use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported substitution budget for adapter matching
pub const MAX_ERROR_BUDGET: u8 = 2;

/// Shortest DUST window that still contains a triplet
pub const MIN_DUST_WINDOW: usize = 3;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid error budget {0}: possible errors count are 0, 1, 2")]
    InvalidErrorBudget(u8),

    #[error("Invalid DUST window {0}: must be at least {MIN_DUST_WINDOW}")]
    InvalidDustWindow(usize),

    #[error("Invalid DUST cutoff {0}: must be a finite, non-negative number")]
    InvalidDustCutoff(f64),
}

/// Parameters of the low-complexity check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DustConfig {
    /// Scoring window size in bases
    pub window: usize,
    /// A read fails when any window scores at or above this value
    pub cutoff: f64,
}

/// Thresholds consumed by the read classifier.
///
/// There is deliberately no `Default`: every run states its thresholds.
/// The command line supplies the product defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Substitutions tolerated when matching adapter patterns (0, 1 or 2)
    pub max_errors: u8,

    /// Reads shorter than this are rejected as `length`
    pub min_length: usize,

    /// Reads with a G or C run longer than this are rejected as `polyG`/`polyC`
    pub homopolymer_threshold: usize,

    /// Reads with more `N` bases than this are rejected as `n`; `None` disables the check
    pub max_n: Option<usize>,

    /// Low-complexity check; `None` disables it
    pub dust: Option<DustConfig>,
}

impl ClassifierConfig {
    /// Check that all values are in range
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidErrorBudget` when `max_errors` exceeds
    /// [`MAX_ERROR_BUDGET`], or a DUST error for a window shorter than a
    /// triplet or a cutoff that is negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_errors > MAX_ERROR_BUDGET {
            return Err(ConfigError::InvalidErrorBudget(self.max_errors));
        }
        if let Some(dust) = &self.dust {
            if dust.window < MIN_DUST_WINDOW {
                return Err(ConfigError::InvalidDustWindow(dust.window));
            }
            if !dust.cutoff.is_finite() || dust.cutoff < 0.0 {
                return Err(ConfigError::InvalidDustCutoff(dust.cutoff));
            }
        }
        Ok(())
    }
}
