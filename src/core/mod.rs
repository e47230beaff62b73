//! Core data types for read classification.
//!
//! - [`ReadType`]: the verdict assigned to a read, also the kind of a pattern
//! - [`Pattern`]: a sequence searched for in reads
//! - [`SequenceRecord`]: one FASTQ record (identifier, sequence, quality)
//! - [`ClassifierConfig`], [`DustConfig`]: thresholds for the check battery
//!
//! ## Verdicts
//!
//! | Verdict   | Meaning                                   |
//! |-----------|-------------------------------------------|
//! | `ok`      | passed every check                        |
//! | `n`       | too many ambiguous bases                  |
//! | `polyG`   | G homopolymer run above threshold         |
//! | `polyC`   | C homopolymer run above threshold         |
//! | `length`  | shorter than the minimum length           |
//! | `dust`    | low-complexity window above the cutoff    |
//! | `adapter` | contains a pattern within the error budget|

pub mod config;
pub mod record;
pub mod types;

pub use config::{ClassifierConfig, ConfigError, DustConfig};
pub use record::SequenceRecord;
pub use types::{Pattern, ReadType};
