//! # cookiecutter
//!
//! A library for filtering sequencing reads by adapter patterns and simple
//! quality checks.
//!
//! Every read gets exactly one verdict. The checks run in a fixed order and
//! the first failure wins, so the statistics of a run are reproducible:
//!
//! 1. too many ambiguous (`N`) bases
//! 2. a G run, then a C run, longer than the homopolymer threshold
//! 3. shorter than the minimum length
//! 4. a low-complexity (DUST) window
//! 5. an adapter pattern within the substitution budget
//!
//! Adapter matching uses one Aho-Corasick automaton over all patterns,
//! extended to tolerate up to two substitutions in a single pass over the read.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use cookiecutter::{ClassifierConfig, MatchAutomaton, ReadClassifier, Stats};
//! use cookiecutter::parsing::fastq::{create_writer, open_reader};
//! use cookiecutter::parsing::patterns::load_patterns_file;
//! use cookiecutter::pipeline::{filter_single, Destination, FilterOptions};
//!
//! let patterns = load_patterns_file(Path::new("adapters.dat")).unwrap();
//! let config = ClassifierConfig {
//!     max_errors: 1,
//!     min_length: 50,
//!     homopolymer_threshold: 13,
//!     max_n: Some(0),
//!     dust: None,
//! };
//! let classifier = ReadClassifier::new(MatchAutomaton::build(&patterns), config).unwrap();
//!
//! let mut reader = open_reader(Path::new("reads.fastq.gz")).unwrap();
//! let mut ok = create_writer(Path::new("reads.ok.fastq")).unwrap();
//! let mut stats = Stats::new("reads.fastq.gz");
//!
//! filter_single(
//!     &classifier,
//!     &mut reader,
//!     Destination::new(&mut ok, &mut stats),
//!     &FilterOptions::default(),
//! )
//! .unwrap();
//! print!("{}", stats.to_text());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Verdicts, patterns, records and classifier configuration
//! - [`parsing`]: Pattern files, FASTQ and FASTA input/output
//! - [`matching`]: Automaton, complexity scorer and read classifier
//! - [`pipeline`]: Single-end and paired-end filtering, statistics
//! - [`library`]: K-mer pattern libraries from FASTA files
//! - [`cli`]: Command-line interface implementation
//! - [`utils`]: Output naming helpers

pub mod cli;
pub mod core;
pub mod library;
pub mod matching;
pub mod parsing;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::config::{ClassifierConfig, ConfigError, DustConfig};
pub use crate::core::record::SequenceRecord;
pub use crate::core::types::{Pattern, ReadType};
pub use crate::matching::automaton::MatchAutomaton;
pub use crate::matching::classifier::ReadClassifier;
pub use crate::pipeline::stats::Stats;
