//! Read classification: adapter matching and the quality check battery.
//!
//! - [`MatchAutomaton`]: Aho-Corasick automaton over the adapter patterns,
//!   scanning with up to two substitutions
//! - [`ComplexityScorer`]: DUST-style low-complexity score over sliding windows
//! - [`ReadClassifier`]: runs every check in a fixed order and returns one
//!   [`ReadType`](crate::core::types::ReadType) per read
//!
//! ## Check order
//!
//! 1. **Ambiguous bases**: more `N` than allowed
//! 2. **Homopolymers**: a G run, then a C run, longer than the threshold
//! 3. **Length**: shorter than the minimum
//! 4. **Complexity**: a DUST window at or above the cutoff
//! 5. **Adapter**: a pattern within the error budget
//!
//! ## Example
//!
//! ```rust
//! use cookiecutter::core::{ClassifierConfig, Pattern, ReadType};
//! use cookiecutter::matching::{MatchAutomaton, ReadClassifier};
//!
//! let automaton = MatchAutomaton::build(&[Pattern::adapter("AGATCGGAAGAGC")]);
//! let config = ClassifierConfig {
//!     max_errors: 1,
//!     min_length: 20,
//!     homopolymer_threshold: 13,
//!     max_n: None,
//!     dust: None,
//! };
//! let classifier = ReadClassifier::new(automaton, config).unwrap();
//!
//! assert_eq!(
//!     classifier.classify_sequence(b"ACGTACGTAGATCGGAAGAGCACGT"),
//!     ReadType::Adapter
//! );
//! ```

pub mod automaton;
pub mod classifier;
pub mod complexity;

pub use automaton::{Hit, MatchAutomaton};
pub use classifier::ReadClassifier;
pub use complexity::ComplexityScorer;
