//! Readers and writers for the files the filter consumes and produces.
//!
//! - **Pattern files**: one adapter k-mer per line, optional tab-separated metadata
//! - **FASTQ files**: reads, plain or gzip/bgzip compressed
//! - **FASTA files**: source sequences for `make-library`
//!
//! ## Example
//!
//! ```rust,no_run
//! use cookiecutter::parsing::patterns::load_patterns_file;
//! use std::path::Path;
//!
//! let patterns = load_patterns_file(Path::new("fragments.dat")).unwrap();
//! println!("{} patterns", patterns.len());
//! ```

pub mod fasta;
pub mod fastq;
pub mod patterns;
