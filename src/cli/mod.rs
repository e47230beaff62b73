//! Command-line interface for cookiecutter.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **filter**: Remove reads containing adapter patterns or failing quality checks
//! - **make-library**: Build a pattern file of k-mers from a FASTA file
//!
//! ## Usage
//!
//! ```text
//! # Single-end reads, one substitution allowed
//! cookiecutter filter -i reads.fastq.gz -f adapters.dat -o out/ --errors 1
//!
//! # Paired-end reads with DUST and N filtering, statistics as JSON
//! cookiecutter --format json filter -1 r1.fq -2 r2.fq -f adapters.dat -o out/ --dust --filter-n
//!
//! # Build a pattern file of 13-mers
//! cookiecutter make-library -i adapters.fa -o adapters.dat -l 13
//! ```

use clap::{Parser, Subcommand};

pub mod filter;
pub mod make_library;

#[derive(Parser)]
#[command(name = "cookiecutter")]
#[command(version)]
#[command(about = "Filter sequencing reads by adapter patterns and quality checks")]
#[command(
    long_about = "cookiecutter removes reads that contain known adapter or contaminant k-mers.\n\nEach read gets exactly one verdict, checked in this order:\n- n: too many ambiguous bases\n- polyG / polyC: a G or C run above the threshold\n- length: shorter than the minimum\n- dust: a low-complexity window\n- adapter: a pattern found with at most --errors substitutions\n- ok: written to the output"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Statistics output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter FASTQ reads against a pattern file
    Filter(filter::FilterArgs),

    /// Build a k-mer pattern file from a FASTA file
    MakeLibrary(make_library::MakeLibraryArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
