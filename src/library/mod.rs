//! Pattern libraries built from FASTA sequences.
//!
//! [`KmerLibrary`] counts every k-mer of the input sequences and of their
//! reverse complements. Its output (`kmer<TAB>count`, sorted by k-mer) is a
//! valid pattern file for `cookiecutter filter`.

pub mod builder;

pub use builder::{reverse_complement, KmerLibrary, LibraryError};
