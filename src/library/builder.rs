use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::parsing::fasta::{for_each_sequence, FastaError};

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("FASTA error: {0}")]
    Fasta(#[from] FastaError),

    #[error("Invalid k-mer length {0}: must be at least 1")]
    InvalidKmerLength(usize),
}

/// Complement of a base, `None` for symbols that have none
#[inline]
fn complement(base: u8) -> Option<u8> {
    match base {
        b'A' => Some(b'T'),
        b'T' => Some(b'A'),
        b'C' => Some(b'G'),
        b'G' => Some(b'C'),
        b'N' => Some(b'N'),
        _ => None,
    }
}

/// Reverse complement of an upper-case sequence; bases without a
/// complement are dropped
#[must_use]
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().rev().filter_map(|&b| complement(b)).collect()
}

/// Counts of every k-mer of a set of sequences and their reverse complements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerLibrary {
    k: usize,
    kmers: BTreeMap<Vec<u8>, u64>,
}

impl KmerLibrary {
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidKmerLength` if `k` is zero.
    pub fn new(k: usize) -> Result<Self, LibraryError> {
        if k == 0 {
            return Err(LibraryError::InvalidKmerLength(k));
        }
        Ok(Self {
            k,
            kmers: BTreeMap::new(),
        })
    }

    /// Build a library from every record of a FASTA file
    ///
    /// # Errors
    ///
    /// Returns an error if `k` is zero or the file cannot be read.
    pub fn from_fasta(path: &Path, k: usize) -> Result<Self, LibraryError> {
        let mut library = Self::new(k)?;
        let records = for_each_sequence(path, |_, sequence| library.add_sequence(sequence))?;
        debug!(
            "Collected {} distinct {k}-mers from {records} sequences",
            library.len()
        );
        Ok(library)
    }

    /// Count the k-mers of `sequence` (upper-cased, whitespace removed)
    pub fn add_sequence(&mut self, sequence: &[u8]) {
        let sequence: Vec<u8> = sequence
            .iter()
            .filter(|b| !b.is_ascii_whitespace())
            .map(u8::to_ascii_uppercase)
            .collect();

        for kmer in sequence.windows(self.k) {
            *self.kmers.entry(kmer.to_vec()).or_insert(0) += 1;
            *self.kmers.entry(reverse_complement(kmer)).or_insert(0) += 1;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }

    #[must_use]
    pub fn count(&self, kmer: &[u8]) -> u64 {
        self.kmers.get(kmer).copied().unwrap_or(0)
    }

    /// K-mers with their counts, sorted by k-mer
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u64)> {
        self.kmers.iter().map(|(kmer, &count)| (kmer.as_slice(), count))
    }

    /// Write `kmer<TAB>count` lines, sorted by k-mer
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (kmer, count) in self.iter() {
            writer.write_all(kmer)?;
            writeln!(writer, "\t{count}")?;
        }
        writer.flush()
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Io` if the file cannot be created or written.
    pub fn write_file(&self, path: &Path) -> Result<(), LibraryError> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        Ok(())
    }
}
