//! Parser for FASTA files using noodles.
//!
//! Streams sequences from FASTA files for k-mer library construction.
//! Supports both uncompressed and gzip/bgzip compressed files.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use thiserror::Error;

use crate::parsing::fastq::is_gzipped;

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("No sequences found in FASTA file")]
    Empty,
}

/// Call `on_sequence(name, sequence)` for every record of a FASTA file.
///
/// Returns the number of records visited.
///
/// # Errors
///
/// Returns `FastaError::Io` if the file cannot be read, `FastaError::Noodles`
/// if a record cannot be parsed, or `FastaError::Empty` if there are no records.
pub fn for_each_sequence<F>(path: &Path, on_sequence: F) -> Result<usize, FastaError>
where
    F: FnMut(&[u8], &[u8]),
{
    let file = std::fs::File::open(path)?;

    if is_gzipped(path) {
        let reader = BufReader::new(MultiGzDecoder::new(file));
        visit_reader(&mut fasta::io::Reader::new(reader), on_sequence)
    } else {
        let reader = BufReader::new(file);
        visit_reader(&mut fasta::io::Reader::new(reader), on_sequence)
    }
}

fn visit_reader<R, F>(reader: &mut fasta::io::Reader<R>, mut on_sequence: F) -> Result<usize, FastaError>
where
    R: BufRead,
    F: FnMut(&[u8], &[u8]),
{
    let mut count = 0;

    for result in reader.records() {
        let record = result
            .map_err(|e| FastaError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let name: &[u8] = record.name();
        on_sequence(name, record.sequence().as_ref());
        count += 1;
    }

    if count == 0 {
        return Err(FastaError::Empty);
    }

    Ok(count)
}
