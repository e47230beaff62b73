//! FASTQ reading and writing using noodles.
//!
//! Inputs may be uncompressed or gzip/bgzip compressed; compression is
//! detected from the file extension (`.gz`, `.bgz`). Outputs are always
//! uncompressed FASTQ.
//!
//! A record that cannot be parsed (a truncated final record, a missing `@`
//! or `+` line) ends the stream: everything before it is processed and the
//! rest of the file is ignored with a warning.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use noodles::fastq;
use thiserror::Error;
use tracing::warn;

use crate::core::record::SequenceRecord;
use crate::pipeline::{RecordSink, RecordSource};

#[derive(Error, Debug)]
pub enum FastqError {
    #[error("Cannot open reads file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot open output file {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Boxed input stream, plain or decompressed
pub type DynBufRead = Box<dyn BufRead + Send>;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a FASTQ file for reading, decompressing if needed.
///
/// # Errors
///
/// Returns `FastqError::Open` if the file cannot be opened.
pub fn open_reader(path: &Path) -> Result<FastqReader<DynBufRead>, FastqError> {
    let file = File::open(path).map_err(|source| FastqError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let inner: DynBufRead = if is_gzipped(path) {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(FastqReader::new(inner))
}

/// Create (or truncate) a FASTQ output file.
///
/// # Errors
///
/// Returns `FastqError::Create` if the file cannot be created.
pub fn create_writer(path: &Path) -> Result<FastqWriter<BufWriter<File>>, FastqError> {
    let file = File::create(path).map_err(|source| FastqError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FastqWriter::new(BufWriter::new(file)))
}

/// Record source over a noodles FASTQ reader
pub struct FastqReader<R> {
    inner: fastq::io::Reader<R>,
    record: fastq::Record,
    exhausted: bool,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: fastq::io::Reader::new(inner),
            record: fastq::Record::default(),
            exhausted: false,
        }
    }
}

impl<R: BufRead> RecordSource for FastqReader<R> {
    fn read_next(&mut self) -> io::Result<Option<SequenceRecord>> {
        if self.exhausted {
            return Ok(None);
        }

        match self.inner.read_record(&mut self.record) {
            Ok(0) => {
                self.exhausted = true;
                Ok(None)
            }
            Ok(_) => Ok(Some(to_sequence_record(&self.record))),
            Err(e) if matches!(e.kind(), io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof) => {
                warn!("Malformed FASTQ record, treating as end of input: {e}");
                self.exhausted = true;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn to_sequence_record(record: &fastq::Record) -> SequenceRecord {
    let mut id = record.name().to_vec();
    let description = record.description();
    if !description.is_empty() {
        id.push(b' ');
        id.extend_from_slice(description);
    }

    SequenceRecord {
        id,
        sequence: record.sequence().to_vec(),
        quality: record.quality_scores().to_vec(),
    }
}

/// Record sink writing FASTQ through noodles
pub struct FastqWriter<W: Write> {
    inner: W,
}

impl<W: Write> FastqWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RecordSink for FastqWriter<W> {
    fn write(&mut self, record: &SequenceRecord) -> io::Result<()> {
        // The full identifier line goes into the name so spacing is kept verbatim
        let definition = fastq::record::Definition::new(record.id.clone(), Vec::new());
        let record = fastq::Record::new(definition, record.sequence.clone(), record.quality.clone());
        fastq::io::Writer::new(&mut self.inner).write_record(&record)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
