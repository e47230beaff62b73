//! Streaming read filtering.
//!
//! The pipeline pulls records from a [`RecordSource`], classifies them in
//! batches and pushes survivors to a [`RecordSink`], counting every verdict
//! in a [`Stats`] per input file. Output order always follows input order,
//! whatever the number of classification threads.

use std::io;

use crate::core::record::SequenceRecord;

pub mod filter;
pub mod stats;

pub use filter::{filter_paired, filter_single, Destination, FilterError, FilterOptions, Mode};
pub use stats::Stats;

/// A stream of reads
pub trait RecordSource {
    /// Next record, or `None` once the stream is exhausted
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the underlying stream cannot be read.
    fn read_next(&mut self) -> io::Result<Option<SequenceRecord>>;
}

/// A destination for reads
pub trait RecordSink {
    /// # Errors
    ///
    /// Returns an I/O error if the record cannot be written.
    fn write(&mut self, record: &SequenceRecord) -> io::Result<()>;

    /// # Errors
    ///
    /// Returns an I/O error if buffered records cannot be written.
    fn flush(&mut self) -> io::Result<()>;
}

impl RecordSource for std::vec::IntoIter<SequenceRecord> {
    fn read_next(&mut self) -> io::Result<Option<SequenceRecord>> {
        Ok(self.next())
    }
}

impl RecordSink for Vec<SequenceRecord> {
    fn write(&mut self, record: &SequenceRecord) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
