use std::io;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::record::SequenceRecord;
use crate::core::types::ReadType;
use crate::matching::classifier::ReadClassifier;
use crate::pipeline::stats::Stats;
use crate::pipeline::{RecordSink, RecordSource};

/// Records between two progress log lines
pub const PROGRESS_INTERVAL: u64 = 1_000_000;

/// Records classified together on the thread pool
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot start classification threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Which reads go to the primary output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Keep reads that pass every check
    #[default]
    Filter,
    /// Keep reads with a pattern hit; the quality checks are skipped
    Extract,
}

impl Mode {
    fn verdict(self, classifier: &ReadClassifier, record: &SequenceRecord) -> ReadType {
        match self {
            Self::Filter => classifier.classify(record),
            Self::Extract => classifier
                .scan_patterns(&record.sequence)
                .unwrap_or(ReadType::Ok),
        }
    }

    fn keeps(self, read_type: ReadType) -> bool {
        match self {
            Self::Filter => read_type.is_ok(),
            Self::Extract => !read_type.is_ok(),
        }
    }

    /// Filtering needs both mates to pass, extraction either mate to hit
    fn keeps_pair(self, first: ReadType, second: ReadType) -> bool {
        match self {
            Self::Filter => self.keeps(first) && self.keeps(second),
            Self::Extract => self.keeps(first) || self.keeps(second),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Classification threads; 1 classifies on the calling thread
    pub threads: usize,
    pub batch_size: usize,
    pub mode: Mode,
    /// Records between two progress log lines, 0 disables them
    pub progress_interval: u64,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            batch_size: DEFAULT_BATCH_SIZE,
            mode: Mode::Filter,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

/// Where the reads of one input stream go
pub struct Destination<'a> {
    /// Receives kept reads unchanged
    pub ok: &'a mut dyn RecordSink,
    /// Receives the other reads with `:<verdict>` appended to the identifier
    pub filtered: Option<&'a mut dyn RecordSink>,
    pub stats: &'a mut Stats,
}

impl<'a> Destination<'a> {
    pub fn new(ok: &'a mut dyn RecordSink, stats: &'a mut Stats) -> Self {
        Self {
            ok,
            filtered: None,
            stats,
        }
    }

    #[must_use]
    pub fn with_filtered(mut self, filtered: &'a mut dyn RecordSink) -> Self {
        self.filtered = Some(filtered);
        self
    }

    fn accept(&mut self, record: &SequenceRecord) -> io::Result<()> {
        self.ok.write(record)?;
        self.stats.mark_written();
        Ok(())
    }

    fn reject(&mut self, mut record: SequenceRecord, read_type: ReadType) -> io::Result<()> {
        if let Some(sink) = self.filtered.as_deref_mut() {
            record.tag_with(read_type);
            sink.write(&record)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ok.flush()?;
        if let Some(sink) = self.filtered.as_deref_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

/// Maps batches in input order, on a local pool when more than one thread is asked for
struct Batcher {
    pool: Option<ThreadPool>,
}

impl Batcher {
    fn new(threads: usize) -> Result<Self, FilterError> {
        let pool = if threads > 1 {
            debug!("Classifying on {threads} threads");
            Some(ThreadPoolBuilder::new().num_threads(threads).build()?)
        } else {
            None
        };
        Ok(Self { pool })
    }

    fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.par_iter().map(&f).collect()),
            None => items.iter().map(f).collect(),
        }
    }
}

#[inline]
fn progress_due(processed: u64, interval: u64) -> bool {
    interval > 0 && processed % interval == 0
}

#[inline]
fn report_progress(processed: u64, interval: u64) {
    if progress_due(processed, interval) {
        info!("Processed: {processed}");
    }
}

/// Filter a single-end stream.
///
/// Every record is counted in the destination's stats. Kept records go to
/// the ok sink, the others to the filtered sink when there is one. In
/// [`Mode::Filter`] a record is kept when it is `ok`; in [`Mode::Extract`]
/// when the pattern scan hits. Returns the number of records processed.
///
/// # Errors
///
/// Returns `FilterError::Io` if reading or writing fails.
pub fn filter_single(
    classifier: &ReadClassifier,
    source: &mut dyn RecordSource,
    mut out: Destination<'_>,
    options: &FilterOptions,
) -> Result<u64, FilterError> {
    let batcher = Batcher::new(options.threads)?;
    let batch_size = options.batch_size.max(1);
    let mut batch = Vec::with_capacity(batch_size);
    let mut processed = 0_u64;

    loop {
        while batch.len() < batch_size {
            match source.read_next()? {
                Some(record) => batch.push(record),
                None => break,
            }
        }
        let exhausted = batch.len() < batch_size;

        let mode = options.mode;
        let verdicts = batcher.map(&batch, |record| mode.verdict(classifier, record));
        for (record, read_type) in batch.drain(..).zip(verdicts) {
            out.stats.update(read_type);
            if mode.keeps(read_type) {
                out.accept(&record)?;
            } else {
                out.reject(record, read_type)?;
            }
            processed += 1;
            report_progress(processed, options.progress_interval);
        }

        if exhausted {
            break;
        }
    }

    out.flush()?;
    Ok(processed)
}

/// Next pair of records, `None` as soon as either stream ends
fn next_pair(
    first: &mut dyn RecordSource,
    second: &mut dyn RecordSource,
) -> io::Result<Option<(SequenceRecord, SequenceRecord)>> {
    match (first.read_next()?, second.read_next()?) {
        (Some(r1), Some(r2)) => Ok(Some((r1, r2))),
        (None, None) => Ok(None),
        (Some(_), None) => {
            warn!("Second reads file ended first; remaining reads of the first file are ignored");
            Ok(None)
        }
        (None, Some(_)) => {
            warn!("First reads file ended first; remaining reads of the second file are ignored");
            Ok(None)
        }
    }
}

/// Filter two mate streams in lock-step.
///
/// The Nth record of `first` is paired with the Nth record of `second`.
/// When filtering, a pair is written to both ok sinks only if both mates are
/// `ok`. When extracting, a pair is written if either mate has a pattern
/// hit. Other pairs go to the filtered sinks. Processing stops at the end of
/// the shorter stream. Returns the number of pairs processed.
///
/// # Errors
///
/// Returns `FilterError::Io` if reading or writing fails.
pub fn filter_paired(
    classifier: &ReadClassifier,
    first: &mut dyn RecordSource,
    second: &mut dyn RecordSource,
    mut out1: Destination<'_>,
    mut out2: Destination<'_>,
    options: &FilterOptions,
) -> Result<u64, FilterError> {
    let batcher = Batcher::new(options.threads)?;
    let batch_size = options.batch_size.max(1);
    let mut batch = Vec::with_capacity(batch_size);
    let mut processed = 0_u64;

    loop {
        while batch.len() < batch_size {
            match next_pair(first, second)? {
                Some(pair) => batch.push(pair),
                None => break,
            }
        }
        let exhausted = batch.len() < batch_size;

        let mode = options.mode;
        let verdicts = batcher.map(&batch, |(r1, r2)| {
            (mode.verdict(classifier, r1), mode.verdict(classifier, r2))
        });
        for ((r1, r2), (t1, t2)) in batch.drain(..).zip(verdicts) {
            let keep = mode.keeps_pair(t1, t2);
            match mode {
                Mode::Filter => {
                    out1.stats.update_paired(t1, keep);
                    out2.stats.update_paired(t2, keep);
                }
                Mode::Extract => {
                    out1.stats.update(t1);
                    out2.stats.update(t2);
                }
            }

            if keep {
                out1.accept(&r1)?;
                out2.accept(&r2)?;
            } else {
                out1.reject(r1, t1)?;
                out2.reject(r2, t2)?;
            }
            processed += 1;
            report_progress(processed, options.progress_interval);
        }

        if exhausted {
            break;
        }
    }

    out1.flush()?;
    out2.flush()?;
    Ok(processed)
}
