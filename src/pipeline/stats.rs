use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::core::types::ReadType;

#[inline]
fn count_to_f64(count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Verdict counters for one input file.
///
/// In paired mode each mate stream has its own `Stats`. A mate that is `ok`
/// is either written as part of a concordant pair or discarded because the
/// other mate failed; the two cases are counted separately. `written` is
/// counted by the pipeline as it writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Input file the counters describe
    pub file: String,

    /// Records classified
    pub total: u64,

    /// Records per verdict, every verdict present
    pub counts: BTreeMap<ReadType, u64>,

    /// Whether the file was processed as one mate of a pair
    pub paired: bool,

    /// Ok mates written as part of a concordant pair
    pub concordant: u64,

    /// Ok mates dropped because the other mate failed
    pub mate_discarded: u64,

    /// Records written to the primary output
    pub written: u64,
}

impl Stats {
    #[must_use]
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            total: 0,
            counts: ReadType::ALL.iter().map(|&t| (t, 0)).collect(),
            paired: false,
            concordant: 0,
            mate_discarded: 0,
            written: 0,
        }
    }

    /// Stats for one mate stream of a pair
    #[must_use]
    pub fn new_paired(file: impl Into<String>) -> Self {
        Self {
            paired: true,
            ..Self::new(file)
        }
    }

    /// Record the verdict of a single-end read
    pub fn update(&mut self, read_type: ReadType) {
        self.total += 1;
        *self.counts.entry(read_type).or_insert(0) += 1;
    }

    /// Record the verdict of one mate and whether its pair was written
    pub fn update_paired(&mut self, read_type: ReadType, pair_passed: bool) {
        self.update(read_type);
        if read_type.is_ok() {
            if pair_passed {
                self.concordant += 1;
            } else {
                self.mate_discarded += 1;
            }
        }
    }

    #[must_use]
    pub fn count(&self, read_type: ReadType) -> u64 {
        self.counts.get(&read_type).copied().unwrap_or(0)
    }

    pub fn mark_written(&mut self) {
        self.written += 1;
    }

    /// Fraction of records written, 0 when nothing was processed
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count_to_f64(self.written) / count_to_f64(self.total)
        }
    }

    /// Human-readable summary block
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.file);
        let _ = writeln!(out, "  {:<16}{}", "total", self.total);
        for (read_type, count) in &self.counts {
            let _ = writeln!(out, "  {:<16}{count}", read_type.name());
        }
        if self.paired {
            let _ = writeln!(out, "  {:<16}{}", "concordant", self.concordant);
            let _ = writeln!(out, "  {:<16}{}", "mate_discarded", self.mate_discarded);
        }
        let _ = writeln!(out, "  {:<16}{}", "written", self.written);
        let _ = writeln!(out, "  {:<16}{:.2}%", "pass_rate", self.pass_rate() * 100.0);
        out
    }

    /// Column names matching [`to_tsv_row`](Self::to_tsv_row)
    #[must_use]
    pub fn tsv_header() -> String {
        let mut columns = vec!["file".to_string(), "total".to_string()];
        columns.extend(ReadType::ALL.iter().map(|t| t.name().to_string()));
        columns.extend(
            ["concordant", "mate_discarded", "written", "pass_rate"]
                .iter()
                .map(ToString::to_string),
        );
        columns.join("\t")
    }

    #[must_use]
    pub fn to_tsv_row(&self) -> String {
        let mut fields = vec![self.file.clone(), self.total.to_string()];
        fields.extend(ReadType::ALL.iter().map(|&t| self.count(t).to_string()));
        fields.push(self.concordant.to_string());
        fields.push(self.mate_discarded.to_string());
        fields.push(self.written.to_string());
        fields.push(format!("{:.4}", self.pass_rate()));
        fields.join("\t")
    }
}
