use serde::{Deserialize, Serialize};

/// Classification outcome of a read, also used as the kind of a pattern.
///
/// `Ok` means no check failed; every other variant names the check that
/// rejected the read. Patterns loaded from a pattern file are always tagged
/// [`ReadType::Adapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadType {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "adapter")]
    Adapter,
    #[serde(rename = "n")]
    N,
    #[serde(rename = "polyG")]
    PolyG,
    #[serde(rename = "polyC")]
    PolyC,
    #[serde(rename = "length")]
    Length,
    #[serde(rename = "dust")]
    Dust,
}

impl ReadType {
    /// Number of variants
    pub const COUNT: usize = 7;

    /// All variants in reporting order
    pub const ALL: [ReadType; Self::COUNT] = [
        Self::Ok,
        Self::Adapter,
        Self::N,
        Self::PolyG,
        Self::PolyC,
        Self::Length,
        Self::Dust,
    ];

    /// Stable name used in read identifiers and reports
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Adapter => "adapter",
            Self::N => "n",
            Self::PolyG => "polyG",
            Self::PolyC => "polyC",
            Self::Length => "length",
            Self::Dust => "dust",
        }
    }

    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// A sequence to search for in reads, with the verdict it produces on a hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Upper-cased pattern text
    pub text: Vec<u8>,
    pub kind: ReadType,
}

impl Pattern {
    pub fn new(text: impl Into<Vec<u8>>, kind: ReadType) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn adapter(text: impl Into<Vec<u8>>) -> Self {
        Self::new(text, ReadType::Adapter)
    }
}

impl std::fmt::Display for ReadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
