use crate::core::types::ReadType;

/// A single FASTQ record.
///
/// The separator line is not kept; records are always written back with a
/// bare `+`. Sequence and quality lengths are not checked against each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequenceRecord {
    /// Identifier line without the leading `@`
    pub id: Vec<u8>,

    /// Base calls
    pub sequence: Vec<u8>,

    /// Quality string, same encoding as the input
    pub quality: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(
        id: impl Into<Vec<u8>>,
        sequence: impl Into<Vec<u8>>,
        quality: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
            quality: quality.into(),
        }
    }

    /// Append `:<verdict>` to the identifier
    pub fn tag_with(&mut self, read_type: ReadType) {
        self.id.push(b':');
        self.id.extend_from_slice(read_type.name().as_bytes());
    }
}
