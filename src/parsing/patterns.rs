use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

use crate::core::types::Pattern;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("patterns are empty")]
    EmptyPatternSet,
}

/// Load adapter patterns from a file, one per line.
///
/// # Errors
///
/// Returns `PatternError::Io` if the file cannot be opened or read, or
/// `PatternError::EmptyPatternSet` if it holds no patterns.
pub fn load_patterns_file(path: &Path) -> Result<Vec<Pattern>, PatternError> {
    let file = std::fs::File::open(path)?;
    load_patterns(std::io::BufReader::new(file))
}

/// Load adapter patterns from a reader, one per line.
///
/// Each line is upper-cased and cut at the first tab; the remainder is
/// metadata (e.g. the k-mer count written by `make-library`). Blank lines
/// are skipped. Order is preserved and duplicates are kept.
///
/// # Errors
///
/// Returns `PatternError::Io` on a read failure, or
/// `PatternError::EmptyPatternSet` if no line yields a pattern.
pub fn load_patterns<R: BufRead>(reader: R) -> Result<Vec<Pattern>, PatternError> {
    let mut patterns = Vec::new();

    for line in reader.split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        let text = match line.iter().position(|&b| b == b'\t') {
            Some(tab) => &line[..tab],
            None => &line[..],
        };
        if text.is_empty() {
            continue;
        }

        patterns.push(Pattern::adapter(text.to_ascii_uppercase()));
    }

    if patterns.is_empty() {
        return Err(PatternError::EmptyPatternSet);
    }

    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ReadType;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn texts(patterns: &[Pattern]) -> Vec<&[u8]> {
        patterns.iter().map(|p| p.text.as_slice()).collect()
    }

    #[test]
    fn test_load_patterns_case_fold_and_tab() {
        let input = "agatcggaagagc\t12\nACGTACGT\n\nttttN\tsome\tmore\n";
        let patterns = load_patterns(Cursor::new(input)).unwrap();

        assert_eq!(
            texts(&patterns),
            vec![&b"AGATCGGAAGAGC"[..], b"ACGTACGT", b"TTTTN"]
        );
        assert!(patterns.iter().all(|p| p.kind == ReadType::Adapter));
    }

    #[test]
    fn test_load_patterns_keeps_duplicates_and_order() {
        let patterns = load_patterns(Cursor::new("CCC\nAAA\nccc\n")).unwrap();
        assert_eq!(texts(&patterns), vec![&b"CCC"[..], b"AAA", b"CCC"]);
    }

    #[test]
    fn test_load_patterns_no_alphabet_validation() {
        let patterns = load_patterns(Cursor::new("ac-gx\r\n")).unwrap();
        assert_eq!(texts(&patterns), vec![&b"AC-GX"[..]]);
    }

    #[test]
    fn test_load_patterns_empty() {
        let result = load_patterns(Cursor::new("\n\n\t123\n"));
        assert!(matches!(result, Err(PatternError::EmptyPatternSet)));
    }

    #[test]
    fn test_load_patterns_file() {
        let mut temp = NamedTempFile::with_suffix(".dat").unwrap();
        temp.write_all(b"AGATCGGAAGAGC\t3\n").unwrap();
        temp.flush().unwrap();

        let patterns = load_patterns_file(temp.path()).unwrap();
        assert_eq!(patterns.len(), 1);
    }

    #[test]
    fn test_load_patterns_missing_file() {
        let result = load_patterns_file(Path::new("/nonexistent/fragments.dat"));
        assert!(matches!(result, Err(PatternError::Io(_))));
    }
}
