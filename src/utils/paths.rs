//! Output file naming.
//!
//! Each input `<dir>/<name>` gets `<out_dir>/<name>.ok.fastq`, plus
//! `<out_dir>/<name>.filtered.fastq` when failed reads are kept. The full
//! input file name is used as the base, extension included.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Suffix of the file receiving reads that passed
pub const OK_SUFFIX: &str = "ok";

/// Suffix of the file receiving reads that failed
pub const FILTERED_SUFFIX: &str = "filtered";

/// Suffix of the file receiving pattern hits in extract mode
pub const EXTRACTED_SUFFIX: &str = "extracted";

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Output directory {} does not exist, failed to create: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output path {} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Input path {} has no file name", .0.display())]
    NoFileName(PathBuf),

    #[error("Inputs {} and {} would write to the same output files", .0.display(), .1.display())]
    DuplicateBasename(PathBuf, PathBuf),
}

/// File name of an input, used as the base of its output names
///
/// # Errors
///
/// Returns `PathError::NoFileName` for paths such as `/` or `..`.
pub fn input_basename(input: &Path) -> Result<String, PathError> {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| PathError::NoFileName(input.to_path_buf()))
}

/// `<out_dir>/<input file name>.<suffix>.fastq`
///
/// # Errors
///
/// Returns `PathError::NoFileName` if the input has no file name.
pub fn output_path(out_dir: &Path, input: &Path, suffix: &str) -> Result<PathBuf, PathError> {
    let basename = input_basename(input)?;
    Ok(out_dir.join(format!("{basename}.{suffix}.fastq")))
}

/// Create the output directory (and parents) if it does not exist
///
/// # Errors
///
/// Returns `PathError::NotADirectory` if the path exists as a file, or
/// `PathError::CreateDir` if it cannot be created.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PathError> {
    if dir.exists() && !dir.is_dir() {
        return Err(PathError::NotADirectory(dir.to_path_buf()));
    }
    std::fs::create_dir_all(dir).map_err(|source| PathError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Reject input lists where two files share a name and would overwrite
/// each other's outputs
///
/// # Errors
///
/// Returns `PathError::DuplicateBasename` naming the first clash.
pub fn check_distinct_basenames<'a, I>(inputs: I) -> Result<(), PathError>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let mut seen: HashMap<String, &PathBuf> = HashMap::new();

    for input in inputs {
        if let Some(first) = seen.insert(input_basename(input)?, input) {
            return Err(PathError::DuplicateBasename(first.clone(), input.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_keeps_full_name() {
        let path = output_path(Path::new("out"), Path::new("/data/reads.fastq"), OK_SUFFIX).unwrap();
        assert_eq!(path, PathBuf::from("out/reads.fastq.ok.fastq"));

        let path = output_path(Path::new("out"), Path::new("r1.fq.gz"), FILTERED_SUFFIX).unwrap();
        assert_eq!(path, PathBuf::from("out/r1.fq.gz.filtered.fastq"));

        let path = output_path(Path::new("out"), Path::new("r1.fq"), EXTRACTED_SUFFIX).unwrap();
        assert_eq!(path, PathBuf::from("out/r1.fq.extracted.fastq"));
    }

    #[test]
    fn test_output_path_without_file_name() {
        let result = output_path(Path::new("out"), Path::new("/"), OK_SUFFIX);
        assert!(matches!(result, Err(PathError::NoFileName(_))));
    }

    #[test]
    fn test_ensure_output_dir_creates_nested() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        ensure_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // Existing directory is fine
        ensure_output_dir(&dir).unwrap();
    }

    #[test]
    fn test_ensure_output_dir_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            ensure_output_dir(&file),
            Err(PathError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_duplicate_basenames() {
        let inputs = vec![
            PathBuf::from("a/reads.fastq"),
            PathBuf::from("b/other.fastq"),
            PathBuf::from("c/reads.fastq"),
        ];
        match check_distinct_basenames(&inputs) {
            Err(PathError::DuplicateBasename(first, second)) => {
                assert_eq!(first, PathBuf::from("a/reads.fastq"));
                assert_eq!(second, PathBuf::from("c/reads.fastq"));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(check_distinct_basenames(&inputs[..2]).is_ok());
    }
}
