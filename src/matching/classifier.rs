use crate::core::config::{ClassifierConfig, ConfigError};
use crate::core::record::SequenceRecord;
use crate::core::types::ReadType;
use crate::matching::automaton::MatchAutomaton;
use crate::matching::complexity::ComplexityScorer;

/// Ambiguous base counted by the `n` check
const AMBIGUOUS: u8 = b'N';

/// Length of the longest run of `base` in `sequence`
#[must_use]
pub fn longest_run(sequence: &[u8], base: u8) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &b in sequence {
        if b == base {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Number of ambiguous bases in `sequence`
#[must_use]
pub fn count_ambiguous(sequence: &[u8]) -> usize {
    sequence.iter().filter(|&&b| b == AMBIGUOUS).count()
}

/// Runs the read checks in a fixed order and returns the first failure.
///
/// The order is: ambiguous bases, G run, C run, length, complexity, adapter.
/// The classifier is immutable once built and can be shared across threads.
#[derive(Debug, Clone)]
pub struct ReadClassifier {
    automaton: MatchAutomaton,
    config: ClassifierConfig,
    complexity: Option<ComplexityScorer>,
}

impl ReadClassifier {
    /// Create a classifier from a built automaton and validated thresholds.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration is out of range.
    pub fn new(automaton: MatchAutomaton, config: ClassifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let complexity = config.dust.map(ComplexityScorer::new);
        Ok(Self {
            automaton,
            config,
            complexity,
        })
    }

    #[must_use]
    pub fn automaton(&self) -> &MatchAutomaton {
        &self.automaton
    }

    #[must_use]
    pub fn classify(&self, record: &SequenceRecord) -> ReadType {
        self.classify_sequence(&record.sequence)
    }

    #[must_use]
    pub fn classify_sequence(&self, sequence: &[u8]) -> ReadType {
        if let Some(max_n) = self.config.max_n {
            if count_ambiguous(sequence) > max_n {
                return ReadType::N;
            }
        }

        let threshold = self.config.homopolymer_threshold;
        if longest_run(sequence, b'G') > threshold {
            return ReadType::PolyG;
        }
        if longest_run(sequence, b'C') > threshold {
            return ReadType::PolyC;
        }

        if sequence.len() < self.config.min_length {
            return ReadType::Length;
        }

        if let Some(scorer) = &self.complexity {
            if scorer.is_low_complexity(sequence) {
                return ReadType::Dust;
            }
        }

        self.scan_patterns(sequence).unwrap_or(ReadType::Ok)
    }

    /// Adapter scan alone, with none of the quality checks
    #[must_use]
    pub fn scan_patterns(&self, sequence: &[u8]) -> Option<ReadType> {
        self.automaton.scan(sequence, self.config.max_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DustConfig;
    use crate::core::types::Pattern;

    const ADAPTER: &[u8] = b"AGATCGGAAGAGC";

    fn config() -> ClassifierConfig {
        ClassifierConfig {
            max_errors: 0,
            min_length: 10,
            homopolymer_threshold: 20,
            max_n: Some(0),
            dust: None,
        }
    }

    fn classifier(config: ClassifierConfig) -> ReadClassifier {
        let automaton = MatchAutomaton::build(&[Pattern::adapter(ADAPTER)]);
        ReadClassifier::new(automaton, config).unwrap()
    }

    #[test]
    fn test_longest_run() {
        assert_eq!(longest_run(b"", b'G'), 0);
        assert_eq!(longest_run(b"AGGAGGGA", b'G'), 3);
        assert_eq!(longest_run(b"GGGG", b'G'), 4);
        assert_eq!(longest_run(b"GGGG", b'C'), 0);
    }

    #[test]
    fn test_count_ambiguous() {
        assert_eq!(count_ambiguous(b"ANNCGN"), 3);
        assert_eq!(count_ambiguous(b"ACGT"), 0);
    }

    #[test]
    fn test_ok_read() {
        let c = classifier(config());
        assert_eq!(c.classify_sequence(b"ACGTTGCAACGTTGCA"), ReadType::Ok);
    }

    #[test]
    fn test_adapter_read() {
        let c = classifier(config());
        assert_eq!(
            c.classify_sequence(b"ACGTACGTAGATCGGAAGAGCACGT"),
            ReadType::Adapter
        );
    }

    #[test]
    fn test_adapter_with_substitution_depends_on_budget() {
        let read = b"ACGTACGTAGATAGGAAGAGCACGT";
        assert_eq!(classifier(config()).classify_sequence(read), ReadType::Ok);

        let tolerant = classifier(ClassifierConfig {
            max_errors: 1,
            ..config()
        });
        assert_eq!(tolerant.classify_sequence(read), ReadType::Adapter);
    }

    #[test]
    fn test_short_read_with_adapter_is_length() {
        let c = classifier(ClassifierConfig {
            min_length: 30,
            ..config()
        });
        let read = b"ACGAGATCGGAAGAGCACGT";
        assert_eq!(read.len(), 20);
        assert_eq!(c.classify_sequence(read), ReadType::Length);
    }

    #[test]
    fn test_scan_patterns_skips_quality_checks() {
        let c = classifier(config());
        let mut read = ADAPTER.to_vec();
        read.extend_from_slice(&[b'G'; 30]);

        assert_eq!(c.classify_sequence(&read), ReadType::PolyG);
        assert_eq!(c.scan_patterns(&read), Some(ReadType::Adapter));
        assert_eq!(c.scan_patterns(b"ACGTTGCAACGTTGCA"), None);
    }

    #[test]
    fn test_poly_g() {
        let c = classifier(config());
        assert_eq!(c.classify_sequence(&[b'G'; 50]), ReadType::PolyG);
    }

    #[test]
    fn test_run_at_threshold_passes() {
        let c = classifier(config());
        let mut read = vec![b'C'; 20];
        read.extend_from_slice(b"ATATAT");
        assert_eq!(c.classify_sequence(&read), ReadType::Ok);
        read.insert(0, b'C');
        assert_eq!(c.classify_sequence(&read), ReadType::PolyC);
    }

    #[test]
    fn test_poly_g_checked_before_poly_c() {
        let c = classifier(config());
        let mut read = vec![b'C'; 30];
        read.extend_from_slice(&[b'G'; 25]);
        assert_eq!(c.classify_sequence(&read), ReadType::PolyG);
    }

    #[test]
    fn test_n_takes_precedence() {
        let c = classifier(ClassifierConfig {
            min_length: 100,
            ..config()
        });
        // Fails every check; N comes first
        let mut read = vec![b'G'; 30];
        read.push(b'N');
        read.extend_from_slice(ADAPTER);
        assert_eq!(c.classify_sequence(&read), ReadType::N);
    }

    #[test]
    fn test_n_check_disabled_and_limit() {
        let read = b"ACGTNACGTNACGTACGT";
        let disabled = classifier(ClassifierConfig {
            max_n: None,
            ..config()
        });
        assert_eq!(disabled.classify_sequence(read), ReadType::Ok);

        let limit_two = classifier(ClassifierConfig {
            max_n: Some(2),
            ..config()
        });
        assert_eq!(limit_two.classify_sequence(read), ReadType::Ok);

        let limit_one = classifier(ClassifierConfig {
            max_n: Some(1),
            ..config()
        });
        assert_eq!(limit_one.classify_sequence(read), ReadType::N);
    }

    #[test]
    fn test_homopolymer_before_length() {
        let c = classifier(ClassifierConfig {
            min_length: 100,
            ..config()
        });
        assert_eq!(c.classify_sequence(&[b'G'; 50]), ReadType::PolyG);
    }

    #[test]
    fn test_dust_before_adapter() {
        let dust = Some(DustConfig {
            window: 64,
            cutoff: 2.0,
        });
        let c = classifier(ClassifierConfig { dust, ..config() });
        let mut read = b"CA".repeat(20);
        read.extend_from_slice(ADAPTER);
        assert_eq!(c.classify_sequence(&read), ReadType::Dust);

        let without = classifier(config());
        assert_eq!(without.classify_sequence(&read), ReadType::Adapter);
    }

    #[test]
    fn test_length_before_dust() {
        let dust = Some(DustConfig {
            window: 64,
            cutoff: 2.0,
        });
        let c = classifier(ClassifierConfig {
            dust,
            min_length: 100,
            ..config()
        });
        assert_eq!(c.classify_sequence(&b"CA".repeat(20)), ReadType::Length);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let automaton = MatchAutomaton::build(&[Pattern::adapter(ADAPTER)]);
        let result = ReadClassifier::new(
            automaton,
            ClassifierConfig {
                max_errors: 3,
                ..config()
            },
        );
        assert!(matches!(result, Err(ConfigError::InvalidErrorBudget(3))));
    }

    #[test]
    fn test_classify_does_not_touch_record() {
        let c = classifier(config());
        let record = SequenceRecord::new("r1", "ACGTACGTAGATCGGAAGAGCACGT", "IIIIIIIIIIIIIIIIIIIIIIIII");
        let before = record.clone();
        assert_eq!(c.classify(&record), ReadType::Adapter);
        assert_eq!(record, before);
    }
}
