//! Aho-Corasick automaton with bounded-mismatch scanning.
//!
//! Nodes live in an arena and refer to each other by index. Each node caches
//! its *effective* output set, i.e. the patterns ending at the node itself or
//! at any node along its failure chain, so a scan step reports a match
//! without walking failure links.
//!
//! ## Scanning with substitutions
//!
//! With an error budget of zero the scan is the textbook Aho-Corasick walk.
//! With a budget of one or two, the exact walk is kept as the zero-error
//! state and a frontier of `(node, errors)` alignments is advanced alongside
//! it, one read symbol at a time:
//!
//! - an alignment follows the child for the read symbol at no cost, or any
//!   other child at the cost of one error while it is under budget;
//! - alignments with no transition left are dropped;
//! - every node on the failure chain of the exact state is an exact
//!   alignment of some read suffix, and each of them spawns its one-error
//!   branches at every step.
//!
//! Two frontier entries can never share a node at the same read position,
//! because the node's depth fixes where the alignment started. The frontier
//! is therefore bounded by the number of trie nodes reachable within budget
//! from the last `max_depth` start positions.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::core::types::{Pattern, ReadType};

/// Index of the root node
pub const ROOT: usize = 0;

/// Symbols with trie transitions; everything else is unknown
pub const ALPHABET: [u8; 5] = *b"ACGTN";

const ALPHABET_SIZE: usize = ALPHABET.len();

/// Symbol stored on the root node
const ROOT_SYMBOL: u8 = b'0';

/// Map a base to its child slot, `None` for symbols outside [`ALPHABET`]
#[inline]
#[must_use]
pub fn symbol_code(base: u8) -> Option<usize> {
    match base {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        b'N' => Some(4),
        _ => None,
    }
}

/// A pattern ending at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Output {
    pattern: usize,
    kind: ReadType,
}

#[derive(Debug, Clone)]
struct Node {
    symbol: u8,
    depth: usize,
    children: [Option<usize>; ALPHABET_SIZE],
    failure: usize,
    /// Own and inherited outputs, sorted by pattern index
    outputs: Vec<Output>,
}

impl Node {
    fn new(symbol: u8, depth: usize) -> Self {
        Self {
            symbol,
            depth,
            children: [None; ALPHABET_SIZE],
            failure: ROOT,
            outputs: Vec::new(),
        }
    }
}

/// First pattern occurrence found by a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Exclusive end position of the occurrence in the read
    pub end: usize,
    /// Index of the pattern in the build order
    pub pattern: usize,
    pub kind: ReadType,
    /// Substitutions consumed by the alignment that reported the hit
    pub errors: u8,
}

/// Multi-pattern matcher built once from a pattern set and shared read-only
#[derive(Debug, Clone)]
pub struct MatchAutomaton {
    nodes: Vec<Node>,
    pattern_count: usize,
}

impl MatchAutomaton {
    /// Build the trie, failure links and effective output sets.
    ///
    /// Patterns containing symbols outside [`ALPHABET`] can never be matched
    /// exactly and are left out with a warning; their index is still consumed
    /// so hit indices always refer to the caller's slice.
    pub fn build(patterns: &[Pattern]) -> Self {
        let mut automaton = Self {
            nodes: vec![Node::new(ROOT_SYMBOL, 0)],
            pattern_count: patterns.len(),
        };

        for (index, pattern) in patterns.iter().enumerate() {
            if pattern.text.is_empty() {
                warn!("Skipping empty pattern #{index}");
                continue;
            }
            if pattern.text.iter().any(|&b| symbol_code(b).is_none()) {
                warn!(
                    "Skipping pattern {} with symbols outside {}",
                    String::from_utf8_lossy(&pattern.text),
                    String::from_utf8_lossy(&ALPHABET),
                );
                continue;
            }
            automaton.insert(index, pattern);
        }

        automaton.add_failures();

        debug!(
            "Built automaton with {} nodes from {} patterns",
            automaton.nodes.len(),
            patterns.len()
        );

        automaton
    }

    fn insert(&mut self, index: usize, pattern: &Pattern) {
        let mut node = ROOT;

        for &base in &pattern.text {
            let Some(code) = symbol_code(base) else {
                return;
            };
            node = match self.nodes[node].children[code] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    let depth = self.nodes[node].depth + 1;
                    self.nodes.push(Node::new(base, depth));
                    self.nodes[node].children[code] = Some(child);
                    child
                }
            };
        }

        self.nodes[node].outputs.push(Output {
            pattern: index,
            kind: pattern.kind,
        });
    }

    /// Breadth-first failure links, merging outputs from each failure target
    fn add_failures(&mut self) {
        let mut queue = VecDeque::new();

        for child in self.nodes[ROOT].children.into_iter().flatten() {
            self.nodes[child].failure = ROOT;
            queue.push_back(child);
        }

        while let Some(node) = queue.pop_front() {
            for code in 0..ALPHABET_SIZE {
                let Some(child) = self.nodes[node].children[code] else {
                    continue;
                };

                let mut fallback = self.nodes[node].failure;
                let failure = loop {
                    if let Some(next) = self.nodes[fallback].children[code] {
                        break next;
                    }
                    if fallback == ROOT {
                        break ROOT;
                    }
                    fallback = self.nodes[fallback].failure;
                };

                self.nodes[child].failure = failure;
                // The failure target is shallower, so it was finalized earlier in BFS order
                let inherited = self.nodes[failure].outputs.clone();
                let outputs = &mut self.nodes[child].outputs;
                outputs.extend(inherited);
                outputs.sort_by_key(|o| o.pattern);

                queue.push_back(child);
            }
        }
    }

    /// Number of trie nodes including the root
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of patterns the automaton was built from
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Symbol on the edge into `node` (`'0'` for the root)
    #[must_use]
    pub fn symbol(&self, node: usize) -> u8 {
        self.nodes[node].symbol
    }

    /// Failure link target of `node`
    #[must_use]
    pub fn failure(&self, node: usize) -> usize {
        self.nodes[node].failure
    }

    /// Follow the trie, falling back along failure links when needed
    #[inline]
    fn goto(&self, mut node: usize, code: Option<usize>) -> usize {
        let Some(code) = code else {
            return ROOT;
        };
        loop {
            if let Some(child) = self.nodes[node].children[code] {
                return child;
            }
            if node == ROOT {
                return ROOT;
            }
            node = self.nodes[node].failure;
        }
    }

    /// Return the kind of the first pattern found in `sequence` with at most
    /// `max_errors` substitutions.
    #[must_use]
    pub fn scan(&self, sequence: &[u8], max_errors: u8) -> Option<ReadType> {
        self.scan_hit(sequence, max_errors).map(|hit| hit.kind)
    }

    /// Like [`scan`](Self::scan) but returns the full hit.
    ///
    /// Hits are ordered by end position in the read, then by consumed
    /// errors, then by pattern index.
    #[must_use]
    pub fn scan_hit(&self, sequence: &[u8], max_errors: u8) -> Option<Hit> {
        if max_errors == 0 {
            self.scan_exact(sequence)
        } else {
            self.scan_with_errors(sequence, max_errors)
        }
    }

    fn scan_exact(&self, sequence: &[u8]) -> Option<Hit> {
        let mut state = ROOT;

        for (pos, &base) in sequence.iter().enumerate() {
            state = self.goto(state, symbol_code(base));
            if let Some(out) = self.nodes[state].outputs.first() {
                return Some(Hit {
                    end: pos + 1,
                    pattern: out.pattern,
                    kind: out.kind,
                    errors: 0,
                });
            }
        }

        None
    }

    fn scan_with_errors(&self, sequence: &[u8], max_errors: u8) -> Option<Hit> {
        let mut state = ROOT;
        let mut frontier: Vec<(usize, u8)> = Vec::new();
        let mut next: Vec<(usize, u8)> = Vec::new();

        for (pos, &base) in sequence.iter().enumerate() {
            let code = symbol_code(base);
            next.clear();

            for &(node, errors) in &frontier {
                self.advance(node, errors, code, max_errors, &mut next);
            }

            let mut suffix = state;
            loop {
                self.branch(suffix, code, &mut next);
                if suffix == ROOT {
                    break;
                }
                suffix = self.nodes[suffix].failure;
            }

            state = self.goto(state, code);
            if let Some(out) = self.nodes[state].outputs.first() {
                return Some(Hit {
                    end: pos + 1,
                    pattern: out.pattern,
                    kind: out.kind,
                    errors: 0,
                });
            }

            let best = next
                .iter()
                .filter_map(|&(node, errors)| {
                    self.nodes[node].outputs.first().map(|out| (errors, *out))
                })
                .min_by_key(|(errors, out)| (*errors, out.pattern));

            if let Some((errors, out)) = best {
                return Some(Hit {
                    end: pos + 1,
                    pattern: out.pattern,
                    kind: out.kind,
                    errors,
                });
            }

            std::mem::swap(&mut frontier, &mut next);
        }

        None
    }

    /// Extend an alignment by one read symbol
    #[inline]
    fn advance(
        &self,
        node: usize,
        errors: u8,
        code: Option<usize>,
        max_errors: u8,
        next: &mut Vec<(usize, u8)>,
    ) {
        for (child_code, child) in self.nodes[node].children.iter().enumerate() {
            let Some(child) = *child else {
                continue;
            };
            if Some(child_code) == code {
                next.push((child, errors));
            } else if errors < max_errors {
                next.push((child, errors + 1));
            }
        }
    }

    /// Start one-error alignments from an exact one
    #[inline]
    fn branch(&self, node: usize, code: Option<usize>, next: &mut Vec<(usize, u8)>) {
        for (child_code, child) in self.nodes[node].children.iter().enumerate() {
            if let Some(child) = *child {
                if Some(child_code) != code {
                    next.push((child, 1));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADAPTER: &[u8] = b"AGATCGGAAGAGC";
    const READ: &[u8] = b"ACGTACGTAGATCGGAAGAGCACGT";

    fn automaton(patterns: &[&str]) -> MatchAutomaton {
        let patterns: Vec<Pattern> = patterns.iter().map(|p| Pattern::adapter(*p)).collect();
        MatchAutomaton::build(&patterns)
    }

    #[test]
    fn test_exact_adapter_scenario() {
        let ac = MatchAutomaton::build(&[Pattern::adapter(ADAPTER)]);
        assert_eq!(ac.scan(READ, 0), Some(ReadType::Adapter));

        let hit = ac.scan_hit(READ, 0).unwrap();
        assert_eq!(hit.end, 8 + ADAPTER.len());
        assert_eq!(hit.errors, 0);
    }

    #[test]
    fn test_one_substitution_scenario() {
        let ac = MatchAutomaton::build(&[Pattern::adapter(ADAPTER)]);
        let mut read = READ.to_vec();
        read[12] = b'A'; // C -> A inside the adapter

        assert_eq!(ac.scan(&read, 0), None);
        assert_eq!(ac.scan(&read, 1), Some(ReadType::Adapter));
        assert_eq!(ac.scan_hit(&read, 1).unwrap().errors, 1);
    }

    #[test]
    fn test_two_substitutions_need_budget_two() {
        let ac = automaton(&["AGATCGGAAGAGC"]);
        let read = b"TTTTAGTTCGGAAGTGCTTTT";

        assert_eq!(ac.scan(read, 0), None);
        assert_eq!(ac.scan(read, 1), None);
        assert_eq!(ac.scan_hit(read, 2).unwrap().errors, 2);
    }

    #[test]
    fn test_substitution_in_first_base() {
        let ac = automaton(&["GATTACA"]);
        assert_eq!(ac.scan(b"CCCTATTACACCC", 1), Some(ReadType::Adapter));
        assert_eq!(ac.scan(b"CCCTATTACACCC", 0), None);
    }

    #[test]
    fn test_failure_links_report_suffix_patterns() {
        let ac = automaton(&["ACGA", "CG"]);
        let hit = ac.scan_hit(b"TACGT", 0).unwrap();
        assert_eq!(hit.pattern, 1);
        assert_eq!(hit.end, 4);
    }

    #[test]
    fn test_failure_link_structure() {
        let ac = automaton(&["ACG", "CGT"]);
        // Nodes: root, A, AC, ACG, C, CG, CGT
        assert_eq!(ac.node_count(), 7);
        assert_eq!(ac.symbol(ROOT), b'0');
        // ACG fails to CG, AC fails to C
        assert_eq!(ac.symbol(ac.failure(3)), b'G');
        assert_eq!(ac.failure(3), 5);
        assert_eq!(ac.failure(2), 4);
        assert_eq!(ac.failure(1), ROOT);
        assert_eq!(ac.scan_hit(b"AACGTT", 0).unwrap().pattern, 0);
    }

    #[test]
    fn test_tie_break_by_pattern_order() {
        let ac = automaton(&["GGAC", "AC"]);
        assert_eq!(ac.scan_hit(b"TGGAC", 0).unwrap().pattern, 0);

        let ac = automaton(&["AC", "GGAC"]);
        assert_eq!(ac.scan_hit(b"TGGAC", 0).unwrap().pattern, 0);
    }

    #[test]
    fn test_tie_break_prefers_fewer_errors() {
        // Both end at 4: pattern 0 with one substitution, pattern 1 exactly
        let ac = automaton(&["TTCA", "GA"]);
        let hit = ac.scan_hit(b"TTGA", 1).unwrap();
        assert_eq!(hit.end, 4);
        assert_eq!(hit.pattern, 1);
        assert_eq!(hit.errors, 0);
    }

    #[test]
    fn test_earliest_position_wins_over_errors() {
        let ac = automaton(&["CCCC", "GGGGGGGG"]);
        let hit = ac.scan_hit(b"CCACGGGGGGGG", 1).unwrap();
        assert_eq!(hit.pattern, 0);
        assert_eq!(hit.errors, 1);
        assert_eq!(hit.end, 4);
    }

    #[test]
    fn test_unknown_read_symbols() {
        let ac = automaton(&["AGATCGGAAGAGC"]);
        let read = b"AGATCGG.AGAGC";
        assert_eq!(ac.scan(read, 0), None);
        assert_eq!(ac.scan(read, 1), Some(ReadType::Adapter));
        // lower case is not folded for reads
        assert_eq!(ac.scan(b"agatcggaagagc", 0), None);
    }

    #[test]
    fn test_n_is_part_of_the_alphabet() {
        let ac = automaton(&["ACNGT"]);
        assert_eq!(ac.scan(b"TTACNGTT", 0), Some(ReadType::Adapter));
        assert_eq!(ac.scan(b"TTACAGTT", 0), None);
        assert_eq!(ac.scan(b"TTACAGTT", 1), Some(ReadType::Adapter));
    }

    #[test]
    fn test_patterns_with_unknown_symbols_are_skipped() {
        let ac = automaton(&["AC-GT", "GGG"]);
        assert_eq!(ac.pattern_count(), 2);
        assert_eq!(ac.node_count(), 4);
        assert_eq!(ac.scan(b"AC-GT", 0), None);
        assert_eq!(ac.scan_hit(b"AGGGA", 0).unwrap().pattern, 1);
    }

    #[test]
    fn test_shared_prefixes_and_duplicates() {
        let ac = automaton(&["ACGT", "ACGA", "ACGT"]);
        // root + A, AC, ACG + T + A
        assert_eq!(ac.node_count(), 6);
        assert_eq!(ac.scan_hit(b"ACGT", 0).unwrap().pattern, 0);
    }

    #[test]
    fn test_node_count_bound() {
        let patterns = ["AGATCGGAAGAGC", "CTGTCTCTTATA", "AAAAAAAAAA", "ACGTN"];
        let ac = automaton(&patterns);
        let total: usize = patterns.iter().map(|p| p.len()).sum();
        assert!(ac.node_count() <= total + 1);
    }

    #[test]
    fn test_short_reads_and_empty_reads() {
        let ac = automaton(&["ACGT"]);
        assert_eq!(ac.scan(b"", 2), None);
        assert_eq!(ac.scan(b"ACG", 2), None);
        assert_eq!(ac.scan(b"TTTT", 2), None);
        assert_eq!(ac.scan(b"TTGT", 2), Some(ReadType::Adapter));
    }

    #[test]
    fn test_build_is_deterministic() {
        let patterns = ["AGATCGGAAGAGC", "GATCGG", "CTGTCTCTTATA", "TATA"];
        let a = automaton(&patterns);
        let b = automaton(&patterns);
        let reads: [&[u8]; 4] = [
            b"ACGTACGTAGATCGGAAGAGCACGT",
            b"CTGTCTCTTATACACATCT",
            b"GGGGGGGGGGGG",
            b"TACA",
        ];
        for read in reads {
            for e in 0..=2 {
                assert_eq!(a.scan_hit(read, e), b.scan_hit(read, e));
            }
        }
    }
}
