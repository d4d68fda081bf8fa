//! Candidate search over the bit-plane streams of one byte offset.
//!
//! The true plane of the message is unknown, so the search may take the next
//! character from any plane, but only next to a space: a word is always read
//! from a single plane. From every start position the search walks forward
//! depth first, tries planes in index order, and scores a candidate once all
//! of its extensions have failed. The first accepted candidate wins, so longer
//! extensions beat their prefixes and lower planes beat higher ones.
//!
//! The walk keeps an explicit stack instead of recursing, with a depth cap
//! and a per-start node budget. Sibling branches that both append a space
//! produce the same candidate and the same subtree, so only the first is
//! expanded. Word counts are kept incrementally, which makes scoring a node
//! a single dictionary lookup.
//!
//! A node is abandoned early when even a space at every remaining position
//! could not bring its word count up to the scorer's minimum. The number of
//! spaces still reachable is precomputed once per set of streams.
//!
//! An accepted candidate whose last word is unrecognized is cut back to the
//! nearest sentence end, so noise read past the end of a message is dropped.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::text::charset::{is_message_char, is_sentence_end, is_separator};
use crate::text::score::Scorer;

/// Default cap on the length of a recovered message.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 4096;

/// Default number of nodes expanded per start position.
pub const DEFAULT_NODE_BUDGET: usize = 2_000_000;

/// Bounds on the work done by one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Candidates never grow past this many characters.
    pub max_message_len: usize,
    /// Nodes expanded from one start position before it is abandoned.
    pub node_budget: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            node_budget: DEFAULT_NODE_BUDGET,
        }
    }
}

/// A message accepted by the scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    /// The recovered text.
    pub message: String,
    /// Index of the first character within the candidate streams.
    pub start: usize,
    /// Planes that supplied the message, in order of first use.
    pub planes: Vec<usize>,
}

/// Result of searching from one start position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Found(Found),
    NotFound,
    /// The node budget ran out before the search space was exhausted.
    BudgetExhausted,
    /// A search at a lower byte offset already found a message.
    Cancelled,
}

/// One node of the depth-first walk.
struct Frame {
    /// Plane that supplied the character leading to this node.
    source: usize,
    /// Next plane to try as a child.
    next: usize,
    /// A space child was already expanded.
    spaced: bool,
}

/// A completed word, remembered so it can be undone on backtrack.
#[derive(Clone)]
struct WordMark {
    start: usize,
    recognized: bool,
}

/// Candidate text plus incremental word statistics.
#[derive(Clone)]
struct Candidate<'s> {
    scorer: &'s Scorer,
    text: String,
    word_start: usize,
    recognized: usize,
    completed: Vec<WordMark>,
}

impl<'s> Candidate<'s> {
    fn new(scorer: &'s Scorer) -> Self {
        Self {
            scorer,
            text: String::new(),
            word_start: 0,
            recognized: 0,
            completed: Vec::new(),
        }
    }

    fn last(&self) -> Option<u8> {
        self.text.as_bytes().last().copied()
    }

    fn push(&mut self, byte: u8) {
        if is_separator(byte) {
            let recognized = self.scorer.recognizes(&self.text[self.word_start..]);
            self.recognized += usize::from(recognized);
            self.completed.push(WordMark {
                start: self.word_start,
                recognized,
            });
            self.text.push(byte as char);
            self.word_start = self.text.len();
        } else {
            self.text.push(byte as char);
        }
    }

    fn pop(&mut self) {
        if let Some(ch) = self.text.pop() {
            if is_separator(ch as u8) {
                if let Some(mark) = self.completed.pop() {
                    self.recognized -= usize::from(mark.recognized);
                    self.word_start = mark.start;
                }
            }
        }
    }

    fn trailing_recognized(&self) -> bool {
        self.scorer.recognizes(&self.text[self.word_start..])
    }

    fn accepted(&self) -> bool {
        let words = self.completed.len() + 1;
        if words < self.scorer.min_words() {
            return false;
        }
        let trailing = usize::from(self.trailing_recognized());
        self.scorer.accepts(words, self.recognized + trailing)
    }

    /// Number of characters to drop from an accepted candidate.
    ///
    /// Nonzero only when the last word is unrecognized and cutting back,
    /// without passing a recognized word, reaches an accepted prefix that
    /// ends a sentence with a recognized word.
    fn settle(&self) -> usize {
        if self.trailing_recognized() {
            return 0;
        }

        let mut trial = self.clone();
        let mut dropped = 0;
        while !trial.text.is_empty() {
            trial.pop();
            dropped += 1;

            let recognized = trial.trailing_recognized();
            if recognized && trial.last().is_some_and(is_sentence_end) && trial.accepted() {
                return dropped;
            }
            if recognized {
                break;
            }
        }
        0
    }
}

/// For every stream position, an upper bound on the spaces a candidate can
/// still take from there on.
///
/// A position counts if any plane holds a space there. The count resets at
/// positions where no plane holds a message character, since no candidate
/// passes them.
fn separator_reach(streams: &[Vec<u8>]) -> Vec<usize> {
    let len = streams.iter().map(Vec::len).max().unwrap_or(0);
    let mut reach = vec![0usize; len + 1];

    for pos in (0..len).rev() {
        let bytes = || streams.iter().filter_map(|s| s.get(pos).copied());
        if !bytes().any(is_message_char) {
            continue;
        }
        reach[pos] = reach[pos + 1] + usize::from(bytes().any(is_separator));
    }
    reach
}

/// Backtracking search for a message in a set of candidate streams.
#[derive(Debug, Clone)]
pub struct Searcher<'a> {
    scorer: &'a Scorer,
    limits: SearchLimits,
    /// Lowest byte offset with a message so far, and the offset searched here.
    cancel: Option<(&'a AtomicUsize, usize)>,
}

impl<'a> Searcher<'a> {
    pub fn new(scorer: &'a Scorer, limits: SearchLimits) -> Self {
        Self {
            scorer,
            limits,
            cancel: None,
        }
    }

    /// Stops the search once `best` holds an offset below `offset`.
    ///
    /// Searches of several byte offsets running side by side share `best`;
    /// whichever finds a message lowers it to its own offset.
    pub fn with_cancellation(mut self, best: &'a AtomicUsize, offset: usize) -> Self {
        self.cancel = Some((best, offset));
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .is_some_and(|(best, offset)| best.load(Ordering::Relaxed) < offset)
    }

    /// Tries every start position in order and returns the first message the
    /// scorer accepts.
    pub fn find_message(&self, streams: &[Vec<u8>]) -> Option<Found> {
        let len = streams.iter().map(Vec::len).min().unwrap_or(0);
        let reach = separator_reach(streams);

        for start in 0..len {
            match self.search_with(streams, &reach, start) {
                StartOutcome::Found(found) => return Some(found),
                StartOutcome::NotFound => {}
                StartOutcome::Cancelled => {
                    log::debug!("Search cancelled at start position {}", start);
                    return None;
                }
                StartOutcome::BudgetExhausted => {
                    log::warn!(
                        "Search budget of {} nodes exhausted at start position {}; skipping",
                        self.limits.node_budget,
                        start
                    );
                }
            }
        }

        None
    }

    /// Depth-first search for a message beginning at `start`.
    pub fn search_from(&self, streams: &[Vec<u8>], start: usize) -> StartOutcome {
        self.search_with(streams, &separator_reach(streams), start)
    }

    fn search_with(&self, streams: &[Vec<u8>], reach: &[usize], start: usize) -> StartOutcome {
        // A start whose first character is illegal everywhere has no candidates
        // beyond the empty one, which never scores.
        if !streams
            .iter()
            .any(|s| s.get(start).copied().is_some_and(is_message_char))
        {
            return StartOutcome::NotFound;
        }

        let mut candidate = Candidate::new(self.scorer);
        let mut stack = vec![Frame {
            source: 0,
            next: 0,
            spaced: false,
        }];
        let mut expanded = 0usize;
        let min_words = self.scorer.min_words();

        while let Some(frame) = stack.last_mut() {
            if self.cancelled() {
                return StartOutcome::Cancelled;
            }

            let pos = start + candidate.text.len();
            let reachable = candidate.completed.len() + 1 + reach.get(pos).copied().unwrap_or(0);
            let child = if reachable < min_words {
                None
            } else if candidate.text.len() < self.limits.max_message_len {
                next_child(streams, pos, frame, candidate.last())
            } else {
                None
            };

            match child {
                Some((plane, byte)) => {
                    expanded += 1;
                    if expanded > self.limits.node_budget {
                        return StartOutcome::BudgetExhausted;
                    }
                    candidate.push(byte);
                    stack.push(Frame {
                        source: plane,
                        next: 0,
                        spaced: false,
                    });
                }
                None => {
                    if candidate.accepted() {
                        for _ in 0..candidate.settle() {
                            candidate.pop();
                            stack.pop();
                        }
                        let planes = planes_used(&stack);
                        return StartOutcome::Found(Found {
                            message: candidate.text,
                            start,
                            planes,
                        });
                    }
                    stack.pop();
                    candidate.pop();
                }
            }
        }

        StartOutcome::NotFound
    }
}

/// Advances `frame` to its next admissible child at stream index `pos`.
fn next_child(streams: &[Vec<u8>], pos: usize, frame: &mut Frame, last: Option<u8>) -> Option<(usize, u8)> {
    while frame.next < streams.len() {
        let plane = frame.next;
        frame.next += 1;

        let Some(&byte) = streams[plane].get(pos) else {
            continue;
        };
        if !is_message_char(byte) {
            continue;
        }

        let space = is_separator(byte);
        let switching = plane != frame.source;
        if switching && !space && last.is_some_and(|c| !is_separator(c)) {
            continue;
        }

        if space {
            if frame.spaced {
                continue;
            }
            frame.spaced = true;
        }

        return Some((plane, byte));
    }
    None
}

/// Distinct planes along the current path, in order of first use.
fn planes_used(stack: &[Frame]) -> Vec<usize> {
    let mut planes = Vec::new();
    for frame in stack.iter().skip(1) {
        if !planes.contains(&frame.source) {
            planes.push(frame.source);
        }
    }
    planes
}
