use crate::stack::{TechnologyRecord, TechnologyRegistry};
use std::collections::HashMap;
use tracing::trace;

/// Longest run of tokens tried as one technology name.
pub const MAX_WINDOW: usize = 3;

/// A maximal run of `[a-z0-9]` in normalized text, with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    /// The next token follows after a single `.`, as in `node.js`.
    pub dotted: bool,
}

/// Splits normalized text into whole-word tokens.
///
/// Anything that is not an ASCII letter or digit separates tokens, so
/// `"reactive"` is a single token and never yields `"react"`.
pub fn find_candidates(normalized: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in normalized.char_indices() {
        let is_word = c.is_ascii_alphanumeric();
        match (is_word, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                let dotted = c == '.'
                    && normalized[i + 1..]
                        .starts_with(|n: char| n.is_ascii_alphanumeric());
                tokens.push(Token {
                    text: &normalized[s..i],
                    start: s,
                    end: i,
                    dotted,
                });
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        tokens.push(Token {
            text: &normalized[s..],
            start: s,
            end: normalized.len(),
            dotted: false,
        });
    }

    tokens
}

/// Lookup key for a window: dot-joined tokens fuse (`node.js` -> `nodejs`),
/// other separators become one space.
fn window_key(window: &[Token<'_>]) -> String {
    let mut key = String::new();
    for (i, token) in window.iter().enumerate() {
        if i > 0 && !window[i - 1].dotted {
            key.push(' ');
        }
        key.push_str(token.text);
    }
    key
}

/// One distinct technology found in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct TechMatch<'r> {
    pub record: &'r TechnologyRecord,
    /// Text of the first occurrence, separators included.
    pub matched_text: String,
    pub occurrences: usize,
}

/// Registry-driven whole-word matcher.
///
/// At each token position the longest window (up to [`MAX_WINDOW`] words,
/// where dot-joined tokens count as one word) that resolves in the registry
/// wins, and scanning resumes after it. A dotted pair that resolves to
/// nothing falls back to its separate words, so `react.django` finds both.
pub struct Matcher<'r> {
    registry: &'r TechnologyRegistry,
    max_window: usize,
}

impl<'r> Matcher<'r> {
    pub fn new(registry: &'r TechnologyRegistry) -> Self {
        let max_window = registry.max_name_words().clamp(1, MAX_WINDOW);
        Self {
            registry,
            max_window,
        }
    }

    /// Matches in first-seen order, one entry per technology.
    pub fn find_matches(&self, normalized: &str) -> Vec<TechMatch<'r>> {
        let tokens = find_candidates(normalized);
        let mut matches: Vec<TechMatch<'r>> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        let mut pos = 0;
        while pos < tokens.len() {
            let widest = self.widest_window(&tokens[pos..]);
            let hit = (1..=widest).rev().find_map(|width| {
                let window = &tokens[pos..pos + width];
                self.registry
                    .lookup_normalized(&window_key(window))
                    .map(|record| (record, width))
            });

            let Some((record, width)) = hit else {
                pos += 1;
                continue;
            };

            let span = &normalized[tokens[pos].start..tokens[pos + width - 1].end];
            trace!(technology = %record.name, text = span, "Matched");

            match seen.get(&record.key()) {
                Some(&idx) => matches[idx].occurrences += 1,
                None => {
                    seen.insert(record.key(), matches.len());
                    matches.push(TechMatch {
                        record,
                        matched_text: span.to_string(),
                        occurrences: 1,
                    });
                }
            }
            pos += width;
        }

        matches
    }

    /// Token count of the widest window starting at `tokens[0]`.
    fn widest_window(&self, tokens: &[Token<'_>]) -> usize {
        let limit = tokens.len().min(self.max_window * 2);
        let mut words = 1;
        let mut width = 1;
        while width < limit {
            if !tokens[width - 1].dotted {
                words += 1;
            }
            if words > self.max_window {
                break;
            }
            width += 1;
        }
        width
    }
}
