//! Input normalization
//!
//! Turns a raw command line into a canonical token sequence: case folding,
//! punctuation stripping, whitespace collapse, then synonym rewriting over
//! the token stream. The whole pass is pure and idempotent, which keeps
//! matching deterministic.

use std::collections::HashMap;

/// A compiled synonym phrase: source tokens and their canonical replacement
#[derive(Debug, Clone)]
struct SynonymPhrase {
    from: Vec<String>,
    to: Vec<String>,
}

/// Token-stream normalizer with a synonym table
///
/// Synonym phrases are applied longest-first in a single left-to-right
/// pass. Replacement tokens are canonical vocabulary and never themselves
/// synonym keys, so a second normalization pass is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    phrases: Vec<SynonymPhrase>,
}

impl Normalizer {
    /// Build a normalizer from a synonym map (phrase -> canonical phrase)
    pub fn new(synonyms: &HashMap<String, String>) -> Self {
        let mut phrases: Vec<SynonymPhrase> = synonyms
            .iter()
            .map(|(from, to)| SynonymPhrase {
                from: from.split_whitespace().map(str::to_lowercase).collect(),
                to: to.split_whitespace().map(str::to_lowercase).collect(),
            })
            .filter(|p| !p.from.is_empty())
            .collect();

        // Longest phrase first so "scale down" wins over "scale"
        phrases.sort_by(|a, b| {
            b.from
                .len()
                .cmp(&a.from.len())
                .then_with(|| a.from.cmp(&b.from))
        });

        Self { phrases }
    }

    /// Normalize a raw input line into canonical tokens
    ///
    /// Empty input yields an empty token sequence, which the matcher treats
    /// as "no match".
    pub fn normalize(&self, input: &str) -> Vec<String> {
        let tokens: Vec<String> = input
            .split_whitespace()
            .filter_map(|word| {
                let cleaned: String = word
                    .to_lowercase()
                    .chars()
                    .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                    .collect();
                if cleaned.is_empty() {
                    None
                } else {
                    Some(cleaned)
                }
            })
            .collect();

        self.apply_synonyms(tokens)
    }

    /// Rewrite synonym phrases over the token stream, longest match first
    fn apply_synonyms(&self, tokens: Vec<String>) -> Vec<String> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;

        while i < tokens.len() {
            let matched = self
                .phrases
                .iter()
                .find(|p| tokens[i..].len() >= p.from.len() && tokens[i..i + p.from.len()] == p.from[..]);

            match matched {
                Some(phrase) => {
                    out.extend(phrase.to.iter().cloned());
                    i += phrase.from.len();
                }
                None => {
                    out.push(tokens[i].clone());
                    i += 1;
                }
            }
        }

        out
    }
}
