// Bigram transition model over note tokens.
//
// `TransitionModel` maps each token to the tokens observed immediately after
// it, with how often each pair occurred. It is built once from the corpus by
// pure commutative counting and never mutated afterwards; generation borrows
// it immutably, so any number of threads can share one model.
//
// Both levels are `BTreeMap`s. Iteration order is then a function of the
// token strings alone, which is what makes a seeded walk reproducible (the
// sampler and the uniform fallback both index into key order).
//
// Models can be saved to and loaded from JSON for inspection or reuse.
// Every count in a model is >= 1: zero-count entries in a prepared map or a
// loaded file are dropped on the way in. A token whose successor map ends up
// empty is kept, and the generator treats it exactly like an unseen one.

use crate::error::LoadError;
use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Observed successors of one token. Key: next token. Value: pair count (>= 1).
pub type TransitionCounts = BTreeMap<Token, u32>;

/// Order-1 Markov model: token -> successor counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<Token, TransitionCounts>",
    into = "BTreeMap<Token, TransitionCounts>"
)]
pub struct TransitionModel {
    transitions: BTreeMap<Token, TransitionCounts>,
}

impl TransitionModel {
    /// Count every adjacent pair across all sequences.
    ///
    /// Sequences of length 0 or 1 contribute nothing. The result depends only
    /// on the multiset of pairs, not on sequence order.
    pub fn build<'a, I>(sequences: I) -> Self
    where
        I: IntoIterator<Item = &'a [Token]>,
    {
        let mut transitions: BTreeMap<Token, TransitionCounts> = BTreeMap::new();
        for seq in sequences {
            for pair in seq.windows(2) {
                *transitions
                    .entry(pair[0].clone())
                    .or_default()
                    .entry(pair[1].clone())
                    .or_insert(0) += 1;
            }
        }
        TransitionModel { transitions }
    }

    /// Convenience for owned corpora (`Vec<Sequence>`).
    pub fn from_sequences(sequences: &[Vec<Token>]) -> Self {
        Self::build(sequences.iter().map(Vec::as_slice))
    }

    /// Build directly from a prepared map. Zero counts are dropped; tokens
    /// left with no successors stay as keys.
    pub fn from_map(mut transitions: BTreeMap<Token, TransitionCounts>) -> Self {
        for next in transitions.values_mut() {
            next.retain(|_, count| *count > 0);
        }
        TransitionModel { transitions }
    }

    /// Successor counts for `token`, if it was ever seen as a predecessor.
    pub fn successors(&self, token: &str) -> Option<&TransitionCounts> {
        self.transitions.get(token)
    }

    /// Count for the ordered pair (`from`, `to`), zero if never observed.
    pub fn count(&self, from: &str, to: &str) -> u32 {
        self.successors(from)
            .and_then(|next| next.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// All predecessor tokens, in key order. This is the uniform fallback pool.
    pub fn tokens(&self) -> impl ExactSizeIterator<Item = &Token> {
        self.transitions.keys()
    }

    /// Number of distinct predecessor tokens.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Sum of all pair counts.
    pub fn total_transitions(&self) -> u64 {
        self.transitions
            .values()
            .flat_map(|next| next.values())
            .map(|&c| u64::from(c))
            .sum()
    }

    /// Parse a model from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let model: TransitionModel = serde_json::from_str(json)?;
        Ok(model)
    }

    /// Load from a JSON file written by `save`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let data = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data).map_err(|source| LoadError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Write as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
    }
}

impl From<BTreeMap<Token, TransitionCounts>> for TransitionModel {
    fn from(transitions: BTreeMap<Token, TransitionCounts>) -> Self {
        TransitionModel::from_map(transitions)
    }
}

impl From<TransitionModel> for BTreeMap<Token, TransitionCounts> {
    fn from(model: TransitionModel) -> Self {
        model.transitions
    }
}
