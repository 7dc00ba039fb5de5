// Tokens and melodies.
//
// A `Token` is an opaque note identifier such as "C#4". The core compares
// tokens by exact string equality and never looks inside them; only the MIDI
// collaborators (`pitch.rs`, `midi.rs`) interpret them as pitches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One pitched note event, by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(name: impl Into<String>) -> Self {
        Token(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token(s)
    }
}

impl std::borrow::Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One training melody.
pub type Sequence = Vec<Token>;

/// Build a sequence from string literals. Mostly for tests and fixtures.
pub fn sequence<S: AsRef<str>>(names: &[S]) -> Sequence {
    names.iter().map(|n| Token::new(n.as_ref())).collect()
}

/// A generated melody: the start token followed by the generated tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Melody(Vec<Token>);

impl Melody {
    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        Melody(tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.0
    }
}

/// Space-separated, the same layout the text corpus uses.
impl fmt::Display for Melody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
