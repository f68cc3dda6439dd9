//! Token stacks.
//!
//! Good tokens and bonus tokens are both plain point values. A stack is built
//! from a table of values and always yields its most valuable token first.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single token: its point value
pub type Token = u32;

/// A stack of tokens, top of the stack at the end of the vector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStack {
    tokens: Vec<Token>,
}

impl TokenStack {
    /// Build a stack whose draws come out in non-increasing value order
    pub fn from_values(values: &[Token]) -> Self {
        let mut tokens = values.to_vec();
        tokens.sort_unstable();
        Self { tokens }
    }

    /// Build a stack in random order (official bonus token rule)
    pub fn shuffled<R: Rng>(values: &[Token], rng: &mut R) -> Self {
        let mut tokens = values.to_vec();
        tokens.shuffle(rng);
        Self { tokens }
    }

    /// Take the top token
    pub fn draw(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    /// Value of the next token, if any
    pub fn peek(&self) -> Option<Token> {
        self.tokens.last().copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Remaining tokens in draw order
    pub fn draw_order(&self) -> impl Iterator<Item = Token> + '_ {
        self.tokens.iter().rev().copied()
    }
}
