//! Player state.
//!
//! A player owns a hand of goods, a herd of camels, and the counters the
//! round and game scoring read from.

use crate::cards::{CardCounts, GoodType, PlayerId};
use crate::tokens::Token;
use serde::{Deserialize, Serialize};

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID (0 or 1)
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Goods in hand (never camels)
    pub hand: CardCounts,
    /// Camels, kept apart from the hand
    pub herd: u32,
    /// Points across the whole game
    pub score: u32,
    /// Points earned in the current round
    pub round_score: u32,
    /// Good tokens collected this round, counted per token
    pub n_good_tokens: u32,
    /// Bonus tokens collected this round
    pub n_bonus_tokens: u32,
    /// Rounds won so far (seals of excellence)
    pub rounds_won: u32,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            hand: CardCounts::new(),
            herd: 0,
            score: 0,
            round_score: 0,
            n_good_tokens: 0,
            n_bonus_tokens: 0,
            rounds_won: 0,
        }
    }

    /// Number of cards counted against the hand limit
    pub fn hand_size(&self) -> u32 {
        self.hand.goods_total()
    }

    /// Put a dealt card where it belongs: camels to the herd, goods to hand
    pub fn receive(&mut self, good: GoodType) {
        if good.is_camel() {
            self.herd += 1;
        } else {
            self.hand.add(good, 1);
        }
    }

    /// Credit points to both the round and game totals
    pub fn award(&mut self, points: u32) {
        self.score += points;
        self.round_score += points;
    }

    /// Credit a good token
    pub fn collect_good_token(&mut self, token: Token) {
        self.award(token);
        self.n_good_tokens += 1;
    }

    /// Credit a bonus token
    pub fn collect_bonus_token(&mut self, token: Token) {
        self.award(token);
        self.n_bonus_tokens += 1;
    }

    /// Clear everything that belongs to a single round.
    /// Game score and rounds won are kept.
    pub fn reset_for_round(&mut self) {
        self.hand = CardCounts::new();
        self.herd = 0;
        self.round_score = 0;
        self.n_good_tokens = 0;
        self.n_bonus_tokens = 0;
    }
}
