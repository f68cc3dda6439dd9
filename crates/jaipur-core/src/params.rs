//! Rule parameters.
//!
//! Every number the rules depend on lives in [`JaipurParams`]. A game is
//! created with one parameter set and never changes it, so rule variants
//! (jade disabled, longer matches, smaller markets) are a matter of passing a
//! different value.

use crate::cards::GoodType;
use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// What happens when both players finish a round on the same score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundTiePolicy {
    /// Nobody is awarded the round
    #[default]
    NoWinner,
    /// Both players are awarded the round
    BothWin,
    /// More bonus tokens wins, then more good tokens; nobody if still equal
    TokenCounts,
}

/// Errors raised while loading or validating parameters
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid rules JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Market size must be at least 1")]
    EmptyMarket,

    #[error("{camels} starting camels do not fit in a market of {market_size}")]
    TooManyStartingCamels { camels: u32, market_size: u32 },

    #[error("Deck holds {available} camels but {required} are needed for the market")]
    NotEnoughCamels { available: u32, required: u32 },

    #[error("Deck of {available} cards cannot fill the market and deal both hands ({required})")]
    DeckTooSmall { available: u32, required: u32 },

    #[error("Starting hand of {start} exceeds the hand limit of {limit}")]
    StartingHandTooLarge { start: u32, limit: u32 },

    #[error("No minimum sell count configured for {0}")]
    MissingMinimumSell(GoodType),

    #[error("Minimum sell count for {0} must be at least 1")]
    ZeroMinimumSell(GoodType),

    #[error("No token progression configured for {0}")]
    MissingTokens(GoodType),

    #[error("{0} must be at least 1")]
    ZeroThreshold(&'static str),

    #[error("Jaipur is played by exactly 2 players, got {0}")]
    WrongPlayerCount(usize),
}

/// The complete rule set of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JaipurParams {
    /// Minimum number of cards per sale, per good
    pub good_n_cards_minimum_sell: BTreeMap<GoodType, u32>,
    /// Bonus token values keyed by the number of cards sold
    pub bonus_tokens_available: BTreeMap<u32, Vec<Token>>,
    /// Points for the player with the larger herd at round end
    pub n_points_most_camels: u32,
    /// Depleted good token stacks that end the round
    pub n_good_tokens_empty_round_end: u32,
    /// Round wins needed to take the game
    pub n_rounds_win_for_game_win: u32,
    /// Good token values per good (order does not matter, highest drawn first)
    pub good_tokens_progression: BTreeMap<GoodType, Vec<Token>>,
    pub hand_limit: u32,
    pub n_cards_in_hand_at_start: u32,
    pub market_size: u32,
    pub n_camels_in_market_at_start: u32,
    /// Total cards of each type in the game
    pub draw_deck_cards: BTreeMap<GoodType, u32>,
    pub use_jade_cards: bool,
    pub round_tie_policy: RoundTiePolicy,
    /// Shuffle bonus stacks instead of drawing highest first
    pub shuffle_bonus_tokens: bool,
}

impl Default for JaipurParams {
    fn default() -> Self {
        use GoodType::*;

        Self {
            good_n_cards_minimum_sell: BTreeMap::from([
                (Jade, 3),
                (Diamonds, 2),
                (Gold, 2),
                (Silver, 2),
                (Cloth, 1),
                (Spice, 1),
                (Leather, 1),
            ]),
            bonus_tokens_available: BTreeMap::from([
                (3, vec![1, 1, 2, 2, 2, 3, 3]),
                (4, vec![4, 4, 5, 5, 6, 6]),
                (5, vec![8, 8, 9, 10, 10]),
            ]),
            n_points_most_camels: 5,
            n_good_tokens_empty_round_end: 3,
            n_rounds_win_for_game_win: 2,
            good_tokens_progression: BTreeMap::from([
                (Jade, vec![6, 6, 6, 8, 8]),
                (Diamonds, vec![5, 5, 5, 7, 7]),
                (Gold, vec![5, 5, 5, 6, 6]),
                (Silver, vec![5, 5, 5, 5, 5]),
                (Cloth, vec![1, 1, 2, 2, 3, 3, 5]),
                (Spice, vec![1, 1, 2, 2, 3, 3, 5]),
                (Leather, vec![1, 1, 1, 1, 1, 1, 2, 3, 4]),
            ]),
            hand_limit: 7,
            n_cards_in_hand_at_start: 5,
            market_size: 5,
            n_camels_in_market_at_start: 3,
            draw_deck_cards: BTreeMap::from([
                (Jade, 6),
                (Diamonds, 6),
                (Gold, 6),
                (Silver, 6),
                (Cloth, 8),
                (Spice, 8),
                (Leather, 10),
                (Camel, 11),
            ]),
            use_jade_cards: true,
            round_tie_policy: RoundTiePolicy::NoWinner,
            shuffle_bonus_tokens: false,
        }
    }
}

impl JaipurParams {
    /// The classic 55-card game without the jade expansion
    pub fn without_jade() -> Self {
        Self {
            use_jade_cards: false,
            ..Self::default()
        }
    }

    /// Parse a parameter set from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Whether a card type takes part in this rule set
    pub fn is_in_play(&self, good: GoodType) -> bool {
        self.use_jade_cards || good != GoodType::Jade
    }

    /// Sellable goods in play
    pub fn goods_in_play(&self) -> impl Iterator<Item = GoodType> + '_ {
        GoodType::GOODS.into_iter().filter(|&g| self.is_in_play(g))
    }

    /// Minimum cards per sale, `None` for camels and goods out of play
    pub fn min_sell(&self, good: GoodType) -> Option<u32> {
        if good.is_camel() || !self.is_in_play(good) {
            return None;
        }
        self.good_n_cards_minimum_sell.get(&good).copied()
    }

    /// Good token values for a good
    pub fn token_values(&self, good: GoodType) -> &[Token] {
        self.good_tokens_progression
            .get(&good)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Bonus token values for a sale of `n` cards
    pub fn bonus_values(&self, n: u32) -> Option<&[Token]> {
        self.bonus_tokens_available.get(&n).map(Vec::as_slice)
    }

    /// Cards of a type in a full deck under this rule set
    pub fn deck_count(&self, good: GoodType) -> u32 {
        if !self.is_in_play(good) {
            return 0;
        }
        self.draw_deck_cards.get(&good).copied().unwrap_or(0)
    }

    /// Cards in a full deck under this rule set
    pub fn deck_total(&self) -> u32 {
        GoodType::ALL.iter().map(|&g| self.deck_count(g)).sum()
    }

    /// Check that these parameters can produce a playable game
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market_size == 0 {
            return Err(ConfigError::EmptyMarket);
        }
        if self.n_camels_in_market_at_start > self.market_size {
            return Err(ConfigError::TooManyStartingCamels {
                camels: self.n_camels_in_market_at_start,
                market_size: self.market_size,
            });
        }

        let camels = self.deck_count(GoodType::Camel);
        if camels < self.n_camels_in_market_at_start {
            return Err(ConfigError::NotEnoughCamels {
                available: camels,
                required: self.n_camels_in_market_at_start,
            });
        }

        let required = self.market_size + 2 * self.n_cards_in_hand_at_start;
        if self.deck_total() < required {
            return Err(ConfigError::DeckTooSmall {
                available: self.deck_total(),
                required,
            });
        }

        if self.hand_limit == 0 {
            return Err(ConfigError::ZeroThreshold("hand_limit"));
        }
        if self.n_cards_in_hand_at_start > self.hand_limit {
            return Err(ConfigError::StartingHandTooLarge {
                start: self.n_cards_in_hand_at_start,
                limit: self.hand_limit,
            });
        }
        if self.n_rounds_win_for_game_win == 0 {
            return Err(ConfigError::ZeroThreshold("n_rounds_win_for_game_win"));
        }
        if self.n_good_tokens_empty_round_end == 0 {
            return Err(ConfigError::ZeroThreshold("n_good_tokens_empty_round_end"));
        }

        for good in self.goods_in_play() {
            match self.good_n_cards_minimum_sell.get(&good) {
                None => return Err(ConfigError::MissingMinimumSell(good)),
                Some(0) => return Err(ConfigError::ZeroMinimumSell(good)),
                Some(_) => {}
            }
            if !self.good_tokens_progression.contains_key(&good) {
                return Err(ConfigError::MissingTokens(good));
            }
        }

        Ok(())
    }
}
