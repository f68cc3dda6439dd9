//! Game actions that players can take.
//!
//! This module defines the two player actions, the shapes a take request can
//! have, and the events that result from actions and round changes.

use crate::cards::{CardCounts, GoodType, PlayerId};
use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All possible actions a player can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Sell cards of one good from hand for tokens
    Sell { good: GoodType, how_many: u32 },
    /// Move cards from the market to the player, optionally giving cards back.
    ///
    /// The shape of `take`/`give` selects the mode, see [`TakeMode`].
    Take { take: CardCounts, give: CardCounts },
}

impl GameAction {
    pub fn sell(good: GoodType, how_many: u32) -> Self {
        GameAction::Sell { good, how_many }
    }

    /// Take every camel in the market (`count` must match the market)
    pub fn take_camels(count: u32) -> Self {
        GameAction::Take {
            take: CardCounts::single(GoodType::Camel, count),
            give: CardCounts::new(),
        }
    }

    /// Take one good from the market
    pub fn take_single(good: GoodType) -> Self {
        GameAction::Take {
            take: CardCounts::single(good, 1),
            give: CardCounts::new(),
        }
    }

    /// Take several goods, replacing them with cards from hand or herd
    pub fn exchange(take: CardCounts, give: CardCounts) -> Self {
        GameAction::Take { take, give }
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameAction::Sell { good, how_many } => write!(f, "Sell {} {} cards", how_many, good),
            GameAction::Take { take, give } if give.is_empty() => write!(f, "Take cards: {}", take),
            GameAction::Take { take, give } => {
                write!(f, "Take cards: {} (replenish with: {})", take, give)
            }
        }
    }
}

/// The three mutually exclusive ways of taking from the market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TakeMode {
    /// Take every camel in the market into the herd
    AllCamels(u32),
    /// Take one good into the hand
    SingleGood(GoodType),
    /// Take two or more goods and give back as many cards
    Exchange,
}

impl TakeMode {
    /// Work out which mode a take request is asking for.
    ///
    /// Only the shape is checked here; whether the market and hand can
    /// honour the request is validated against the game state.
    pub fn classify(take: &CardCounts, give: &CardCounts) -> Option<TakeMode> {
        if take.is_empty() {
            return None;
        }

        if take.camel > 0 {
            if take.goods_total() == 0 && give.is_empty() {
                return Some(TakeMode::AllCamels(take.camel));
            }
            return None;
        }

        if take.total() == 1 {
            if !give.is_empty() {
                return None;
            }
            return take.types().next().map(TakeMode::SingleGood);
        }

        Some(TakeMode::Exchange)
    }
}

/// What an applied action produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub events: Vec<GameEvent>,
    /// A refill draw found the deck empty. The round must be scored.
    pub trigger_round_end: bool,
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Goods were sold for tokens
    GoodsSold {
        player: PlayerId,
        good: GoodType,
        count: u32,
        tokens: Vec<Token>,
        bonus: Option<Token>,
    },

    /// A good token stack ran out during this round
    TokenStackDepleted { good: GoodType, depleted_stacks: u32 },

    /// All market camels went to a herd
    CamelsTaken { player: PlayerId, count: u32 },

    /// A single good was taken into hand
    GoodTaken { player: PlayerId, good: GoodType },

    /// Several goods were swapped with the market
    GoodsExchanged {
        player: PlayerId,
        took: CardCounts,
        gave: CardCounts,
    },

    /// Cards drawn from the deck into the market
    MarketRefilled { drawn: CardCounts },

    /// A refill draw found the deck empty
    DeckExhausted { market_short_by: u32 },

    /// Turn ended
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    /// The larger herd earned the camel bonus
    CamelBonusAwarded { player: PlayerId, points: u32 },

    /// A round was scored
    RoundEnded {
        round: u32,
        winners: Vec<PlayerId>,
        round_scores: Vec<u32>,
    },

    /// A fresh round was dealt
    RoundStarted { round: u32, first_player: PlayerId },

    /// A player won the game
    GameWon { player: PlayerId, rounds_won: u32 },
}
