//! Game invariants - sanity checks that detect bugs.
//!
//! These should never trigger in a correctly implemented engine. The engine
//! asserts them after every action in debug builds; tests call
//! [`check_invariants`] directly.

use crate::cards::GoodType;
use crate::game::GameState;
use std::fmt;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all game invariants.
///
/// Returns the violations found, or an empty list if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let params = &state.params;

    // Card conservation per type
    let deck = state.deck_counts();
    for good in GoodType::ALL {
        let in_hands: u32 = state
            .players
            .iter()
            .map(|p| if good.is_camel() { p.herd } else { p.hand.get(good) })
            .sum();
        let counted = deck.get(good) + state.market.get(good) + in_hands + state.sold.get(good);
        let expected = params.deck_count(good);
        if counted != expected {
            violations.push(violation(format!(
                "{} cards: counted {} (deck {}, market {}, players {}, sold {}), expected {}",
                good,
                counted,
                deck.get(good),
                state.market.get(good),
                in_hands,
                state.sold.get(good),
                expected
            )));
        }
    }

    // Market stays full until the deck runs out
    let market_total = state.market.total();
    if market_total > params.market_size
        || (market_total < params.market_size && !state.deck.is_empty())
    {
        violations.push(violation(format!(
            "Market holds {} cards (size {}) with {} cards left in the deck",
            market_total,
            params.market_size,
            state.deck.len()
        )));
    }

    for player in &state.players {
        if player.hand.camel > 0 {
            violations.push(violation(format!(
                "Player {} has {} camels in hand",
                player.id, player.hand.camel
            )));
        }
        if player.hand_size() > params.hand_limit {
            violations.push(violation(format!(
                "Player {} holds {} cards, limit {}",
                player.id,
                player.hand_size(),
                params.hand_limit
            )));
        }
    }

    // Good tokens come off each stack most valuable first
    for (good, stack) in &state.good_tokens {
        let order: Vec<u32> = stack.draw_order().collect();
        if order.windows(2).any(|w| w[0] < w[1]) {
            violations.push(violation(format!(
                "{} token stack is not in descending order: {:?}",
                good, order
            )));
        }
    }

    let empty_stacks = state.good_tokens.values().filter(|s| s.is_empty()).count() as u32;
    if state.depleted_stacks > empty_stacks {
        violations.push(violation(format!(
            "{} stacks counted as depleted but only {} are empty",
            state.depleted_stacks, empty_stacks
        )));
    }

    violations
}
