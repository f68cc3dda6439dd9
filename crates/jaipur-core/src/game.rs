//! Core game state.
//!
//! This module contains the `GameState` struct, the legal-action generator and
//! the execution of the Sell and Take actions. Round scoring and the game
//! lifecycle live in [`crate::round`].

use crate::actions::{ActionOutcome, GameAction, GameEvent, TakeMode};
use crate::cards::{CardCounts, GoodType, PlayerId};
use crate::invariants;
use crate::params::{ConfigError, JaipurParams};
use crate::player::Player;
use crate::tokens::TokenStack;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Number of players in a game of Jaipur
pub const PLAYER_COUNT: usize = 2;

/// Spreads round numbers across the seed space so each round shuffles
/// independently.
const ROUND_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// A round is being played
    Playing,
    /// Game is over
    Finished { winner: PlayerId },
}

/// Errors that can occur when applying actions.
///
/// Every error is raised before the state is touched, so a rejected action
/// leaves the game exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Game is over")]
    GameOver,

    #[error("Camels cannot be sold")]
    CannotSellCamels,

    #[error("{0} is not used in this game")]
    GoodNotInPlay(GoodType),

    #[error("{good} must be sold at least {minimum} at a time")]
    BelowMinimumSell { good: GoodType, minimum: u32 },

    #[error("Not enough {good}: have {have}, need {need}")]
    NotEnoughCards { good: GoodType, have: u32, need: u32 },

    #[error("Not enough {0} in the market")]
    NotInMarket(GoodType),

    #[error("All {in_market} camels in the market must be taken together")]
    AllCamelsRequired { in_market: u32 },

    #[error("Hand would hold {would_hold} cards, limit is {limit}")]
    HandLimitExceeded { would_hold: u32, limit: u32 },

    #[error("Took {took} cards but gave back {gave}")]
    MismatchedExchange { took: u32, gave: u32 },

    #[error("Cannot give back a good of a type being taken")]
    OverlappingExchange,

    #[error("Invalid take request")]
    InvalidTake,
}

/// The complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) params: JaipurParams,
    pub(crate) players: Vec<Player>,
    /// Player whose action is expected
    pub(crate) current_player: PlayerId,
    /// Player who opened the game
    pub(crate) first_player: PlayerId,
    /// Player who opened the current round
    pub(crate) round_first_player: PlayerId,
    pub(crate) phase: GamePhase,
    /// Round number (starts at 1)
    pub(crate) round_number: u32,
    /// Actions taken this game
    pub(crate) turn_number: u32,
    /// Draw deck, top card at the end
    pub(crate) deck: Vec<GoodType>,
    pub(crate) market: CardCounts,
    /// Cards sold this round
    pub(crate) sold: CardCounts,
    pub(crate) good_tokens: BTreeMap<GoodType, TokenStack>,
    /// Bonus stacks keyed by number of cards sold
    pub(crate) bonus_tokens: BTreeMap<u32, TokenStack>,
    /// Good token stacks emptied this round
    pub(crate) depleted_stacks: u32,
    /// Random number generator seed (for deterministic replays)
    pub(crate) rng_seed: u64,
}

/// Read-only view of the state for hosts. The deck order stays hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateJson {
    pub phase: GamePhase,
    pub round_number: u32,
    pub turn_number: u32,
    pub current_player: PlayerId,
    pub first_player: PlayerId,
    pub market: CardCounts,
    pub deck_size: usize,
    pub players: Vec<Player>,
    /// Remaining good tokens per good, in draw order
    pub good_tokens: BTreeMap<GoodType, Vec<u32>>,
    /// Remaining bonus tokens per sale size
    pub bonus_tokens_remaining: BTreeMap<u32, usize>,
    pub depleted_stacks: u32,
}

impl GameState {
    /// Create a new game with the given rules, player names and shuffle seed
    pub fn new(
        params: JaipurParams,
        player_names: Vec<String>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        if player_names.len() != PLAYER_COUNT {
            return Err(ConfigError::WrongPlayerCount(player_names.len()));
        }
        Ok(Self::create(params, player_names, seed))
    }

    /// Create a game with the default rules
    pub fn new_standard(seed: u64) -> Self {
        Self::create(
            JaipurParams::default(),
            vec!["Player 1".to_string(), "Player 2".to_string()],
            seed,
        )
    }

    /// Build a game from parameters that are known to be valid
    fn create(params: JaipurParams, player_names: Vec<String>, seed: u64) -> Self {
        let players: Vec<Player> = player_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as PlayerId, name))
            .collect();

        // First player is random
        let mut rng = StdRng::seed_from_u64(seed);
        let first_player = rng.gen_range(0..PLAYER_COUNT as PlayerId);

        let mut state = Self {
            params,
            players,
            current_player: first_player,
            first_player,
            round_first_player: first_player,
            phase: GamePhase::Playing,
            round_number: 1,
            turn_number: 0,
            deck: Vec::new(),
            market: CardCounts::new(),
            sold: CardCounts::new(),
            good_tokens: BTreeMap::new(),
            bonus_tokens: BTreeMap::new(),
            depleted_stacks: 0,
            rng_seed: seed,
        };
        state.setup_round();
        state
    }

    /// Deal a fresh round: new deck, market, hands, herds and token stacks.
    /// Game scores and rounds won are left alone.
    pub(crate) fn setup_round(&mut self) {
        let mut rng = self.round_rng();

        for player in &mut self.players {
            player.reset_for_round();
        }
        self.sold = CardCounts::new();
        self.depleted_stacks = 0;

        // Starting camels go to the market before the shuffle
        let mut deck = Vec::with_capacity(self.params.deck_total() as usize);
        for good in GoodType::ALL {
            let mut count = self.params.deck_count(good);
            if good.is_camel() {
                count -= self.params.n_camels_in_market_at_start;
            }
            deck.extend(std::iter::repeat(good).take(count as usize));
        }
        deck.shuffle(&mut rng);
        self.deck = deck;
        self.market = CardCounts::single(GoodType::Camel, self.params.n_camels_in_market_at_start);

        for player in &mut self.players {
            for _ in 0..self.params.n_cards_in_hand_at_start {
                if let Some(card) = self.deck.pop() {
                    player.receive(card);
                }
            }
        }

        while self.market.total() < self.params.market_size {
            match self.deck.pop() {
                Some(card) => self.market.add(card, 1),
                None => break,
            }
        }

        self.good_tokens = self
            .params
            .goods_in_play()
            .map(|g| (g, TokenStack::from_values(self.params.token_values(g))))
            .collect();

        let shuffle_bonus = self.params.shuffle_bonus_tokens;
        self.bonus_tokens = self
            .params
            .bonus_tokens_available
            .iter()
            .map(|(&n, values)| {
                let stack = if shuffle_bonus {
                    TokenStack::shuffled(values, &mut rng)
                } else {
                    TokenStack::from_values(values)
                };
                (n, stack)
            })
            .collect();

        self.current_player = self.round_first_player;
    }

    fn round_rng(&self) -> StdRng {
        let mix = u64::from(self.round_number).wrapping_mul(ROUND_SEED_MIX);
        StdRng::seed_from_u64(self.rng_seed ^ mix)
    }

    // ==================== Accessors ====================

    /// The rules this game is played with
    pub fn params(&self) -> &JaipurParams {
        &self.params
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Player who took the first turn of the game
    pub fn first_player(&self) -> PlayerId {
        self.first_player
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn market(&self) -> &CardCounts {
        &self.market
    }

    /// Cards left in the draw deck
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// Cards of each type left in the draw deck
    pub fn deck_counts(&self) -> CardCounts {
        CardCounts::from_pairs(self.deck.iter().map(|&g| (g, 1)))
    }

    /// Cards sold so far this round
    pub fn sold(&self) -> &CardCounts {
        &self.sold
    }

    /// The good token stack of a good, if that good is in play
    pub fn good_tokens(&self, good: GoodType) -> Option<&TokenStack> {
        self.good_tokens.get(&good)
    }

    /// The bonus token stack for sales of `n` cards
    pub fn bonus_tokens(&self, n: u32) -> Option<&TokenStack> {
        self.bonus_tokens.get(&n)
    }

    /// Good token stacks emptied this round
    pub fn depleted_stacks(&self) -> u32 {
        self.depleted_stacks
    }

    pub fn seed(&self) -> u64 {
        self.rng_seed
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// Get the winner if the game is finished
    pub fn get_winner(&self) -> Option<PlayerId> {
        if let GamePhase::Finished { winner } = self.phase {
            Some(winner)
        } else {
            None
        }
    }

    /// Opponent of a player
    pub fn other_player(player: PlayerId) -> PlayerId {
        (player + 1) % PLAYER_COUNT as PlayerId
    }

    /// Build the host-facing view of the state
    pub fn snapshot(&self) -> GameStateJson {
        GameStateJson {
            phase: self.phase,
            round_number: self.round_number,
            turn_number: self.turn_number,
            current_player: self.current_player,
            first_player: self.first_player,
            market: self.market,
            deck_size: self.deck.len(),
            players: self.players.clone(),
            good_tokens: self
                .good_tokens
                .iter()
                .map(|(&g, stack)| (g, stack.draw_order().collect()))
                .collect(),
            bonus_tokens_remaining: self
                .bonus_tokens
                .iter()
                .map(|(&n, stack)| (n, stack.len()))
                .collect(),
            depleted_stacks: self.depleted_stacks,
        }
    }

    // ==================== Legal actions ====================

    /// Get all currently valid actions for a player.
    ///
    /// Order: sales (by good, then size), taking the camels, single goods,
    /// then every exchange. No action appears twice.
    pub fn valid_actions(&self, player: PlayerId) -> Vec<GameAction> {
        let mut actions = Vec::new();

        if self.is_finished() || player != self.current_player {
            return actions;
        }
        let Some(p) = self.get_player(player) else {
            return actions;
        };
        let limit = self.params.hand_limit;

        for good in self.params.goods_in_play() {
            let Some(minimum) = self.params.min_sell(good) else {
                continue;
            };
            for how_many in minimum..=p.hand.get(good) {
                actions.push(GameAction::sell(good, how_many));
            }
        }

        if self.market.camel > 0 {
            actions.push(GameAction::take_camels(self.market.camel));
        }

        if p.hand_size() < limit {
            for good in self.market.without_camels().types() {
                actions.push(GameAction::take_single(good));
            }
        }

        // Exchanges: any 2+ goods from the market against the same number of
        // cards from hand or herd, never of a type being taken
        let market_goods = self.market.without_camels();
        let mut offer = p.hand;
        offer.camel = p.herd;

        for size in 2..=market_goods.total() {
            for take in market_goods.sub_multisets(size) {
                let mut givable = offer;
                for good in take.types() {
                    givable.set(good, 0);
                }
                for give in givable.sub_multisets(size) {
                    if p.hand_size() + size - give.goods_total() <= limit {
                        actions.push(GameAction::exchange(take, give));
                    }
                }
            }
        }

        actions
    }

    // ==================== Applying actions ====================

    /// Apply an action for a player.
    ///
    /// The action is fully validated first; on error nothing changes. The
    /// returned outcome says whether the deck ran dry during a refill, which
    /// the caller must act on (see [`GameState::round_should_end`]). The turn
    /// does not pass until [`GameState::end_turn`] is called.
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<ActionOutcome, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if player != self.current_player {
            return Err(GameError::NotYourTurn);
        }

        let outcome = match action {
            GameAction::Sell { good, how_many } => {
                self.validate_sell(player, good, how_many)?;
                self.execute_sell(player, good, how_many)
            }
            GameAction::Take { take, give } => {
                let mode = TakeMode::classify(&take, &give).ok_or(GameError::InvalidTake)?;
                self.validate_take(player, mode, &take, &give)?;
                self.execute_take(player, mode, &take, &give)
            }
        };

        self.turn_number += 1;
        debug!(
            player,
            %action,
            trigger_round_end = outcome.trigger_round_end,
            "applied action"
        );
        debug_assert!(
            invariants::check_invariants(self).is_empty(),
            "invariants violated after {}",
            action
        );

        Ok(outcome)
    }

    /// Pass the turn to the other player
    pub fn end_turn(&mut self) -> GameEvent {
        let player = self.current_player;
        let next_player = Self::other_player(player);
        self.current_player = next_player;
        GameEvent::TurnEnded {
            player,
            next_player,
        }
    }

    /// Whether the round is over after an action: the deck ran dry during a
    /// refill, or enough good token stacks are empty.
    pub fn round_should_end(&self, outcome: &ActionOutcome) -> bool {
        outcome.trigger_round_end
            || self.depleted_stacks >= self.params.n_good_tokens_empty_round_end
    }

    fn player_ref(&self, player: PlayerId) -> Result<&Player, GameError> {
        self.get_player(player).ok_or(GameError::NotYourTurn)
    }

    fn validate_sell(&self, player: PlayerId, good: GoodType, how_many: u32) -> Result<(), GameError> {
        if good.is_camel() {
            return Err(GameError::CannotSellCamels);
        }
        let minimum = self
            .params
            .min_sell(good)
            .ok_or(GameError::GoodNotInPlay(good))?;
        if how_many < minimum {
            return Err(GameError::BelowMinimumSell { good, minimum });
        }

        let have = self.player_ref(player)?.hand.get(good);
        if how_many > have {
            return Err(GameError::NotEnoughCards {
                good,
                have,
                need: how_many,
            });
        }
        Ok(())
    }

    fn execute_sell(&mut self, player: PlayerId, good: GoodType, how_many: u32) -> ActionOutcome {
        let mut events = Vec::new();
        let p = &mut self.players[player as usize];

        p.hand.remove(good, how_many);
        self.sold.add(good, how_many);

        let mut tokens = Vec::new();
        if let Some(stack) = self.good_tokens.get_mut(&good) {
            let had_tokens = !stack.is_empty();
            for _ in 0..how_many {
                match stack.draw() {
                    Some(token) => {
                        p.collect_good_token(token);
                        tokens.push(token);
                    }
                    None => break,
                }
            }
            if had_tokens && stack.is_empty() {
                self.depleted_stacks += 1;
                events.push(GameEvent::TokenStackDepleted {
                    good,
                    depleted_stacks: self.depleted_stacks,
                });
            }
        }

        let bonus = self
            .bonus_tokens
            .get_mut(&how_many)
            .and_then(TokenStack::draw);
        if let Some(token) = bonus {
            p.collect_bonus_token(token);
        }

        events.insert(
            0,
            GameEvent::GoodsSold {
                player,
                good,
                count: how_many,
                tokens,
                bonus,
            },
        );

        ActionOutcome {
            events,
            trigger_round_end: false,
        }
    }

    fn validate_take(
        &self,
        player: PlayerId,
        mode: TakeMode,
        take: &CardCounts,
        give: &CardCounts,
    ) -> Result<(), GameError> {
        let p = self.player_ref(player)?;
        let limit = self.params.hand_limit;

        match mode {
            TakeMode::AllCamels(count) => {
                if self.market.camel == 0 {
                    return Err(GameError::NotInMarket(GoodType::Camel));
                }
                if count != self.market.camel {
                    return Err(GameError::AllCamelsRequired {
                        in_market: self.market.camel,
                    });
                }
            }
            TakeMode::SingleGood(good) => {
                if self.market.get(good) == 0 {
                    return Err(GameError::NotInMarket(good));
                }
                if p.hand_size() >= limit {
                    return Err(GameError::HandLimitExceeded {
                        would_hold: p.hand_size() + 1,
                        limit,
                    });
                }
            }
            TakeMode::Exchange => {
                if let Some(good) = take.types().find(|&g| self.market.get(g) < take.get(g)) {
                    return Err(GameError::NotInMarket(good));
                }
                if give.total() != take.total() {
                    return Err(GameError::MismatchedExchange {
                        took: take.total(),
                        gave: give.total(),
                    });
                }
                if !take.is_disjoint(give) {
                    return Err(GameError::OverlappingExchange);
                }
                for good in give.types() {
                    let have = if good.is_camel() { p.herd } else { p.hand.get(good) };
                    if have < give.get(good) {
                        return Err(GameError::NotEnoughCards {
                            good,
                            have,
                            need: give.get(good),
                        });
                    }
                }
                let would_hold = p.hand_size() + take.total() - give.goods_total();
                if would_hold > limit {
                    return Err(GameError::HandLimitExceeded { would_hold, limit });
                }
            }
        }
        Ok(())
    }

    fn execute_take(
        &mut self,
        player: PlayerId,
        mode: TakeMode,
        take: &CardCounts,
        give: &CardCounts,
    ) -> ActionOutcome {
        let mut outcome = ActionOutcome::default();
        let p = &mut self.players[player as usize];

        match mode {
            TakeMode::AllCamels(count) => {
                p.herd += count;
                self.market.remove(GoodType::Camel, count);
                outcome.events.push(GameEvent::CamelsTaken { player, count });
                self.refill_market(count, &mut outcome);
            }
            TakeMode::SingleGood(good) => {
                p.hand.add(good, 1);
                self.market.remove(good, 1);
                outcome.events.push(GameEvent::GoodTaken { player, good });
                self.refill_market(1, &mut outcome);
            }
            TakeMode::Exchange => {
                p.hand.add_counts(take);
                self.market.try_subtract(take);
                p.hand.try_subtract(&give.without_camels());
                p.herd -= give.camel;
                self.market.add_counts(give);
                outcome.events.push(GameEvent::GoodsExchanged {
                    player,
                    took: *take,
                    gave: *give,
                });
            }
        }

        outcome
    }

    /// Draw up to `draws` cards into the market, one at a time. Stops and
    /// flags the round end as soon as a draw finds the deck empty.
    fn refill_market(&mut self, draws: u32, outcome: &mut ActionOutcome) {
        let mut drawn = CardCounts::new();
        for _ in 0..draws {
            match self.deck.pop() {
                Some(card) => {
                    self.market.add(card, 1);
                    drawn.add(card, 1);
                }
                None => {
                    outcome.trigger_round_end = true;
                    break;
                }
            }
        }

        if !drawn.is_empty() {
            outcome.events.push(GameEvent::MarketRefilled { drawn });
        }
        if outcome.trigger_round_end {
            outcome.events.push(GameEvent::DeckExhausted {
                market_short_by: self.params.market_size.saturating_sub(self.market.total()),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Lay out a hand-crafted position for player 0
    fn scenario(market: CardCounts, hand: CardCounts, herd: u32, deck: Vec<GoodType>) -> GameState {
        let mut game = GameState::new_standard(7);
        game.current_player = 0;
        game.market = market;
        game.deck = deck;
        for player in &mut game.players {
            player.reset_for_round();
        }
        game.players[0].hand = hand;
        game.players[0].herd = herd;

        // Whatever is not laid out counts as already sold, so card
        // conservation still holds
        let mut placed = game.market;
        placed.add_counts(&hand);
        placed.add(GoodType::Camel, herd);
        placed.add_counts(&game.deck_counts());
        for good in GoodType::ALL {
            let total = game.params.deck_count(good);
            game.sold.set(good, total.saturating_sub(placed.get(good)));
        }
        game
    }

    #[test]
    fn test_new_game_deals_round() {
        let game = GameState::new_standard(42);
        assert_eq!(game.market.total(), 5);
        assert!(game.market.camel >= 3);
        for p in &game.players {
            assert_eq!(p.hand_size() + p.herd, 5);
        }
        assert_eq!(game.deck_len(), 61 - 5 - 10);
        assert_eq!(game.good_tokens.len(), 7);
        assert_eq!(game.phase, GamePhase::Playing);
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = GameState::new_standard(99);
        let b = GameState::new_standard(99);
        assert_eq!(a.deck, b.deck);
        assert_eq!(a.market, b.market);
        assert_eq!(a.first_player, b.first_player);
    }

    #[test]
    fn test_new_rejects_wrong_player_count() {
        let result = GameState::new(JaipurParams::default(), vec!["Solo".into()], 1);
        assert!(matches!(result, Err(ConfigError::WrongPlayerCount(1))));
    }

    #[test]
    fn test_without_jade_has_no_jade() {
        let game = GameState::new(
            JaipurParams::without_jade(),
            vec!["A".into(), "B".into()],
            3,
        )
        .unwrap();
        assert!(game.good_tokens(GoodType::Jade).is_none());
        assert_eq!(game.deck_counts().jade + game.market.jade, 0);
    }

    #[test]
    fn test_sell_three_cloth() {
        let market = CardCounts::from_pairs([(GoodType::Jade, 1), (GoodType::Diamonds, 2)]);
        let mut game = scenario(market, CardCounts::single(GoodType::Cloth, 3), 0, vec![]);

        let outcome = game
            .apply_action(0, GameAction::sell(GoodType::Cloth, 3))
            .unwrap();

        // 5 + 3 + 3 from the cloth stack, plus the top 3-card bonus (3)
        assert_eq!(
            outcome.events[0],
            GameEvent::GoodsSold {
                player: 0,
                good: GoodType::Cloth,
                count: 3,
                tokens: vec![5, 3, 3],
                bonus: Some(3),
            }
        );
        let p = &game.players[0];
        assert_eq!(p.hand.cloth, 0);
        assert_eq!(p.score, 14);
        assert_eq!(p.n_good_tokens, 3);
        assert_eq!(p.n_bonus_tokens, 1);
        assert!(!outcome.trigger_round_end);
    }

    #[test]
    fn test_sell_drains_stack_once() {
        let market = CardCounts::single(GoodType::Camel, 5);
        let mut game = scenario(market, CardCounts::single(GoodType::Diamonds, 6), 0, vec![]);

        let outcome = game
            .apply_action(0, GameAction::sell(GoodType::Diamonds, 6))
            .unwrap();

        // Only 5 diamond tokens exist
        let GameEvent::GoodsSold { tokens, bonus, .. } = &outcome.events[0] else {
            panic!("expected a sale");
        };
        assert_eq!(tokens, &vec![7, 7, 5, 5, 5]);
        assert_eq!(*bonus, None);
        assert_eq!(game.depleted_stacks, 1);
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::TokenStackDepleted { good: GoodType::Diamonds, .. })));
    }

    #[test]
    fn test_sell_into_empty_stack_is_not_counted_again() {
        let market = CardCounts::single(GoodType::Camel, 5);
        let mut game = scenario(market, CardCounts::single(GoodType::Gold, 2), 0, vec![]);
        game.good_tokens.insert(GoodType::Gold, TokenStack::default());
        game.depleted_stacks = 1;

        let outcome = game
            .apply_action(0, GameAction::sell(GoodType::Gold, 2))
            .unwrap();

        assert_eq!(game.depleted_stacks, 1);
        assert_eq!(game.players[0].score, 0);
        assert_eq!(outcome.events.len(), 1);
    }

    #[test]
    fn test_sell_errors_leave_state_untouched() {
        let market = CardCounts::single(GoodType::Camel, 5);
        let hand = CardCounts::from_pairs([(GoodType::Gold, 1), (GoodType::Leather, 2)]);
        let mut game = scenario(market, hand, 2, vec![]);
        let before = game.snapshot();

        assert_eq!(
            game.apply_action(0, GameAction::sell(GoodType::Gold, 1)),
            Err(GameError::BelowMinimumSell {
                good: GoodType::Gold,
                minimum: 2
            })
        );
        assert_eq!(
            game.apply_action(0, GameAction::sell(GoodType::Leather, 3)),
            Err(GameError::NotEnoughCards {
                good: GoodType::Leather,
                have: 2,
                need: 3
            })
        );
        assert_eq!(
            game.apply_action(0, GameAction::sell(GoodType::Camel, 2)),
            Err(GameError::CannotSellCamels)
        );
        assert_eq!(
            game.apply_action(1, GameAction::sell(GoodType::Leather, 1)),
            Err(GameError::NotYourTurn)
        );
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_take_camels_with_short_deck() {
        let market = CardCounts::from_pairs([(GoodType::Camel, 3), (GoodType::Gold, 2)]);
        let deck = vec![GoodType::Spice, GoodType::Leather];
        let mut game = scenario(market, CardCounts::new(), 1, deck);

        let outcome = game.apply_action(0, GameAction::take_camels(3)).unwrap();

        assert_eq!(game.players[0].herd, 4);
        assert_eq!(game.market.camel, 0);
        assert_eq!(game.market.total(), 4);
        assert_eq!(game.deck_len(), 0);
        assert!(outcome.trigger_round_end);
        assert!(game.round_should_end(&outcome));
        assert!(outcome
            .events
            .contains(&GameEvent::DeckExhausted { market_short_by: 1 }));
    }

    #[test]
    fn test_take_camels_must_take_all() {
        let market = CardCounts::from_pairs([(GoodType::Camel, 3), (GoodType::Gold, 2)]);
        let mut game = scenario(market, CardCounts::new(), 0, vec![GoodType::Gold; 3]);
        assert_eq!(
            game.apply_action(0, GameAction::take_camels(2)),
            Err(GameError::AllCamelsRequired { in_market: 3 })
        );
    }

    #[test]
    fn test_take_single_good_refills() {
        let market = CardCounts::from_pairs([(GoodType::Silver, 1), (GoodType::Camel, 4)]);
        let mut game = scenario(market, CardCounts::new(), 0, vec![GoodType::Cloth]);

        let outcome = game
            .apply_action(0, GameAction::take_single(GoodType::Silver))
            .unwrap();

        assert_eq!(game.players[0].hand.silver, 1);
        assert_eq!(game.market.cloth, 1);
        assert_eq!(game.market.total(), 5);
        assert!(!outcome.trigger_round_end);
    }

    #[test]
    fn test_exact_refill_empties_deck_without_ending_round() {
        let market = CardCounts::from_pairs([(GoodType::Silver, 1), (GoodType::Camel, 4)]);
        let mut game = scenario(market, CardCounts::new(), 0, vec![GoodType::Cloth]);

        let outcome = game
            .apply_action(0, GameAction::take_single(GoodType::Silver))
            .unwrap();

        assert_eq!(game.deck_len(), 0);
        assert_eq!(game.market.total(), 5);
        assert!(!outcome.trigger_round_end);
        assert!(!game.round_should_end(&outcome));
        assert!(!outcome
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::DeckExhausted { .. })));
    }

    #[test]
    fn test_shuffled_bonus_stacks_keep_their_tokens() {
        let params = JaipurParams {
            shuffle_bonus_tokens: true,
            ..JaipurParams::default()
        };
        let game = GameState::new(params.clone(), vec!["A".into(), "B".into()], 3).unwrap();

        for (&n, values) in &params.bonus_tokens_available {
            let mut drawn: Vec<u32> = game.bonus_tokens(n).unwrap().draw_order().collect();
            let mut expected = values.clone();
            drawn.sort_unstable();
            expected.sort_unstable();
            assert_eq!(drawn, expected, "bonus stack for {} cards", n);
        }
        // Bonus stacks are not required to descend
        assert_eq!(invariants::check_invariants(&game), vec![]);
    }

    #[test]
    fn test_shuffled_bonus_stacks_follow_the_seed() {
        let params = JaipurParams {
            shuffle_bonus_tokens: true,
            ..JaipurParams::default()
        };
        let names = || vec!["A".to_string(), "B".to_string()];
        let a = GameState::new(params.clone(), names(), 3).unwrap();
        let b = GameState::new(params, names(), 3).unwrap();

        assert_eq!(a.bonus_tokens, b.bonus_tokens);
    }

    #[test]
    fn test_take_single_blocked_by_hand_limit() {
        let market = CardCounts::from_pairs([(GoodType::Silver, 1), (GoodType::Camel, 4)]);
        let hand = CardCounts::single(GoodType::Leather, 7);
        let mut game = scenario(market, hand, 0, vec![GoodType::Cloth]);

        assert_eq!(
            game.apply_action(0, GameAction::take_single(GoodType::Silver)),
            Err(GameError::HandLimitExceeded {
                would_hold: 8,
                limit: 7
            })
        );
        assert!(!game
            .valid_actions(0)
            .contains(&GameAction::take_single(GoodType::Silver)));
    }

    #[test]
    fn test_exchange_jade_for_camel_and_cloth() {
        let market = CardCounts::from_pairs([
            (GoodType::Jade, 2),
            (GoodType::Gold, 1),
            (GoodType::Spice, 2),
        ]);
        let hand = CardCounts::single(GoodType::Cloth, 2);
        let mut game = scenario(market, hand, 1, vec![GoodType::Leather; 4]);

        let take = CardCounts::single(GoodType::Jade, 2);
        let give = CardCounts::from_pairs([(GoodType::Camel, 1), (GoodType::Cloth, 1)]);
        let outcome = game
            .apply_action(0, GameAction::exchange(take, give))
            .unwrap();

        let p = &game.players[0];
        assert_eq!(p.hand.jade, 2);
        assert_eq!(p.hand.cloth, 1);
        assert_eq!(p.herd, 0);
        assert_eq!(game.market.jade, 0);
        assert_eq!(game.market.camel, 1);
        assert_eq!(game.market.cloth, 1);
        assert_eq!(game.market.total(), 5);
        assert_eq!(game.deck_len(), 4);
        assert!(!outcome.trigger_round_end);
    }

    #[test]
    fn test_exchange_rejections() {
        let market = CardCounts::from_pairs([(GoodType::Jade, 2), (GoodType::Cloth, 3)]);
        let hand = CardCounts::from_pairs([(GoodType::Cloth, 1), (GoodType::Gold, 1)]);
        let mut game = scenario(market, hand, 0, vec![GoodType::Leather; 4]);
        let take = CardCounts::single(GoodType::Jade, 2);

        assert_eq!(
            game.apply_action(0, GameAction::exchange(take, CardCounts::single(GoodType::Gold, 1))),
            Err(GameError::MismatchedExchange { took: 2, gave: 1 })
        );
        assert_eq!(
            game.apply_action(
                0,
                GameAction::exchange(
                    CardCounts::from_pairs([(GoodType::Jade, 1), (GoodType::Cloth, 1)]),
                    CardCounts::from_pairs([(GoodType::Cloth, 1), (GoodType::Gold, 1)]),
                )
            ),
            Err(GameError::OverlappingExchange)
        );
        assert_eq!(
            game.apply_action(0, GameAction::exchange(take, CardCounts::single(GoodType::Camel, 2))),
            Err(GameError::NotEnoughCards {
                good: GoodType::Camel,
                have: 0,
                need: 2
            })
        );
        assert_eq!(
            game.apply_action(
                0,
                GameAction::exchange(
                    CardCounts::single(GoodType::Jade, 3),
                    CardCounts::single(GoodType::Gold, 3)
                )
            ),
            Err(GameError::NotInMarket(GoodType::Jade))
        );
    }

    #[test]
    fn test_exchange_respects_hand_limit() {
        let market = CardCounts::from_pairs([(GoodType::Spice, 2), (GoodType::Camel, 3)]);
        let hand = CardCounts::single(GoodType::Leather, 6);
        let mut game = scenario(market, hand, 2, vec![GoodType::Gold; 3]);

        // 6 + 2 - 0 goods given back would be 8
        let take = CardCounts::single(GoodType::Spice, 2);
        assert_eq!(
            game.apply_action(0, GameAction::exchange(take, CardCounts::single(GoodType::Camel, 2))),
            Err(GameError::HandLimitExceeded {
                would_hold: 8,
                limit: 7
            })
        );
        assert!(game
            .apply_action(
                0,
                GameAction::exchange(
                    take,
                    CardCounts::from_pairs([(GoodType::Camel, 1), (GoodType::Leather, 1)])
                )
            )
            .is_ok());
    }

    #[test]
    fn test_valid_actions_are_unique_and_apply() {
        let game = GameState::new_standard(5);
        let player = game.current_player;
        let actions = game.valid_actions(player);
        assert!(!actions.is_empty());

        let unique: std::collections::HashSet<_> = actions.iter().collect();
        assert_eq!(unique.len(), actions.len());

        for action in actions {
            let mut copy = game.clone();
            assert!(copy.apply_action(player, action).is_ok(), "{action} rejected");
        }
    }

    #[test]
    fn test_valid_actions_empty_for_waiting_player() {
        let game = GameState::new_standard(5);
        let waiting = GameState::other_player(game.current_player);
        assert!(game.valid_actions(waiting).is_empty());
    }

    #[test]
    fn test_end_turn_alternates() {
        let mut game = GameState::new_standard(11);
        let first = game.current_player;
        assert_eq!(
            game.end_turn(),
            GameEvent::TurnEnded {
                player: first,
                next_player: GameState::other_player(first)
            }
        );
        assert_eq!(game.current_player, GameState::other_player(first));
    }
}
