//! Round scoring and the game lifecycle.
//!
//! A round is scored once an action reports that the deck ran dry or enough
//! good token stacks are empty. Scoring hands out the camel bonus, awards the
//! round, and then either finishes the game or deals the next round.

use crate::actions::{GameAction, GameEvent};
use crate::cards::PlayerId;
use crate::game::{GameError, GamePhase, GameState, PLAYER_COUNT};
use crate::params::RoundTiePolicy;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Result of scoring a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// The round that was scored
    pub round: u32,
    /// Who received the camel bonus
    pub camel_bonus: Option<PlayerId>,
    /// Round points per player, camel bonus included
    pub round_scores: Vec<u32>,
    /// Players credited with the round (empty on an unbroken tie)
    pub winners: Vec<PlayerId>,
    /// Set when this round decided the game
    pub game_winner: Option<PlayerId>,
    pub events: Vec<GameEvent>,
}

/// Everything that happened during one call to [`GameState::play`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Events of the action itself, plus the turn change if the round goes on
    pub events: Vec<GameEvent>,
    /// Present when the action ended the round
    pub round: Option<RoundSummary>,
}

impl GameState {
    /// Apply an action and run the lifecycle around it: score the round if it
    /// is over, otherwise pass the turn.
    pub fn play(&mut self, player: PlayerId, action: GameAction) -> Result<TurnReport, GameError> {
        let outcome = self.apply_action(player, action)?;
        let round_over = self.round_should_end(&outcome);
        let mut events = outcome.events;

        if round_over {
            let summary = self.end_round()?;
            return Ok(TurnReport {
                events,
                round: Some(summary),
            });
        }

        events.push(self.end_turn());
        Ok(TurnReport {
            events,
            round: None,
        })
    }

    /// Score the current round, then finish the game or deal the next round
    pub fn end_round(&mut self) -> Result<RoundSummary, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        let round = self.round_number;
        let mut events = Vec::new();

        // 1. Camel bonus for the strictly larger herd
        let camel_bonus = self.camel_majority();
        if let Some(player) = camel_bonus {
            let points = self.params.n_points_most_camels;
            self.players[player as usize].award(points);
            events.push(GameEvent::CamelBonusAwarded { player, points });
        }

        // 2. Award the round
        let round_scores: Vec<u32> = self.players.iter().map(|p| p.round_score).collect();
        let winners = self.round_winners();
        for &winner in &winners {
            self.players[winner as usize].rounds_won += 1;
        }
        events.push(GameEvent::RoundEnded {
            round,
            winners: winners.clone(),
            round_scores: round_scores.clone(),
        });
        info!(round, ?winners, ?round_scores, "round ended");

        // 3. Game over, or deal again
        let game_winner = self.game_winner();
        match game_winner {
            Some(player) => {
                let rounds_won = self.players[player as usize].rounds_won;
                self.phase = GamePhase::Finished { winner: player };
                events.push(GameEvent::GameWon { player, rounds_won });
                info!(player, rounds_won, "game won");
            }
            None => {
                self.round_first_player = match winners.as_slice() {
                    [winner] => GameState::other_player(*winner),
                    _ => GameState::other_player(self.round_first_player),
                };
                self.round_number += 1;
                self.setup_round();
                events.push(GameEvent::RoundStarted {
                    round: self.round_number,
                    first_player: self.round_first_player,
                });
            }
        }

        Ok(RoundSummary {
            round,
            camel_bonus,
            round_scores,
            winners,
            game_winner,
            events,
        })
    }

    /// Player with strictly more camels, if any
    pub fn camel_majority(&self) -> Option<PlayerId> {
        let (a, b) = (&self.players[0], &self.players[1]);
        if a.herd > b.herd {
            Some(a.id)
        } else if b.herd > a.herd {
            Some(b.id)
        } else {
            None
        }
    }

    /// A player's round points if the round ended now, camel bonus included
    pub fn provisional_score(&self, player: PlayerId) -> u32 {
        let Some(p) = self.get_player(player) else {
            return 0;
        };
        let bonus = if self.camel_majority() == Some(player) {
            self.params.n_points_most_camels
        } else {
            0
        };
        p.round_score + bonus
    }

    fn round_winners(&self) -> Vec<PlayerId> {
        let (a, b) = (&self.players[0], &self.players[1]);
        if a.round_score != b.round_score {
            let winner = if a.round_score > b.round_score { a.id } else { b.id };
            return vec![winner];
        }

        match self.params.round_tie_policy {
            RoundTiePolicy::NoWinner => Vec::new(),
            RoundTiePolicy::BothWin => vec![a.id, b.id],
            RoundTiePolicy::TokenCounts => {
                let key = |p: &crate::player::Player| (p.n_bonus_tokens, p.n_good_tokens);
                match key(a).cmp(&key(b)) {
                    std::cmp::Ordering::Greater => vec![a.id],
                    std::cmp::Ordering::Less => vec![b.id],
                    std::cmp::Ordering::Equal => Vec::new(),
                }
            }
        }
    }

    /// Player who has collected enough round wins. If both got there in the
    /// same round, the higher game score wins, then the lower seat.
    fn game_winner(&self) -> Option<PlayerId> {
        let needed = self.params.n_rounds_win_for_game_win;
        self.players
            .iter()
            .filter(|p| p.rounds_won >= needed)
            .max_by(|x, y| x.score.cmp(&y.score).then(y.id.cmp(&x.id)))
            .map(|p| p.id)
    }

    /// 1-based rank: one plus the number of players strictly ahead on rounds
    /// won, then on game score
    pub fn ordinal_position(&self, player: PlayerId) -> u32 {
        let Some(me) = self.get_player(player) else {
            return PLAYER_COUNT as u32;
        };
        let ahead = self
            .players
            .iter()
            .filter(|p| (p.rounds_won, p.score) > (me.rounds_won, me.score))
            .count() as u32;
        1 + ahead
    }

    /// Summary value for external evaluation of a game:
    /// `|score_0 - score_1| + rounds won by both - 10 if the first player ranks first`
    pub fn heuristic_summary(&self) -> f64 {
        let score_diff = (f64::from(self.players[0].score) - f64::from(self.players[1].score)).abs();
        let rounds_played: u32 = self.players.iter().map(|p| p.rounds_won).sum();
        let first_player_bonus = if self.ordinal_position(self.first_player) == 1 {
            10.0
        } else {
            0.0
        };
        score_diff + f64::from(rounds_played) - first_player_bonus
    }
}
