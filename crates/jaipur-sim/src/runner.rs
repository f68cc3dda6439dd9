//! Random-vs-random match runner.

use jaipur_core::{GameState, JaipurParams, PlayerId, PLAYER_COUNT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{SimConfig, SimError};

/// Stop a game that runs this long; random play never gets close.
const MAX_ACTIONS: u32 = 10_000;

/// Outcome of one simulated game
#[derive(Debug, Clone)]
pub struct GameResult {
    pub seed: u64,
    pub winner: PlayerId,
    pub first_player: PlayerId,
    pub scores: Vec<u32>,
    pub rounds: u32,
    pub actions: u32,
    pub heuristic: f64,
}

/// Aggregate over a whole run
#[derive(Debug, Default)]
pub struct MatchStats {
    pub games: u32,
    pub wins: [u32; PLAYER_COUNT],
    pub first_player_wins: u32,
    pub total_rounds: u32,
    pub total_actions: u32,
    pub total_score: u64,
}

impl MatchStats {
    pub fn record(&mut self, result: &GameResult) {
        self.games += 1;
        self.wins[result.winner as usize] += 1;
        if result.winner == result.first_player {
            self.first_player_wins += 1;
        }
        self.total_rounds += result.rounds;
        self.total_actions += result.actions;
        self.total_score += result.scores.iter().map(|&s| u64::from(s)).sum::<u64>();
    }

    pub fn to_json(&self) -> serde_json::Value {
        let per_game = |total: f64| {
            if self.games == 0 {
                0.0
            } else {
                total / f64::from(self.games)
            }
        };
        serde_json::json!({
            "games": self.games,
            "wins": self.wins,
            "first_player_wins": self.first_player_wins,
            "avg_rounds": per_game(f64::from(self.total_rounds)),
            "avg_actions": per_game(f64::from(self.total_actions)),
            "avg_score_per_player": per_game(self.total_score as f64) / PLAYER_COUNT as f64,
        })
    }
}

/// Play one game where both seats pick uniformly among their legal actions
pub fn play_game(params: &JaipurParams, seed: u64) -> Result<GameResult, SimError> {
    let names = vec!["Random 1".to_string(), "Random 2".to_string()];
    let mut game = GameState::new(params.clone(), names, seed)?;
    let mut rng = StdRng::seed_from_u64(seed.rotate_left(32));
    let mut actions = 0;

    while !game.is_finished() {
        if actions >= MAX_ACTIONS {
            return Err(SimError::Unfinished(seed));
        }

        let player = game.current_player();
        let legal = game.valid_actions(player);
        let action = *legal
            .choose(&mut rng)
            .ok_or(SimError::NoLegalAction(player))?;

        let report = game.play(player, action)?;
        actions += 1;

        if let Some(summary) = report.round {
            debug!(
                seed,
                round = summary.round,
                winners = ?summary.winners,
                scores = ?summary.round_scores,
                "round scored"
            );
        }
    }

    let winner = game.get_winner().ok_or(SimError::Unfinished(seed))?;
    Ok(GameResult {
        seed,
        winner,
        first_player: game.first_player(),
        scores: game.players().iter().map(|p| p.score).collect(),
        rounds: game.round_number(),
        actions,
        heuristic: game.heuristic_summary(),
    })
}

/// Play every game of the run and collect the stats
pub fn run(config: &SimConfig) -> Result<MatchStats, SimError> {
    let mut stats = MatchStats::default();

    for i in 0..config.games {
        let seed = config.seed.wrapping_add(u64::from(i));
        let result = play_game(&config.params, seed)?;
        info!(
            game = i + 1,
            seed = result.seed,
            winner = result.winner,
            scores = ?result.scores,
            rounds = result.rounds,
            actions = result.actions,
            heuristic = result.heuristic,
            "game finished"
        );
        stats.record(&result);
    }

    Ok(stats)
}
