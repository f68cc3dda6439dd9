//! Jaipur - rules engine for the two-player trading card game
//!
//! This crate provides the core game logic for Jaipur, including:
//! - Card types, card counts and token stacks
//! - Data-driven rule parameters with variant support (e.g. no jade)
//! - Game state with the Sell and Take actions and a legal-action generator
//! - Round scoring, camel bonus, tie policies and the match win condition
//!
//! # Architecture
//!
//! The engine is a plain owned value. A driver asks [`GameState::valid_actions`]
//! for the legal moves, applies one with [`GameState::apply_action`], checks
//! [`GameState::round_should_end`] and then either scores the round with
//! [`GameState::end_round`] or passes the turn with [`GameState::end_turn`].
//! [`GameState::play`] runs that whole sequence in one call.
//!
//! It can be compiled to:
//! - Native Rust for simulators and hosts
//! - WebAssembly for browser hosts (`wasm` feature)
//!
//! # Modules
//!
//! - [`cards`]: Card types and per-type counts
//! - [`tokens`]: Good and bonus token stacks
//! - [`params`]: Rule parameters
//! - [`player`]: Player hands, herds and scores
//! - [`actions`]: Actions, take modes and events
//! - [`game`]: Game state and action execution
//! - [`round`]: Round scoring and game lifecycle
//! - [`invariants`]: Consistency checks

pub mod actions;
pub mod cards;
pub mod game;
pub mod invariants;
pub mod params;
pub mod player;
pub mod round;
pub mod tokens;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{ActionOutcome, GameAction, GameEvent, TakeMode};
pub use cards::{CardCounts, GoodType, PlayerId};
pub use game::{GameError, GamePhase, GameState, GameStateJson, PLAYER_COUNT};
pub use invariants::{check_invariants, InvariantViolation};
pub use params::{ConfigError, JaipurParams, RoundTiePolicy};
pub use player::Player;
pub use round::{RoundSummary, TurnReport};
pub use tokens::{Token, TokenStack};
