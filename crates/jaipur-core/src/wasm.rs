//! WebAssembly bindings for the Jaipur engine.
//!
//! This module exposes the engine to JavaScript through wasm-bindgen.
//! Everything crosses the boundary as JSON.

use wasm_bindgen::prelude::*;

use crate::actions::GameAction;
use crate::game::GameState;
use crate::params::JaipurParams;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game. `rules_json` may be empty for the default rules.
    #[wasm_bindgen(constructor)]
    pub fn new(player_names_json: &str, rules_json: &str, seed: u64) -> Result<WasmGame, JsValue> {
        let player_names: Vec<String> = serde_json::from_str(player_names_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid player names: {}", e)))?;

        let params = if rules_json.trim().is_empty() {
            JaipurParams::default()
        } else {
            JaipurParams::from_json(rules_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid rules: {}", e)))?
        };

        let state = GameState::new(params, player_names, seed)
            .map_err(|e| JsValue::from_str(&format!("Cannot start game: {}", e)))?;
        Ok(WasmGame { state })
    }

    /// Get the host-facing view of the game as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current player ID
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.state.current_player()
    }

    /// Get valid actions for the current player as JSON array
    #[wasm_bindgen(js_name = getValidActions)]
    pub fn get_valid_actions(&self) -> String {
        let actions = self.state.valid_actions(self.state.current_player());
        serde_json::to_string(&actions).unwrap_or_else(|_| "[]".to_string())
    }

    /// Apply an action from JSON and run the round lifecycle.
    /// Returns the turn report as JSON.
    #[wasm_bindgen(js_name = playAction)]
    pub fn play_action(&mut self, player: u8, action_json: &str) -> Result<String, JsValue> {
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        match self.state.play(player, action) {
            Ok(report) => Ok(serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Action failed: {}", e))),
        }
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Get the winner (if game is finished)
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<u8> {
        self.state.get_winner()
    }

    /// Round points for a player including the provisional camel bonus
    #[wasm_bindgen(js_name = getProvisionalScore)]
    pub fn get_provisional_score(&self, player: u8) -> u32 {
        self.state.provisional_score(player)
    }

    /// Evaluation summary of the game for external tooling
    #[wasm_bindgen(js_name = getHeuristicSummary)]
    pub fn get_heuristic_summary(&self) -> f64 {
        self.state.heuristic_summary()
    }
}
