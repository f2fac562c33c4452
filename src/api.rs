//! JS-facing bindings. A single game lives in a process-global slot; calls made
//! before `new_game` operate on a default game.

use std::sync::Mutex;

use once_cell::sync::Lazy;
use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::GameState;

static GAME: Lazy<Mutex<Option<GameState>>> = Lazy::new(|| Mutex::new(None));

fn with_game<T>(f: impl FnOnce(&mut GameState) -> T) -> T {
    let mut slot = GAME.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(slot.get_or_insert_with(GameState::default))
}

fn install(game: GameState) {
    let mut slot = GAME.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Some(game);
}

/// Routes `log` output to the browser console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_logging() -> Result<(), JsValue> {
    console_log::init_with_level(log::Level::Debug)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn new_game(depth: u8) {
    install(GameState::with_default_engine(GameConfig::with_depth(depth)));
}

/// Starts a game from a `GameConfig`-shaped object; missing fields keep their defaults.
#[wasm_bindgen]
pub fn new_game_with_config(config: JsValue) -> Result<(), JsValue> {
    let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
    install(GameState::with_default_engine(config));
    Ok(())
}

#[wasm_bindgen]
pub fn select(row: u8, col: u8) -> bool {
    with_game(|game| game.select(row, col))
}

#[wasm_bindgen]
pub fn apply_engine_turn() -> Result<(), JsValue> {
    with_game(GameState::apply_engine_turn).map_err(|err| JsValue::from_str(&err))
}

#[wasm_bindgen]
pub fn is_engine_turn() -> bool {
    with_game(|game| game.is_engine_turn())
}

#[wasm_bindgen]
pub fn reset() {
    with_game(GameState::reset);
}

#[wasm_bindgen]
pub fn get_state() -> Result<JsValue, JsValue> {
    let state = with_game(|game| game.to_snapshot());
    Ok(serde_wasm_bindgen::to_value(&state)?)
}

#[wasm_bindgen]
pub fn get_result() -> Result<JsValue, JsValue> {
    let result = with_game(|game| game.to_game_result());
    Ok(serde_wasm_bindgen::to_value(&result)?)
}
