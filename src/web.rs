//! Browser bindings
//!
//! Thin wrappers the page drives from `requestAnimationFrame` and click
//! handlers. Rendering stays in JavaScript; state crosses as JSON.

use wasm_bindgen::prelude::*;

use crate::error::GameError;
use crate::settings::{Difficulty, Settings};
use crate::sim::{GameMap, Hud, Player};
use crate::sweeper::{Board, DEFAULT_LIVES, MarkOutcome};

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Gold Sweeper loaded");
}

#[wasm_bindgen]
pub struct GoldDiggerGame {
    map: GameMap,
    player: Player,
    hud: Hud,
}

#[wasm_bindgen]
impl GoldDiggerGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let now = js_sys::Date::now();
        let seed = now as u64;
        log::info!("Gold digger started with seed: {}", seed);
        Self {
            map: GameMap::new(seed, now),
            player: Player::new(),
            hud: Hud::default(),
        }
    }

    /// Advance one frame using the page clock
    pub fn frame(&mut self) {
        self.map
            .frame(&mut self.player, &mut self.hud, js_sys::Date::now());
    }

    pub fn launch_hook(&mut self) -> bool {
        self.map.launch_hook()
    }

    pub fn throw_dynamite(&mut self) -> bool {
        self.map.throw_dynamite(&mut self.player)
    }

    pub fn score(&self) -> i64 {
        self.player.score
    }

    pub fn dynamites(&self) -> u32 {
        self.player.dynamites
    }

    pub fn level(&self) -> u32 {
        self.hud.level
    }

    pub fn time(&self) -> i64 {
        self.hud.time
    }

    pub fn is_game_over(&self) -> bool {
        self.map.is_game_over
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        to_json(&self.map.snapshot())
    }

    /// Events since the last call, oldest first
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        to_json(&self.map.drain_events())
    }
}

impl Default for GoldDiggerGame {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
pub struct MinesweeperGame {
    settings: Settings,
    board: Board,
}

#[wasm_bindgen]
impl MinesweeperGame {
    /// New board for the stored difficulty
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let settings = Settings::load();
        let board = Board::new(settings.difficulty, DEFAULT_LIVES, js_sys::Date::now() as u64);
        Self { settings, board }
    }

    /// Store a new difficulty and start over with it
    pub fn set_difficulty(&mut self, name: &str) -> bool {
        let Some(difficulty) = Difficulty::from_str(name) else {
            log::warn!("Ignoring unknown difficulty '{}'", name);
            return false;
        };
        self.settings.difficulty = difficulty;
        self.settings.save();
        self.board = Board::new(difficulty, DEFAULT_LIVES, js_sys::Date::now() as u64);
        true
    }

    pub fn difficulty(&self) -> String {
        self.settings.difficulty.as_str().to_string()
    }

    /// Reveal a cell; returns the outcome as JSON
    pub fn left_click(&mut self, x: i32, y: i32) -> Result<String, JsValue> {
        let outcome = self.board.cell_left_click(x, y)?;
        to_json(&outcome)
    }

    /// Toggle a flag; true when the cell changed
    pub fn right_click(&mut self, x: i32, y: i32) -> Result<bool, JsValue> {
        Ok(self.board.cell_right_click(x, y)? == MarkOutcome::Changed)
    }

    pub fn width(&self) -> u32 {
        self.board.width()
    }

    pub fn height(&self) -> u32 {
        self.board.height()
    }

    pub fn lives(&self) -> u32 {
        self.board.lives()
    }

    pub fn did_player_win(&self) -> bool {
        self.board.did_player_win()
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(&self.board.state())
    }

    pub fn cells_json(&self) -> Result<String, JsValue> {
        to_json(&self.board.cells())
    }
}

impl Default for MinesweeperGame {
    fn default() -> Self {
        Self::new()
    }
}
