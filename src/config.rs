use serde::Deserialize;

use crate::types::Color;

pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

/// Per-game settings, passed to the controller and the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Plies searched by the engine on its turn.
    pub search_depth: u8,
    pub first_turn: Color,
    /// Side played by the engine. The search itself always maximizes for white.
    pub engine_color: Color,
}

impl GameConfig {
    pub fn with_depth(search_depth: u8) -> Self {
        Self {
            search_depth,
            ..Self::default()
        }
    }

    pub fn human_color(&self) -> Color {
        self.engine_color.opposite()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            first_turn: Color::Red,
            engine_color: Color::White,
        }
    }
}
