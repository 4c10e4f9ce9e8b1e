pub mod game;
pub mod levels;
pub mod renderer;

pub use game::{GameState, HitOutcome, Mode, Phase, RoundSummary, Target, TargetKind, WhackGame};
pub use levels::{LevelSpec, LevelTable};

use crate::core::audio::SoundManager;
use crate::core::engine::Engine;
use anyhow::Result;
use ratatui::DefaultTerminal;

/// Play rounds of `mode` until the player heads home or quits.
/// Returns the game so the caller can read the last round's summary.
pub async fn run_game(
    mut game: WhackGame,
    mode: Mode,
    audio: &mut SoundManager,
    terminal: &mut DefaultTerminal,
) -> Result<WhackGame> {
    game.start(mode);
    let engine = Engine::new(game, audio);
    engine.run(terminal).await
}
