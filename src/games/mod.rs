pub mod whack;

use crate::games::whack::game::Mode;

/// Metadata about a selectable game mode
#[derive(Clone, Debug)]
pub struct GameInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub mode: Mode,
}

/// Modes offered on the home screen, in display order
pub const MODES: [GameInfo; 2] = [
    GameInfo {
        name: "Timed",
        description: "Whack as many moles as you can before the clock runs out",
        mode: Mode::Timed,
    },
    GameInfo {
        name: "Survival",
        description: "Every mole that gets away costs a life",
        mode: Mode::Survival,
    },
];
