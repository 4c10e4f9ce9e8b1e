//! Core game interface driven by the terminal engine

use crossterm::event::Event;
use ratatui::layout::Rect;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Outbox handed to games so they can raise cues (sounds, flashes) without
/// owning the output devices themselves
pub struct Context<M> {
    pub tx: UnboundedSender<M>,
}

impl<M> Context<M> {
    pub fn new(tx: UnboundedSender<M>) -> Self {
        Self { tx }
    }

    pub fn emit(&self, msg: M) {
        // The engine may already be shutting down; a dropped cue is harmless
        let _ = self.tx.send(msg);
    }
}

/// Main game trait that the engine drives
pub trait Game {
    /// Events the game emits for the engine to act on
    type Message: Send + 'static;

    /// How often `on_tick` should run. `None` for games that only react to input.
    fn tick_rate(&self) -> Option<Duration>;

    /// Called with the elapsed time since the previous tick
    fn on_tick(&mut self, dt: Duration, ctx: &Context<Self::Message>);

    /// Terminal input. `area` is the current terminal size, for mouse hit-testing.
    fn handle_event(&mut self, event: &Event, area: Rect, ctx: &Context<Self::Message>);

    fn render(&self, frame: &mut ratatui::Frame);

    /// The engine stops running the game once this returns true
    fn wants_exit(&self) -> bool;
}
