use crate::core::audio::{Cue, SoundManager};
use crate::{Context, Game};
use anyhow::Result;
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event, KeyCode, KeyEventKind,
};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::debug;

const IDLE_SLEEP: Duration = Duration::from_millis(16);

pub struct Engine<'a, G: Game<Message = Cue>> {
    game: G,
    audio: &'a mut SoundManager,
}

impl<'a, G: Game<Message = Cue>> Engine<'a, G> {
    pub fn new(game: G, audio: &'a mut SoundManager) -> Self {
        Self { game, audio }
    }

    /// Run until the game asks to leave or the player presses Esc.
    /// Hands the game back so the caller can read its final state.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<G> {
        crossterm::execute!(std::io::stdout(), EnableMouseCapture, EnableFocusChange)?;
        let result = self.event_loop(terminal).await;
        crossterm::execute!(std::io::stdout(), DisableMouseCapture, DisableFocusChange)?;
        result.map(|_| self.game)
    }

    async fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let started = Instant::now();
        let mut last_tick = Instant::now();

        // Cues raised by the game land here and are forwarded to the audio device
        let (outbox_tx, mut outbox_rx) = tokio::sync::mpsc::unbounded_channel::<Cue>();
        let ctx = Context::new(outbox_tx);

        loop {
            terminal.draw(|f| self.game.render(f))?;

            // INPUT (Non-blocking)
            while crossterm::event::poll(Duration::ZERO)? {
                let event = crossterm::event::read()?;
                if let Event::Key(key) = &event {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Esc => return Ok(()),
                            KeyCode::Char('m') => {
                                let muted = self.audio.toggle_mute();
                                debug!(muted, "mute toggled");
                                continue;
                            }
                            _ => {}
                        }
                    }
                }
                let size = terminal.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                self.game.handle_event(&event, area, &ctx);
            }

            if self.game.wants_exit() {
                return Ok(());
            }

            // Always wake the loop periodically so input keeps getting polled even when
            // the game does not use ticks.
            let tick_rate = self.game.tick_rate();
            let tick_sleep = tick_rate.unwrap_or(IDLE_SLEEP);

            tokio::select! {
                Some(cue) = outbox_rx.recv() => {
                    self.audio.play(cue, started.elapsed());
                }

                _ = tokio::time::sleep(tick_sleep) => {
                    if tick_rate.is_some() {
                        let dt = last_tick.elapsed();
                        last_tick = Instant::now();
                        self.game.on_tick(dt, &ctx);
                    }
                }
            }

            self.audio.pump(started.elapsed());
        }
    }
}
