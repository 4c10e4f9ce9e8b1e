use ratatui::{
    widgets::{Block, Borders, List, ListItem, Paragraph},
    layout::{Layout, Constraint, Direction, Alignment},
    style::{Style, Color, Modifier},
    Frame,
};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::time::Duration;
use anyhow::Result;

use crate::games::{GameInfo, MODES};
use crate::games::whack::game::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuResult {
    Start(Mode),
    Quit,
}

/// Home screen: pick a mode or leave
pub struct HomeMenu {
    pub selected: usize,
}

impl Default for HomeMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeMenu {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    /// Start with the cursor on `mode`
    pub fn with_selected(mode: Mode) -> Self {
        let selected = MODES.iter().position(|m| m.mode == mode).unwrap_or(0);
        Self { selected }
    }

    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> Result<MenuResult> {
        loop {
            terminal.draw(|f| self.render(f, &MODES))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Some(result) = self.handle_key(key.code) {
                        return Ok(result);
                    }
                }
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Option<MenuResult> {
        match code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(MODES.len() - 1),
            KeyCode::Enter | KeyCode::Char(' ') => return Some(MenuResult::Start(MODES[self.selected].mode)),
            KeyCode::Char('q') | KeyCode::Esc => return Some(MenuResult::Quit),
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame, modes: &[GameInfo]) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(f.area());

        f.render_widget(
            Paragraph::new(" WHACK-A-MOLE ")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[0]
        );

        let items: Vec<ListItem> = modes.iter().enumerate().map(|(i, m)| {
            let style = if i == self.selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(" » {} : {}", m.name, m.description)).style(style)
        }).collect();

        f.render_widget(
            List::new(items).block(Block::default().title(" GAME MODES ").borders(Borders::ALL)),
            chunks[1]
        );

        f.render_widget(
            Paragraph::new("[↑/↓] Navigate  [Enter] Start  [Q] Quit")
                .alignment(Alignment::Center),
            chunks[2]
        );
    }
}
