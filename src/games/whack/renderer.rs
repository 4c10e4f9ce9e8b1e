use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::games::whack::game::{digit_for_slot, Mode, Phase, Target, TargetKind, WhackGame, GRID_SLOTS};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;

/// Screen regions shared by drawing and mouse hit-testing
pub struct ScreenAreas {
    pub header: Rect,
    pub board: Rect,
    pub footer: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    ScreenAreas { header: chunks[0], board: chunks[1], footer: chunks[2] }
}

/// Rects of the nine holes, row by row from the top left
pub fn hole_rects(board: Rect) -> [Rect; GRID_SLOTS] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(board);

    let mut cells = [Rect::default(); GRID_SLOTS];
    for (r, row) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(*row);
        for (c, cell) in cols.iter().enumerate() {
            cells[r * 3 + c] = *cell;
        }
    }
    cells
}

/// Which hole a terminal cell belongs to, given the full terminal area
pub fn slot_at(area: Rect, column: u16, row: u16) -> Option<usize> {
    let board = screen_layout(area).board;
    hole_rects(board)
        .iter()
        .position(|cell| cell.contains(Position::new(column, row)))
}

pub fn render(frame: &mut Frame, game: &WhackGame) {
    let areas = screen_layout(frame.area());
    let state = game.state();

    render_header(frame, game, areas.header);

    let cells = hole_rects(areas.board);
    for (slot, cell) in cells.iter().enumerate() {
        let target = state.target.filter(|t| t.slot == slot);
        render_hole(frame, slot, target, *cell);
    }

    let help = match state.phase {
        Phase::Playing => "[1-9] Whack  [Click] Whack  [P] Pause  [M] Mute  [Esc] Quit",
        Phase::Paused => "[P] Resume  [H] Home  [Esc] Quit",
        Phase::Over => "[R] Restart  [H] Home  [Esc] Quit",
        Phase::Idle => "[Esc] Quit",
    };
    frame.render_widget(
        Paragraph::new(help)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        areas.footer,
    );

    match state.phase {
        Phase::Paused => render_popup(
            frame,
            " PAUSED ",
            vec![Line::from("Game paused"), Line::from(""), Line::from("[P] Resume   [H] Home")],
        ),
        Phase::Over => {
            let (score, level) = game
                .summary()
                .map_or((state.score, state.level), |s| (s.score, s.level));
            render_popup(
                frame,
                " GAME OVER ",
                vec![
                    Line::from(format!("Final score: {score}")),
                    Line::from(format!("Level reached: {level}")),
                    Line::from(""),
                    Line::from("[R] Play again   [H] Home"),
                ],
            );
        }
        Phase::Playing | Phase::Idle => {}
    }
}

fn render_header(frame: &mut Frame, game: &WhackGame, area: Rect) {
    let state = game.state();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let level_style = if game.level_up_flash() {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default()
    };

    let (remaining_title, remaining) = match state.mode {
        Mode::Timed => (" TIME ", format!("{}s", state.time_left)),
        Mode::Survival => (" LIVES ", "♥".repeat(state.lives as usize)),
    };

    let boxes = [
        (" SCORE ", state.score.to_string(), Style::default()),
        (" LEVEL ", state.level.to_string(), level_style),
        (remaining_title, remaining, Style::default().fg(Color::Red)),
    ];
    for ((title, value, style), chunk) in boxes.into_iter().zip(chunks.iter()) {
        frame.render_widget(
            Paragraph::new(value)
                .style(style)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(title)),
            *chunk,
        );
    }
}

fn render_hole(frame: &mut Frame, slot: usize, target: Option<Target>, area: Rect) {
    let (art, style) = match target {
        Some(Target { hit: true, .. }) => ("(x_x)", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Some(Target { kind: TargetKind::Mole, .. }) => ("(o.o)", Style::default().fg(Color::Yellow)),
        Some(Target { kind: TargetKind::TimeBonus, .. }) => ("[+⏱]", Style::default().fg(Color::Cyan)),
        Some(Target { kind: TargetKind::LifeBonus, .. }) => ("[+♥]", Style::default().fg(Color::Green)),
        None => ("", Style::default()),
    };

    let title = digit_for_slot(slot).map(|d| format!(" {d} ")).unwrap_or_default();
    let block = Block::default().borders(Borders::ALL).title(title);
    // Push the art to the vertical middle of the hole
    let pad = area.height.saturating_sub(2) / 2;
    let mut lines = vec![Line::from(""); pad as usize];
    lines.push(Line::from(Span::styled(art, style)));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
}

fn render_popup(frame: &mut Frame, title: &str, lines: Vec<Line>) {
    let width = 36;
    let height = lines.len() as u16 + 2;
    let area = centered(frame.area(), width, height);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()).style(Style::default().fg(Color::Cyan))),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
