use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::TestBackend;
use ratatui::layout::{Position, Rect};
use ratatui::Terminal;
use tokio::sync::mpsc::unbounded_channel;

use whackterm::config::GameConfig;
use whackterm::core::audio::Cue;
use whackterm::core::menu::{HomeMenu, MenuResult};
use whackterm::games::whack::game::{digit_for_slot, slot_for_digit};
use whackterm::games::whack::renderer::{hole_rects, screen_layout, slot_at};
use whackterm::games::whack::{Mode, Phase, WhackGame};
use whackterm::{Context, Game};

const AREA: Rect = Rect { x: 0, y: 0, width: 60, height: 24 };

fn key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn started_game() -> WhackGame {
    let mut config = GameConfig::default();
    config.bonus_chance = 0.0;
    let mut game = WhackGame::new(config, StdRng::seed_from_u64(3)).unwrap();
    game.start(Mode::Timed);
    game
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
}

#[test]
fn keypad_layout_round_trips() {
    assert_eq!(slot_for_digit('7'), Some(0));
    assert_eq!(slot_for_digit('5'), Some(4));
    assert_eq!(slot_for_digit('3'), Some(8));
    assert_eq!(slot_for_digit('0'), None);
    assert_eq!(slot_for_digit('x'), None);
    for slot in 0..9 {
        assert_eq!(slot_for_digit(digit_for_slot(slot).unwrap()), Some(slot));
    }
}

#[test]
fn every_hole_center_maps_back_to_its_slot() {
    let cells = hole_rects(screen_layout(AREA).board);
    for (slot, cell) in cells.iter().enumerate() {
        let (x, y) = (cell.x + cell.width / 2, cell.y + cell.height / 2);
        assert_eq!(slot_at(AREA, x, y), Some(slot));
    }
    // The header is not part of the board
    assert_eq!(slot_at(AREA, 1, 0), None);
}

#[test]
fn holes_do_not_overlap() {
    let cells = hole_rects(screen_layout(AREA).board);
    for (i, a) in cells.iter().enumerate() {
        for b in &cells[i + 1..] {
            assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn digit_key_whacks_the_matching_hole() {
    let mut game = started_game();
    let (tx, mut rx) = unbounded_channel();
    let ctx = Context::new(tx);

    let slot = game.state().target.unwrap().slot;
    game.handle_event(&key(digit_for_slot(slot).unwrap()), AREA, &ctx);

    assert_eq!(game.state().score, 10);
    assert_eq!(rx.try_recv().unwrap(), Cue::Start);
    assert_eq!(rx.try_recv().unwrap(), Cue::Hit);
}

#[test]
fn mouse_click_whacks_the_hole_under_the_cursor() {
    let mut game = started_game();
    let (tx, _rx) = unbounded_channel();
    let ctx = Context::new(tx);

    let slot = game.state().target.unwrap().slot;
    let cell = hole_rects(screen_layout(AREA).board)[slot];
    assert!(cell.contains(Position::new(cell.x + 1, cell.y + 1)));
    game.handle_event(&click(cell.x + 1, cell.y + 1), AREA, &ctx);

    assert_eq!(game.state().score, 10);
}

#[test]
fn pause_key_toggles_and_home_key_exits() {
    let mut game = started_game();
    let (tx, _rx) = unbounded_channel();
    let ctx = Context::new(tx);

    game.handle_event(&key('h'), AREA, &ctx);
    assert!(!game.wants_exit(), "home only works from pause or game over");

    game.handle_event(&key('p'), AREA, &ctx);
    assert_eq!(game.state().phase, Phase::Paused);
    game.handle_event(&key(' '), AREA, &ctx);
    assert_eq!(game.state().phase, Phase::Playing);

    game.handle_event(&key('p'), AREA, &ctx);
    game.handle_event(&key('h'), AREA, &ctx);
    assert!(game.wants_exit());
}

#[test]
fn losing_focus_pauses_the_round() {
    let mut game = started_game();
    let (tx, _rx) = unbounded_channel();
    let ctx = Context::new(tx);

    game.handle_event(&Event::FocusLost, AREA, &ctx);
    assert_eq!(game.state().phase, Phase::Paused);
    assert_eq!(game.pending_timers(), 0);
    assert!(game.state().target.is_none());

    // Regaining focus leaves the pause to the player
    game.handle_event(&Event::FocusGained, AREA, &ctx);
    assert_eq!(game.state().phase, Phase::Paused);
}

#[test]
fn restart_key_only_after_game_over() {
    let mut game = started_game();
    let (tx, _rx) = unbounded_channel();
    let ctx = Context::new(tx);

    let slot = game.state().target.unwrap().slot;
    game.on_hit(slot);
    game.handle_event(&key('r'), AREA, &ctx);
    assert_eq!(game.state().score, 10);

    game.end();
    game.handle_event(&key('r'), AREA, &ctx);
    assert_eq!(game.state().phase, Phase::Playing);
    assert_eq!(game.state().score, 0);
}

#[test]
fn menu_navigation() {
    let mut menu = HomeMenu::new();
    assert_eq!(menu.handle_key(KeyCode::Up), None);
    assert_eq!(menu.handle_key(KeyCode::Enter), Some(MenuResult::Start(Mode::Timed)));

    assert_eq!(menu.handle_key(KeyCode::Down), None);
    assert_eq!(menu.handle_key(KeyCode::Down), None);
    assert_eq!(menu.handle_key(KeyCode::Enter), Some(MenuResult::Start(Mode::Survival)));

    assert_eq!(menu.handle_key(KeyCode::Char('q')), Some(MenuResult::Quit));
    assert_eq!(HomeMenu::with_selected(Mode::Survival).selected, 1);
}

#[test]
fn renders_hud_and_overlays() {
    let mut game = started_game();
    let mut terminal = Terminal::new(TestBackend::new(AREA.width, AREA.height)).unwrap();

    terminal.draw(|f| game.render(f)).unwrap();
    let text = screen_text(&terminal);
    assert!(text.contains("SCORE"));
    assert!(text.contains("TIME"));
    assert!(text.contains("(o.o)"));

    game.pause();
    terminal.draw(|f| game.render(f)).unwrap();
    assert!(screen_text(&terminal).contains("PAUSED"));

    game.resume();
    game.end();
    terminal.draw(|f| game.render(f)).unwrap();
    let text = screen_text(&terminal);
    assert!(text.contains("GAME OVER"));
    assert!(text.contains("Final score: 0"));
}
