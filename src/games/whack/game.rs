use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::core::audio::Cue;
use crate::core::scheduler::{Scheduler, TimerHandle};
use crate::error::ConfigError;
use crate::games::whack::levels::LevelTable;
use crate::games::whack::renderer;
use crate::{Context, Game};

pub const GRID_SLOTS: usize = 9;

const FRAME_RATE: Duration = Duration::from_millis(16);
const SECOND: Duration = Duration::from_secs(1);
const LEVEL_UP_FLASH: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Score as much as possible before the clock runs out
    Timed,
    /// Play until enough moles escape
    Survival,
}

impl Mode {
    /// The bonus item that can appear in this mode
    pub fn bonus_kind(self) -> TargetKind {
        match self {
            Mode::Timed => TargetKind::TimeBonus,
            Mode::Survival => TargetKind::LifeBonus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Timed => "Timed",
            Mode::Survival => "Survival",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Mole,
    TimeBonus,
    LifeBonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub slot: usize,
    pub kind: TargetKind,
    pub hit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    Paused,
    Over,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    pub level: u32,
    pub time_left: u32,
    pub lives: u32,
    pub mode: Mode,
    pub phase: Phase,
    /// The single target currently up, if any
    pub target: Option<Target>,
    pub moles_hit: u32,
    pub moles_missed: u32,
}

impl GameState {
    fn fresh(mode: Mode, config: &GameConfig) -> Self {
        Self {
            score: 0,
            level: 1,
            time_left: config.round_seconds,
            lives: config.starting_lives,
            mode,
            phase: Phase::Idle,
            target: None,
            moles_hit: 0,
            moles_missed: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }
}

/// Final numbers of a finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub mode: Mode,
    pub score: u32,
    pub level: u32,
    pub time_left: u32,
    pub lives: u32,
    pub moles_hit: u32,
    pub moles_missed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Hit(TargetKind),
    /// Nothing was up in that hole
    Whiff,
    /// Not playing, or the target was already hit
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Tick,
    Spawn,
    Despawn,
    HideHit,
}

/// The whack-a-mole round controller.
///
/// All timing goes through an internal [`Scheduler`]; the engine feeds it
/// frame deltas through [`WhackGame::advance`], and tests can drive it the same way.
pub struct WhackGame {
    config: GameConfig,
    levels: LevelTable,
    state: GameState,
    scheduler: Scheduler<Timer>,
    despawn_timer: Option<TimerHandle>,
    hide_timer: Option<TimerHandle>,
    rng: StdRng,
    cues: Vec<Cue>,
    summary: Option<RoundSummary>,
    level_up_until: Option<Duration>,
    exit: bool,
}

impl WhackGame {
    pub fn new(config: GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let levels = config.level_table()?;
        let state = GameState::fresh(Mode::Timed, &config);
        Ok(Self {
            config,
            levels,
            state,
            scheduler: Scheduler::new(),
            despawn_timer: None,
            hide_timer: None,
            rng,
            cues: Vec::new(),
            summary: None,
            level_up_until: None,
            exit: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    /// Summary of the most recently finished round
    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn level_up_flash(&self) -> bool {
        self.level_up_until.is_some_and(|until| self.scheduler.now() < until)
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn start(&mut self, mode: Mode) {
        self.cancel_timers();
        self.state = GameState::fresh(mode, &self.config);
        self.state.phase = Phase::Playing;
        self.summary = None;
        self.level_up_until = None;
        self.exit = false;
        self.cues.push(Cue::Start);
        info!(mode = mode.label(), "round started");

        if mode == Mode::Timed {
            self.scheduler.schedule(SECOND, Timer::Tick);
        }
        self.spawn();
    }

    pub fn restart(&mut self) {
        self.start(self.state.mode);
    }

    /// Put a new target up and queue the next spawn
    pub fn spawn(&mut self) {
        if !self.state.is_playing() {
            return;
        }

        // Timers left over from the previous target must not touch the new one
        for handle in [self.despawn_timer.take(), self.hide_timer.take()].into_iter().flatten() {
            self.scheduler.cancel(handle);
        }
        self.expire_target();
        // An escaped mole may have cost the last life
        if !self.state.is_playing() {
            return;
        }

        let slot = self.rng.random_range(0..GRID_SLOTS);
        let kind = if self.rng.random_bool(self.config.bonus_probability()) {
            self.state.mode.bonus_kind()
        } else {
            TargetKind::Mole
        };
        self.state.target = Some(Target { slot, kind, hit: false });

        let spec = *self.levels.spec_for(self.state.level);
        debug!(slot, ?kind, level = spec.level, "target up");
        self.despawn_timer = Some(self.scheduler.schedule(spec.display_duration(), Timer::Despawn));
        self.scheduler.schedule(spec.spawn_interval(), Timer::Spawn);
    }

    /// The display window ran out
    fn despawn(&mut self) {
        self.despawn_timer = None;
        self.expire_target();
    }

    /// Drop the current target; an unhit mole escaping in survival mode costs a life
    fn expire_target(&mut self) {
        let Some(target) = self.state.target.take() else {
            return;
        };
        if target.hit || target.kind != TargetKind::Mole {
            return;
        }

        self.state.moles_missed = self.state.moles_missed.saturating_add(1);
        if self.state.mode == Mode::Survival {
            self.state.lives = self.state.lives.saturating_sub(1);
            self.cues.push(Cue::Miss);
            debug!(lives = self.state.lives, "mole escaped");
            if self.state.lives == 0 {
                self.end();
            }
        }
    }

    pub fn on_hit(&mut self, slot: usize) -> HitOutcome {
        if !self.state.is_playing() || slot >= GRID_SLOTS {
            return HitOutcome::Ignored;
        }

        let target = match self.state.target {
            Some(t) if t.slot == slot => t,
            _ => {
                self.cues.push(Cue::Whiff);
                return HitOutcome::Whiff;
            }
        };
        if target.hit {
            return HitOutcome::Ignored;
        }

        match target.kind {
            TargetKind::Mole => {
                self.state.score = self.state.score.saturating_add(self.config.points_per_mole);
                self.state.moles_hit = self.state.moles_hit.saturating_add(1);
                self.check_level_up();
            }
            TargetKind::TimeBonus => {
                self.state.time_left = self.state.time_left.saturating_add(self.config.time_bonus_seconds)
            }
            TargetKind::LifeBonus => self.state.lives = self.state.lives.saturating_add(1),
        }
        self.state.target = Some(Target { hit: true, ..target });
        self.cues.push(Cue::Hit);
        debug!(slot, kind = ?target.kind, score = self.state.score, "hit");

        if let Some(handle) = self.despawn_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.hide_timer = Some(self.scheduler.schedule(self.config.hit_linger(), Timer::HideHit));

        HitOutcome::Hit(target.kind)
    }

    /// Move up as many levels as the score allows. Returns true if the level changed.
    pub fn check_level_up(&mut self) -> bool {
        let mut advanced = false;
        while let Some(next) = self.levels.next_after(self.state.level) {
            if self.state.score < next.score_threshold {
                break;
            }
            self.state.level = next.level;
            self.cues.push(Cue::LevelUp(next.level));
            info!(level = next.level, score = self.state.score, "level up");
            advanced = true;
        }
        if advanced {
            self.level_up_until = Some(self.scheduler.now() + LEVEL_UP_FLASH);
        }
        advanced
    }

    fn tick(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        self.state.time_left = self.state.time_left.saturating_sub(1);
        trace!(time_left = self.state.time_left, "tick");
        if self.state.time_left == 0 {
            self.end();
        } else {
            self.scheduler.schedule(SECOND, Timer::Tick);
        }
    }

    /// Suspend the round. The visible target is withdrawn without penalty.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.cancel_timers();
        self.state.target = None;
        self.state.phase = Phase::Paused;
        info!("paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.state.is_paused() {
            return false;
        }
        self.state.phase = Phase::Playing;
        info!("resumed");
        if self.state.mode == Mode::Timed {
            self.scheduler.schedule(SECOND, Timer::Tick);
        }
        self.spawn();
        true
    }

    /// Stop the round and report the final numbers
    pub fn end(&mut self) -> RoundSummary {
        if self.state.phase == Phase::Over {
            if let Some(summary) = &self.summary {
                return summary.clone();
            }
        }

        self.cancel_timers();
        self.state.target = None;
        self.state.phase = Phase::Over;
        self.cues.push(Cue::GameOver);

        let summary = RoundSummary {
            mode: self.state.mode,
            score: self.state.score,
            level: self.state.level,
            time_left: self.state.time_left,
            lives: self.state.lives,
            moles_hit: self.state.moles_hit,
            moles_missed: self.state.moles_missed,
        };
        info!(score = summary.score, level = summary.level, mode = summary.mode.label(), "round over");
        self.summary = Some(summary.clone());
        summary
    }

    /// Abandon the current round and hand control back to the home screen
    pub fn go_home(&mut self) {
        self.cancel_timers();
        self.state.target = None;
        self.state.phase = Phase::Idle;
        self.exit = true;
    }

    /// Run the clock forward, firing every timer that falls due on the way
    pub fn advance(&mut self, dt: Duration) {
        let until = self.scheduler.now() + dt;
        while let Some(timer) = self.scheduler.pop_due(until) {
            trace!(?timer, now = ?self.scheduler.now(), "timer fired");
            match timer {
                Timer::Tick => self.tick(),
                Timer::Spawn => self.spawn(),
                Timer::Despawn => self.despawn(),
                Timer::HideHit => {
                    self.hide_timer = None;
                    self.state.target = None;
                }
            }
        }
        self.scheduler.settle(until);
    }

    fn cancel_timers(&mut self) {
        self.scheduler.clear();
        self.despawn_timer = None;
        self.hide_timer = None;
    }

    fn toggle_pause(&mut self) {
        match self.state.phase {
            Phase::Playing => {
                self.pause();
            }
            Phase::Paused => {
                self.resume();
            }
            Phase::Idle | Phase::Over => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let KeyCode::Char(c) = code else {
            return;
        };
        if let Some(slot) = slot_for_digit(c) {
            self.on_hit(slot);
            return;
        }
        match c {
            'p' | ' ' => self.toggle_pause(),
            'r' if self.state.phase == Phase::Over => self.restart(),
            'h' if matches!(self.state.phase, Phase::Paused | Phase::Over) => self.go_home(),
            _ => {}
        }
    }

    fn flush(&mut self, ctx: &Context<Cue>) {
        for cue in self.cues.drain(..) {
            ctx.emit(cue);
        }
    }
}

/// Holes are laid out like a numeric keypad: 7-8-9 is the top row
pub fn slot_for_digit(c: char) -> Option<usize> {
    match c {
        '7' => Some(0),
        '8' => Some(1),
        '9' => Some(2),
        '4' => Some(3),
        '5' => Some(4),
        '6' => Some(5),
        '1' => Some(6),
        '2' => Some(7),
        '3' => Some(8),
        _ => None,
    }
}

pub fn digit_for_slot(slot: usize) -> Option<char> {
    ['7', '8', '9', '4', '5', '6', '1', '2', '3'].get(slot).copied()
}

impl Game for WhackGame {
    type Message = Cue;

    fn tick_rate(&self) -> Option<Duration> {
        Some(FRAME_RATE)
    }

    fn on_tick(&mut self, dt: Duration, ctx: &Context<Self::Message>) {
        self.advance(dt);
        self.flush(ctx);
    }

    fn handle_event(&mut self, event: &Event, area: Rect, ctx: &Context<Self::Message>) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if let Some(slot) = renderer::slot_at(area, mouse.column, mouse.row) {
                    self.on_hit(slot);
                }
            }
            Event::FocusLost => {
                self.pause();
            }
            _ => {}
        }
        self.flush(ctx);
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        renderer::render(frame, self);
    }

    fn wants_exit(&self) -> bool {
        self.exit
    }
}
