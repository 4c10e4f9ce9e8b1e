//! Sound cues rendered as short tone sequences

use std::collections::VecDeque;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use tracing::{debug, trace};

/// Something the game wants the player to hear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Start,
    Hit,
    /// Swing at an empty hole
    Whiff,
    /// A mole escaped in survival mode
    Miss,
    LevelUp(u32),
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration: Duration,
    pub waveform: Waveform,
    pub volume: f32,
    /// Offset from the start of the cue
    pub offset: Duration,
}

const fn tone(frequency_hz: u32, duration_ms: u64, waveform: Waveform, volume: f32, offset_ms: u64) -> Tone {
    Tone {
        frequency_hz,
        duration: Duration::from_millis(duration_ms),
        waveform,
        volume,
        offset: Duration::from_millis(offset_ms),
    }
}

const HIT: [Tone; 2] = [
    tone(800, 100, Waveform::Square, 0.2, 0),
    tone(1000, 100, Waveform::Square, 0.15, 50),
];
const WHIFF: [Tone; 1] = [tone(200, 200, Waveform::Sawtooth, 0.1, 0)];
const LEVEL_UP: [Tone; 3] = [
    tone(523, 100, Waveform::Sine, 0.2, 0),
    tone(659, 100, Waveform::Sine, 0.2, 100),
    tone(784, 150, Waveform::Sine, 0.2, 200),
];
const GAME_OVER: [Tone; 3] = [
    tone(392, 300, Waveform::Sine, 0.2, 0),
    tone(330, 300, Waveform::Sine, 0.2, 300),
    tone(262, 500, Waveform::Sine, 0.2, 600),
];
const START: [Tone; 3] = [
    tone(262, 100, Waveform::Sine, 0.2, 0),
    tone(330, 100, Waveform::Sine, 0.2, 100),
    tone(392, 150, Waveform::Sine, 0.2, 200),
];

impl Cue {
    pub fn melody(self) -> &'static [Tone] {
        match self {
            Cue::Start => &START,
            Cue::Hit => &HIT,
            // An escaped mole reuses the low buzz
            Cue::Whiff | Cue::Miss => &WHIFF,
            Cue::LevelUp(_) => &LEVEL_UP,
            Cue::GameOver => &GAME_OVER,
        }
    }
}

/// Output device for tones
pub trait ToneSink {
    fn play(&mut self, tone: &Tone) -> io::Result<()>;
}

/// Rings the terminal bell once per tone. Terminals cannot do pitch, so the
/// melody survives only as rhythm.
pub struct BellSink<W: Write> {
    out: W,
}

impl BellSink<io::Stdout> {
    pub fn open() -> io::Result<Self> {
        let out = io::stdout();
        if !out.is_terminal() {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "stdout is not a terminal"));
        }
        Ok(Self { out })
    }
}

impl<W: Write> BellSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ToneSink for BellSink<W> {
    fn play(&mut self, _tone: &Tone) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

/// Plays cues on a best-effort sink. Missing or broken audio never reaches the game.
pub struct SoundManager {
    sink: Option<Box<dyn ToneSink + Send>>,
    initialized: bool,
    muted: bool,
    queue: VecDeque<(Duration, Tone)>,
}

impl Default for SoundManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundManager {
    pub fn new() -> Self {
        Self {
            sink: None,
            initialized: false,
            muted: false,
            queue: VecDeque::new(),
        }
    }

    /// Open the sink once; later calls are no-ops. Failure leaves the manager silent.
    pub fn init<F>(&mut self, open: F)
    where
        F: FnOnce() -> io::Result<Box<dyn ToneSink + Send>>,
    {
        if self.initialized {
            return;
        }
        self.initialized = true;
        match open() {
            Ok(sink) => self.sink = Some(sink),
            Err(e) => debug!(error = %e, "audio unavailable, continuing silently"),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.muted {
            self.queue.clear();
        }
        self.muted
    }

    /// Queue the cue's tones relative to `now`
    pub fn play(&mut self, cue: Cue, now: Duration) {
        if self.muted || self.sink.is_none() {
            return;
        }
        trace!(?cue, "queue cue");
        for tone in cue.melody() {
            self.queue.push_back((now + tone.offset, *tone));
        }
        self.queue.make_contiguous().sort_by_key(|(at, _)| *at);
    }

    /// Play every queued tone whose start time has arrived
    pub fn pump(&mut self, now: Duration) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        while let Some((at, _)) = self.queue.front() {
            if *at > now {
                break;
            }
            let Some((_, tone)) = self.queue.pop_front() else {
                break;
            };
            if let Err(e) = sink.play(&tone) {
                debug!(error = %e, "tone playback failed");
            }
        }
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
