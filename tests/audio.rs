use pretty_assertions::assert_eq;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use whackterm::core::audio::{BellSink, Cue, SoundManager, Tone, ToneSink};

#[derive(Clone, Default)]
struct Recorder {
    played: Arc<Mutex<Vec<u32>>>,
}

impl ToneSink for Recorder {
    fn play(&mut self, tone: &Tone) -> io::Result<()> {
        self.played.lock().unwrap().push(tone.frequency_hz);
        Ok(())
    }
}

struct Broken;

impl ToneSink for Broken {
    fn play(&mut self, _tone: &Tone) -> io::Result<()> {
        Err(io::Error::other("speaker unplugged"))
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn manager_with(recorder: &Recorder) -> SoundManager {
    let mut audio = SoundManager::new();
    let sink = recorder.clone();
    audio.init(move || Ok(Box::new(sink) as Box<dyn ToneSink + Send>));
    audio
}

#[test]
fn melody_plays_on_schedule() {
    let recorder = Recorder::default();
    let mut audio = manager_with(&recorder);

    audio.play(Cue::LevelUp(2), ms(1000));
    assert_eq!(audio.queued(), 3);

    audio.pump(ms(1000));
    assert_eq!(*recorder.played.lock().unwrap(), vec![523]);

    audio.pump(ms(1150));
    assert_eq!(*recorder.played.lock().unwrap(), vec![523, 659]);

    audio.pump(ms(5000));
    assert_eq!(*recorder.played.lock().unwrap(), vec![523, 659, 784]);
    assert_eq!(audio.queued(), 0);
}

#[test]
fn overlapping_cues_interleave_by_start_time() {
    let recorder = Recorder::default();
    let mut audio = manager_with(&recorder);

    audio.play(Cue::Start, ms(0));
    audio.play(Cue::Hit, ms(20));
    audio.pump(ms(1000));
    assert_eq!(*recorder.played.lock().unwrap(), vec![262, 800, 1000, 330, 392]);
}

#[test]
fn failed_init_is_silent() {
    let mut audio = SoundManager::new();
    audio.init(|| Err(io::Error::new(io::ErrorKind::Unsupported, "no audio")));
    audio.play(Cue::GameOver, ms(0));
    assert_eq!(audio.queued(), 0);
    audio.pump(ms(10_000));
}

#[test]
fn init_only_opens_once() {
    let mut audio = SoundManager::new();
    let mut opened = 0;
    audio.init(|| {
        opened += 1;
        Ok(Box::new(Recorder::default()) as Box<dyn ToneSink + Send>)
    });
    audio.init(|| {
        opened += 1;
        Ok(Box::new(Recorder::default()) as Box<dyn ToneSink + Send>)
    });
    assert_eq!(opened, 1);
}

#[test]
fn playback_errors_are_swallowed() {
    let mut audio = SoundManager::new();
    audio.init(|| Ok(Box::new(Broken) as Box<dyn ToneSink + Send>));
    audio.play(Cue::Hit, ms(0));
    audio.pump(ms(1000));
    assert_eq!(audio.queued(), 0);
}

#[test]
fn mute_drops_pending_and_new_cues() {
    let recorder = Recorder::default();
    let mut audio = manager_with(&recorder);

    assert!(!audio.is_muted());
    audio.play(Cue::GameOver, ms(0));
    assert!(audio.toggle_mute());
    assert!(audio.is_muted());
    assert_eq!(audio.queued(), 0);
    audio.play(Cue::Hit, ms(0));
    audio.pump(ms(5000));
    assert!(recorder.played.lock().unwrap().is_empty());

    assert!(!audio.toggle_mute());
    audio.play(Cue::Whiff, ms(5000));
    audio.pump(ms(5000));
    assert_eq!(*recorder.played.lock().unwrap(), vec![200]);
}

#[test]
fn bell_sink_rings() {
    let mut out = Vec::new();
    {
        let mut bell = BellSink::with_writer(&mut out);
        for tone in Cue::Hit.melody() {
            bell.play(tone).unwrap();
        }
    }
    assert_eq!(out, b"\x07\x07");
}
