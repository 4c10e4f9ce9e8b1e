use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use whackterm::cli::Cli;
use whackterm::config::GameConfig;
use whackterm::core::audio::{BellSink, SoundManager, ToneSink};
use whackterm::core::menu::{HomeMenu, MenuResult};
use whackterm::games::whack::{self, RoundSummary, WhackGame};
use whackterm::logging;
use whackterm::Game;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_file)?;

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut audio = SoundManager::new();
    audio.init(|| Ok(Box::new(BellSink::open()?) as Box<dyn ToneSink + Send>));
    if cli.mute && !audio.is_muted() {
        audio.toggle_mute();
    }

    let mut terminal = ratatui::init();
    let result = play(&mut terminal, &config, &mut rng, &mut audio, &cli).await;
    ratatui::restore();

    let last = result?;
    if let Some(summary) = last {
        if cli.summary_json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "🔨 {} round: scored {} and reached level {}",
                summary.mode.label(),
                summary.score,
                summary.level
            );
        }
    }
    Ok(())
}

/// Home screen / round loop. Returns the last finished round, if any.
async fn play(
    terminal: &mut ratatui::DefaultTerminal,
    config: &GameConfig,
    rng: &mut StdRng,
    audio: &mut SoundManager,
    cli: &Cli,
) -> Result<Option<RoundSummary>> {
    let mut last_summary = None;
    let mut next = cli.mode.map(MenuResult::Start);

    loop {
        let choice = match next.take() {
            Some(choice) => choice,
            None => {
                let mut menu = match &last_summary {
                    Some(RoundSummary { mode, .. }) => HomeMenu::with_selected(*mode),
                    None => HomeMenu::new(),
                };
                menu.run(terminal)?
            }
        };

        let mode = match choice {
            MenuResult::Start(mode) => mode,
            MenuResult::Quit => break,
        };

        let game = WhackGame::new(config.clone(), StdRng::from_rng(rng))?;
        let game = whack::run_game(game, mode, audio, terminal).await?;
        if let Some(summary) = game.summary() {
            last_summary = Some(summary.clone());
        }
        // Esc inside a round quits outright; heading home returns to the menu
        if !game.wants_exit() {
            break;
        }
    }

    info!("goodbye");
    Ok(last_summary)
}
