use clap::Parser;
use std::path::PathBuf;

use crate::games::whack::game::Mode;

#[derive(Parser, Debug)]
#[command(name = "whackterm")]
#[command(about = "🔨 Whack-a-mole in your terminal")]
#[command(version)]
pub struct Cli {
    /// Skip the home screen and start a round in this mode
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// JSON file overriding the default rules and level table
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible target placement
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Start with sound turned off
    #[arg(long)]
    pub mute: bool,

    /// Where to write logs (the terminal is busy drawing the game)
    #[arg(long, default_value = "whackterm.log")]
    pub log_file: PathBuf,

    /// Print the last round's summary as JSON on exit
    #[arg(long)]
    pub summary_json: bool,
}
