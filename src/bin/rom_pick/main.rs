mod config;
mod logger;
mod pick;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::pick::RomPick;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Pick the best matching ROM file for each title in a game list"
)]
pub struct Args {
    /// Text file with one wanted game title per line
    #[arg(value_hint = clap::ValueHint::FilePath)]
    game_list: Option<PathBuf>,

    /// Source directory with candidate files
    #[arg(short = 's', long, value_hint = clap::ValueHint::DirPath)]
    source: Option<PathBuf>,

    /// Destination directory for copied files
    #[arg(short = 'd', long, value_hint = clap::ValueHint::DirPath)]
    dest: Option<PathBuf>,

    /// Similarity threshold for the primary pass
    #[arg(short = 't', long, name = "THRESHOLD")]
    threshold: Option<f64>,

    /// Lower similarity threshold for the secondary pass
    #[arg(short = 'u', long, name = "SECONDARY")]
    secondary: Option<f64>,

    /// Additional stop word to ignore when comparing names
    #[arg(short = 'w', long = "stop-word", num_args = 1, action = clap::ArgAction::Append, name = "WORD")]
    stop_words: Vec<String>,

    /// Run the secondary pass without asking
    #[arg(short = 'y', long, conflicts_with = "no_rescan")]
    yes: bool,

    /// Never run the secondary pass
    #[arg(short = 'n', long)]
    no_rescan: bool,

    /// Only print matches without copying files
    #[arg(short = 'p', long)]
    print: bool,

    /// Do not write a log file
    #[arg(short = 'q', long)]
    no_log: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        rom_picker::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        RomPick::new(args)?.run()
    }
}
