use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, decide::DecideArg, default_config::DefaultConfigArg};

mod auto_play;
mod decide;
mod default_config;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play headless games and report the scores
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Decide a single move for a board read in text form
    Decide(#[clap(flatten)] DecideArg),
    /// Print the default engine configuration as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Decide(arg) => decide::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}
