use anyhow::Result;
use blockfall_engine::BoardConfig;
use clap::{Args, Parser, Subcommand};

use self::{simulate::SimulateArgs, train::TrainArgs};

mod simulate;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve placement weights with the genetic trainer
    Train(#[clap(flatten)] TrainArgs),
    /// Watch trained weights play headless games
    Simulate(#[clap(flatten)] SimulateArgs),
}

pub fn run() -> Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or_default() {
        Mode::Train(args) => train::run(&args)?,
        Mode::Simulate(args) => simulate::run(&args)?,
    }
    Ok(())
}

impl Default for Mode {
    fn default() -> Self {
        Self::Simulate(SimulateArgs::default())
    }
}

/// Board geometry flags shared by both commands.
#[derive(Debug, Clone, Copy, Args)]
pub(crate) struct BoardArgs {
    /// Total board rows, hidden band included
    #[arg(long, default_value_t = 24)]
    rows: usize,
    /// Board columns
    #[arg(long, default_value_t = 10)]
    cols: usize,
    /// Hidden top rows that end the game when reached
    #[arg(long, default_value_t = 4)]
    hidden: usize,
    /// Points per cleared row
    #[arg(long, default_value_t = 100)]
    bonus: u32,
}

impl Default for BoardArgs {
    fn default() -> Self {
        Self {
            rows: 24,
            cols: 10,
            hidden: 4,
            bonus: 100,
        }
    }
}

impl BoardArgs {
    pub(crate) fn to_config(self) -> Result<BoardConfig> {
        Ok(BoardConfig::new(self.rows, self.cols, self.hidden, self.bonus)?)
    }
}
