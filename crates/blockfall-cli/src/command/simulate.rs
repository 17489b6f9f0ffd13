use std::path::PathBuf;

use anyhow::Result;
use blockfall_ai::{FeatureWeights, Pilot};
use blockfall_engine::{Game, PieceSeed};
use clap::Args;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{command::BoardArgs, model::TrainedModel};

#[derive(Debug, Clone, Args)]
pub(crate) struct SimulateArgs {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Gravity-step budget per game
    #[arg(long, default_value_t = 100_000)]
    tick_limit: u64,
    /// Search with one-ply lookahead (much slower)
    #[arg(long)]
    lookahead: bool,
    /// Hex seed for the run; drawn fresh when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Trained model to play with; stock weights when omitted
    #[arg(long)]
    model: Option<PathBuf>,
    /// Print every final board
    #[arg(long)]
    show_board: bool,
    #[command(flatten)]
    board: BoardArgs,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            games: 10,
            tick_limit: 100_000,
            lookahead: false,
            seed: None,
            model: None,
            show_board: false,
            board: BoardArgs::default(),
        }
    }
}

pub(crate) fn run(args: &SimulateArgs) -> Result<()> {
    let config = args.board.to_config()?;
    let weights = match &args.model {
        Some(path) => {
            let model = TrainedModel::load(path)?;
            eprintln!("loaded model {:?} (fitness {:.3})", model.name, model.fitness);
            model.weights
        }
        None => FeatureWeights::TUNED,
    };
    let seed = args.seed.unwrap_or_else(PieceSeed::from_entropy);
    eprintln!("simulation seed: {seed}");
    let mut rng = Pcg32::seed_from_u64(seed.0);

    let mut total_score = 0_u64;
    for index in 0..args.games {
        let mut game = Game::new(config, rng.random());
        let mut pilot = Pilot::new(weights).with_lookahead(args.lookahead);
        let stats = pilot.play(&mut game, args.tick_limit);
        println!(
            "game {index:>3}: score {:>8} rows {:>6} pieces {:>6} ticks {:>8}{}",
            stats.score(),
            stats.rows_cleared(),
            stats.pieces_locked(),
            stats.ticks(),
            if game.status().is_over() {
                ""
            } else {
                " (budget reached)"
            },
        );
        if args.show_board {
            print!("{}", game.board());
        }
        total_score += u64::from(stats.score());
    }
    if args.games > 0 {
        #[expect(clippy::cast_precision_loss)]
        let mean = total_score as f64 / args.games as f64;
        println!("mean score {mean:.1} over {} games", args.games);
    }
    Ok(())
}
