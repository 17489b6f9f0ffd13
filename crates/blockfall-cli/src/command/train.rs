use std::path::PathBuf;

use anyhow::Result;
use blockfall_engine::PieceSeed;
use blockfall_training::{Trainer, TrainingConfig};
use chrono::Utc;
use clap::Args;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::{command::BoardArgs, model::TrainedModel};

#[derive(Debug, Clone, Args)]
pub(crate) struct TrainArgs {
    /// Individuals per generation
    #[arg(long, default_value_t = 960)]
    population: usize,
    /// Generations to run
    #[arg(long, default_value_t = 12)]
    epochs: usize,
    /// Games played per individual each generation
    #[arg(long, default_value_t = 48)]
    games: usize,
    /// Gravity-step budget per evaluation game
    #[arg(long, default_value_t = 1600)]
    tick_limit: u64,
    /// Fraction of each generation retained by fitness rank
    #[arg(long, default_value_t = 0.2)]
    survivors: f32,
    /// Slots refilled with fresh random genomes each generation
    #[arg(long, default_value_t = 480)]
    fresh: usize,
    /// Chance that a survivor or child picks up mutation noise
    #[arg(long, default_value_t = 0.05)]
    mutation_rate: f32,
    /// Width of the uniform mutation noise
    #[arg(long, default_value_t = 0.05)]
    mutation_span: f32,
    /// Evaluate with one-ply lookahead (much slower)
    #[arg(long)]
    lookahead: bool,
    /// Hex seed for the whole run; drawn fresh when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Name recorded in the saved model
    #[arg(long, default_value = "blockfall")]
    name: String,
    /// Output file for the trained model; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    board: BoardArgs,
}

pub(crate) fn run(args: &TrainArgs) -> Result<()> {
    let seed = args.seed.unwrap_or_else(PieceSeed::from_entropy);
    eprintln!("training seed: {seed}");

    let config = TrainingConfig {
        board: args.board.to_config()?,
        population: args.population,
        epochs: args.epochs,
        games_per_individual: args.games,
        tick_limit: args.tick_limit,
        survivor_fraction: args.survivors,
        fresh_count: args.fresh,
        mutation_rate: args.mutation_rate,
        mutation_span: args.mutation_span,
        lookahead: args.lookahead,
    };
    let trainer = Trainer::new(config);
    let mut rng = Pcg32::seed_from_u64(seed.0);
    let best = trainer.train(&mut rng, |summary| {
        eprintln!(
            "epoch {:>2}: fitness min {:7.3} mean {:7.3} max {:7.3} std {:6.3} | best ever {:7.3}",
            summary.epoch,
            summary.fitness.min,
            summary.fitness.mean,
            summary.fitness.max,
            summary.fitness.std_dev,
            summary.best_fitness,
        );
    });
    eprintln!("training complete, best fitness {:.3}", best.fitness());

    let model = TrainedModel {
        name: args.name.clone(),
        trained_at: Utc::now(),
        fitness: best.fitness(),
        weights: *best.weights(),
    };
    model.save(args.output.as_deref())?;
    if let Some(path) = &args.output {
        eprintln!("model saved to {}", path.display());
    }
    Ok(())
}
