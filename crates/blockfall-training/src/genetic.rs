//! Generational evolution of placement weights.
//!
//! The trainer searches the 4-dimensional weight space of
//! [`FeatureWeights`] with a plain genetic algorithm:
//!
//! 1. Start from random genomes, each coefficient uniform in `[0, 1)` and
//!    sign-flipped to its feature's conventional side of zero.
//! 2. Score every genome by playing seeded games and averaging cleared rows
//!    per game ([`FitnessEvaluator`]).
//! 3. Carry the top slice of the generation over by rank, along with the
//!    best genome seen in any generation.
//! 4. Breed children by fitness-weighted averaging of two roulette-picked
//!    parents, refill the rest with fresh random genomes, and mutate a
//!    small fraction of everything but the frozen best.
//!
//! Every random draw flows through the caller's RNG and game seeds are
//! drawn up front, so a seeded run reproduces its result exactly no matter
//! how the evaluation threads are scheduled.
//!
//! ```
//! use blockfall_engine::BoardConfig;
//! use blockfall_training::{Trainer, TrainingConfig};
//!
//! let config = TrainingConfig {
//!     board: BoardConfig::new(8, 5, 2, 100).unwrap(),
//!     population: 4,
//!     epochs: 2,
//!     games_per_individual: 1,
//!     tick_limit: 60,
//!     fresh_count: 1,
//!     ..TrainingConfig::default()
//! };
//! let best = Trainer::new(config).train(&mut rand::rng(), |_summary| {});
//! assert!(best.fitness() >= 0.0);
//! ```

use std::thread;

use blockfall_ai::{BoardFeatures, FeatureWeights};
use blockfall_engine::{BoardConfig, PieceSeed};
use rand::Rng;

use crate::{fitness::FitnessEvaluator, stats::DescriptiveStats};

/// One candidate genome with its evaluated fitness and its slot on the
/// roulette wheel.
#[derive(Debug, Clone)]
pub struct Individual {
    weights: FeatureWeights,
    fitness: f32,
    selection_prob: f32,
}

impl Individual {
    /// A fresh random genome.
    fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let values = std::array::from_fn(|feature| {
            FeatureWeights::CONVENTIONAL_SIGNS[feature] * rng.random::<f32>()
        });
        Self::from_weights(FeatureWeights::from_array(values))
    }

    const fn from_weights(weights: FeatureWeights) -> Self {
        Self {
            weights,
            fitness: 0.0,
            selection_prob: 0.0,
        }
    }

    #[must_use]
    pub const fn weights(&self) -> &FeatureWeights {
        &self.weights
    }

    /// Mean cleared rows per evaluation game, 0 before evaluation.
    #[must_use]
    pub const fn fitness(&self) -> f32 {
        self.fitness
    }
}

/// The current generation.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// A population of `count` fresh random genomes.
    #[must_use]
    pub fn random<R>(count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            individuals: (0..count).map(|_| Individual::random(rng)).collect(),
        }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Best individual by fitness, `None` for an empty population.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    /// Fitness distribution across the generation.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }

    /// Scores every individual by playing its games, fanning the work out
    /// over the available cores.
    ///
    /// The per-game seeds are drawn from `rng` before any thread starts, so
    /// a given seed sequence produces the same fitness values regardless of
    /// scheduling or worker count.
    pub fn evaluate<R>(
        &mut self,
        evaluator: &FitnessEvaluator,
        games_per_individual: usize,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        if self.individuals.is_empty() {
            return;
        }
        let seeds: Vec<Vec<PieceSeed>> = (0..self.individuals.len())
            .map(|_| (0..games_per_individual).map(|_| rng.random()).collect())
            .collect();
        let workers = thread::available_parallelism().map_or(1, |n| n.get());
        let chunk_len = self.individuals.len().div_ceil(workers);
        thread::scope(|scope| {
            for (individuals, seeds) in self
                .individuals
                .chunks_mut(chunk_len)
                .zip(seeds.chunks(chunk_len))
            {
                scope.spawn(move || {
                    for (individual, seeds) in individuals.iter_mut().zip(seeds) {
                        individual.fitness = evaluator.fitness(individual.weights, seeds);
                    }
                });
            }
        });
    }
}

/// Knobs for one training run. The defaults mirror the stock tuning run
/// behind [`FeatureWeights::TUNED`].
#[derive(Debug, Clone, Copy)]
pub struct TrainingConfig {
    /// Board the evaluation games run on.
    pub board: BoardConfig,
    /// Individuals per generation.
    pub population: usize,
    /// Generations to run.
    pub epochs: usize,
    /// Independent games behind each fitness estimate.
    pub games_per_individual: usize,
    /// Gravity-step budget per evaluation game.
    pub tick_limit: u64,
    /// Fraction of each generation retained by fitness rank.
    pub survivor_fraction: f32,
    /// Slots refilled with fresh random genomes each generation.
    pub fresh_count: usize,
    /// Chance that a survivor or child picks up mutation noise.
    pub mutation_rate: f32,
    /// Width of the uniform noise added to every coefficient on mutation.
    pub mutation_span: f32,
    /// Evaluate with one-ply lookahead. Much slower.
    pub lookahead: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::STANDARD,
            population: 960,
            epochs: 12,
            games_per_individual: 48,
            tick_limit: 1600,
            survivor_fraction: 0.2,
            fresh_count: 480,
            mutation_rate: 0.05,
            mutation_span: 0.05,
            lookahead: false,
        }
    }
}

/// Digest of one epoch for progress reporting.
#[derive(Debug, Clone, Copy)]
pub struct EpochSummary {
    pub epoch: usize,
    /// Fitness distribution of the evaluated generation.
    pub fitness: DescriptiveStats,
    /// Fitness of the best genome seen so far, this epoch included.
    pub best_fitness: f32,
}

/// Runs the whole loop: evaluate, select, breed, repeat.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
    evaluator: FitnessEvaluator,
}

impl Trainer {
    #[must_use]
    pub fn new(config: TrainingConfig) -> Self {
        let evaluator =
            FitnessEvaluator::new(config.board, config.tick_limit).with_lookahead(config.lookahead);
        Self { config, evaluator }
    }

    #[must_use]
    pub const fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Runs the configured number of epochs and returns the best individual
    /// seen in any generation. `on_epoch` fires once per epoch after
    /// evaluation.
    ///
    /// # Panics
    ///
    /// Panics when the configuration has a zero population, zero epochs, or
    /// more fresh genomes than population slots.
    pub fn train<R>(&self, rng: &mut R, mut on_epoch: impl FnMut(&EpochSummary)) -> Individual
    where
        R: Rng + ?Sized,
    {
        let config = &self.config;
        assert!(config.population > 0, "population must not be empty");
        assert!(config.epochs > 0, "need at least one epoch");
        assert!(
            config.fresh_count <= config.population,
            "fresh count exceeds the population"
        );

        let mut population = Population::random(config.population, rng);
        let mut best: Option<Individual> = None;
        for epoch in 0..config.epochs {
            population.evaluate(&self.evaluator, config.games_per_individual, rng);
            for individual in population.individuals() {
                if best
                    .as_ref()
                    .is_none_or(|b| individual.fitness > b.fitness)
                {
                    best = Some(individual.clone());
                }
            }
            let best_so_far = best.as_ref().expect("population is not empty");
            let fitness = population.fitness_stats().expect("population is not empty");
            on_epoch(&EpochSummary {
                epoch,
                fitness,
                best_fitness: best_so_far.fitness,
            });
            if epoch + 1 < config.epochs {
                population = self.next_generation(&population, best_so_far, rng);
            }
        }
        best.expect("at least one epoch ran")
    }

    /// Builds the next generation from an evaluated one.
    ///
    /// The wheel is the current generation in ascending fitness order with
    /// the reigning best appended on the top slot. Rank survivors come off
    /// the top, crossover children fill the middle, and fresh random
    /// genomes take the remaining slots.
    fn next_generation<R>(
        &self,
        current: &Population,
        best: &Individual,
        rng: &mut R,
    ) -> Population
    where
        R: Rng + ?Sized,
    {
        let config = &self.config;
        let mut pool = current.individuals.clone();
        pool.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        assign_selection_probs(&mut pool);
        let mut elite = best.clone();
        elite.selection_prob = 1.0;
        pool.push(elite);

        #[expect(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let survivor_count = (config.population as f32 * config.survivor_fraction) as usize;
        let mut next: Vec<Individual> = pool
            .iter()
            .rev()
            .take((survivor_count + 1).min(config.population))
            .cloned()
            .collect();
        // the appended best comes off first and rides along unmutated
        for individual in next.iter_mut().skip(1) {
            self.maybe_mutate(individual, rng);
        }

        let crossover_target = config.population.saturating_sub(config.fresh_count);
        while next.len() < crossover_target {
            let father = roulette_pick(&pool, rng);
            let mother = roulette_pick(&pool, rng);
            let mut child = Individual::from_weights(crossover(father, mother));
            self.maybe_mutate(&mut child, rng);
            next.push(child);
        }
        while next.len() < config.population {
            next.push(Individual::random(rng));
        }
        Population { individuals: next }
    }

    fn maybe_mutate<R>(&self, individual: &mut Individual, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if rng.random::<f32>() < self.config.mutation_rate {
            mutate(&mut individual.weights, self.config.mutation_span, rng);
        }
    }
}

/// Assigns cumulative fitness-proportionate wheel slots in ascending
/// fitness order. A generation with no fitness at all falls back to uniform
/// slots.
#[expect(clippy::cast_precision_loss)]
fn assign_selection_probs(pool: &mut [Individual]) {
    let total: f32 = pool.iter().map(|ind| ind.fitness).sum();
    let count = pool.len() as f32;
    let mut cumulative = 0.0;
    for individual in pool.iter_mut() {
        let share = if total > 0.0 {
            individual.fitness / total
        } else {
            1.0 / count
        };
        cumulative += share;
        individual.selection_prob = cumulative;
    }
}

/// First individual whose cumulative slot covers the draw. The last slot
/// absorbs any float shortfall at the top of the wheel.
fn roulette_index(pool: &[Individual], draw: f32) -> usize {
    let index = pool.partition_point(|ind| ind.selection_prob < draw);
    index.min(pool.len().saturating_sub(1))
}

fn roulette_pick<'a, R>(pool: &'a [Individual], rng: &mut R) -> &'a Individual
where
    R: Rng + ?Sized,
{
    debug_assert!(!pool.is_empty());
    &pool[roulette_index(pool, rng.random())]
}

/// Blends two parents proportionally to their fitness, or takes the plain
/// midpoint when neither has any.
fn crossover(a: &Individual, b: &Individual) -> FeatureWeights {
    let wa = a.weights.as_array();
    let wb = b.weights.as_array();
    let total = a.fitness + b.fitness;
    let blended: [f32; BoardFeatures::COUNT] = std::array::from_fn(|feature| {
        if total > 0.0 {
            (wa[feature] * a.fitness + wb[feature] * b.fitness) / total
        } else {
            f32::midpoint(wa[feature], wb[feature])
        }
    });
    FeatureWeights::from_array(blended)
}

/// Adds independent uniform noise in `[-span / 2, span / 2]` to every
/// coefficient.
fn mutate<R>(weights: &mut FeatureWeights, span: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let half = span / 2.0;
    let noisy = weights
        .as_array()
        .map(|weight| weight + rng.random_range(-half..=half));
    *weights = FeatureWeights::from_array(noisy);
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn individual(fitness: f32, weight: f32) -> Individual {
        Individual {
            weights: FeatureWeights::from_array([weight; BoardFeatures::COUNT]),
            fitness,
            selection_prob: 0.0,
        }
    }

    fn tiny_config() -> TrainingConfig {
        TrainingConfig {
            board: BoardConfig::new(8, 5, 2, 100).unwrap(),
            population: 8,
            epochs: 3,
            games_per_individual: 2,
            tick_limit: 120,
            survivor_fraction: 0.25,
            fresh_count: 3,
            mutation_rate: 0.3,
            mutation_span: 0.06,
            lookahead: false,
        }
    }

    #[test]
    fn random_genomes_start_on_the_conventional_sides() {
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..50 {
            let genome = Individual::random(&mut rng);
            let [holes, jaggedness, height, filled] = genome.weights.as_array();
            assert!(holes <= 0.0);
            assert!(jaggedness <= 0.0);
            assert!(height <= 0.0);
            assert!(filled >= 0.0);
        }
    }

    #[test]
    fn selection_probs_accumulate_fitness_shares() {
        let mut pool = vec![individual(1.0, 0.0), individual(3.0, 0.0)];
        assign_selection_probs(&mut pool);
        assert_eq!(pool[0].selection_prob, 0.25);
        assert_eq!(pool[1].selection_prob, 1.0);
    }

    #[test]
    fn zero_fitness_pool_gets_uniform_slots() {
        let mut pool = vec![individual(0.0, 0.0), individual(0.0, 0.0)];
        assign_selection_probs(&mut pool);
        assert_eq!(pool[0].selection_prob, 0.5);
        assert_eq!(pool[1].selection_prob, 1.0);
    }

    #[test]
    fn roulette_lands_in_the_matching_slot() {
        let mut pool = vec![individual(1.0, 0.0), individual(3.0, 0.0)];
        assign_selection_probs(&mut pool);
        assert_eq!(roulette_index(&pool, 0.0), 0);
        assert_eq!(roulette_index(&pool, 0.25), 0);
        assert_eq!(roulette_index(&pool, 0.26), 1);
        assert_eq!(roulette_index(&pool, 1.0), 1);
    }

    #[test]
    fn crossover_blends_by_fitness() {
        let a = individual(1.0, 0.0);
        let b = individual(3.0, 1.0);
        let child = crossover(&a, &b);
        assert_eq!(child.as_array(), [0.75; BoardFeatures::COUNT]);

        let child = crossover(&individual(0.0, 0.0), &individual(0.0, 1.0));
        assert_eq!(child.as_array(), [0.5; BoardFeatures::COUNT]);
    }

    #[test]
    fn mutation_noise_stays_inside_the_span() {
        let mut rng = Pcg32::seed_from_u64(17);
        for _ in 0..50 {
            let mut weights = FeatureWeights::from_array([0.0; BoardFeatures::COUNT]);
            mutate(&mut weights, 0.05, &mut rng);
            for value in weights.as_array() {
                assert!(value.abs() <= 0.025, "noise {value} exceeds the span");
            }
        }
    }

    #[test]
    fn next_generation_keeps_size_and_the_best_genome() {
        let config = TrainingConfig {
            population: 6,
            survivor_fraction: 0.5,
            fresh_count: 2,
            mutation_rate: 0.0,
            ..tiny_config()
        };
        let trainer = Trainer::new(config);
        let current = Population {
            individuals: (0..6).map(|i| individual(i as f32, i as f32)).collect(),
        };
        let best = current.best().unwrap().clone();

        let mut rng = Pcg32::seed_from_u64(3);
        let next = trainer.next_generation(&current, &best, &mut rng);
        assert_eq!(next.individuals().len(), 6);
        assert!(
            next.individuals()
                .iter()
                .any(|ind| ind.weights == best.weights)
        );
    }

    #[test]
    fn seeded_training_runs_reproduce() {
        let trainer = Trainer::new(tiny_config());
        let run = |seed: u64| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut curve = Vec::new();
            let best = trainer.train(&mut rng, |summary| {
                curve.push((summary.epoch, summary.best_fitness));
            });
            (best.weights().as_array(), best.fitness(), curve)
        };
        let first = run(99);
        let second = run(99);
        assert_eq!(first, second);
        assert_ne!(first, run(100));
    }

    #[test]
    fn best_fitness_never_regresses() {
        let trainer = Trainer::new(tiny_config());
        let mut rng = Pcg32::seed_from_u64(12);
        let mut previous = f32::NEG_INFINITY;
        let best = trainer.train(&mut rng, |summary| {
            assert!(summary.best_fitness >= previous);
            assert!(summary.best_fitness >= summary.fitness.max);
            previous = summary.best_fitness;
        });
        assert_eq!(best.fitness(), previous);
    }

    #[test]
    #[should_panic(expected = "population must not be empty")]
    fn rejects_an_empty_population() {
        let config = TrainingConfig {
            population: 0,
            ..tiny_config()
        };
        let _ = Trainer::new(config).train(&mut Pcg32::seed_from_u64(0), |_| {});
    }
}
