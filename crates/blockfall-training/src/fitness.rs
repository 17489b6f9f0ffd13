use blockfall_ai::{FeatureWeights, Pilot};
use blockfall_engine::{BoardConfig, Game, PieceSeed};

/// Plays seeded games with a genome and turns the scores into a fitness
/// value.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator {
    board: BoardConfig,
    tick_limit: u64,
    lookahead: bool,
}

impl FitnessEvaluator {
    #[must_use]
    pub const fn new(board: BoardConfig, tick_limit: u64) -> Self {
        Self {
            board,
            tick_limit,
            lookahead: false,
        }
    }

    /// Evaluation games search with one-ply lookahead. Much slower.
    #[must_use]
    pub const fn with_lookahead(mut self, lookahead: bool) -> Self {
        self.lookahead = lookahead;
        self
    }

    fn play_game(self, weights: FeatureWeights, seed: PieceSeed) -> u32 {
        let mut game = Game::new(self.board, seed);
        let mut pilot = Pilot::new(weights).with_lookahead(self.lookahead);
        pilot.play(&mut game, self.tick_limit).score()
    }

    /// Mean score across one game per seed, normalized by the per-row bonus
    /// so fitness counts cleared rows rather than raw points.
    ///
    /// A game cut off by the tick budget keeps whatever it scored; surviving
    /// without clearing anything is worth zero.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fitness(&self, weights: FeatureWeights, seeds: &[PieceSeed]) -> f32 {
        if seeds.is_empty() {
            return 0.0;
        }
        let total: u64 = seeds
            .iter()
            .map(|&seed| u64::from(self.play_game(weights, seed)))
            .sum();
        total as f32 / self.board.row_bonus().max(1) as f32 / seeds.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitness_is_deterministic_in_the_seeds() {
        let evaluator = FitnessEvaluator::new(BoardConfig::new(10, 6, 2, 100).unwrap(), 400);
        let seeds = [PieceSeed(1), PieceSeed(2), PieceSeed(3)];
        let first = evaluator.fitness(FeatureWeights::TUNED, &seeds);
        let second = evaluator.fitness(FeatureWeights::TUNED, &seeds);
        assert_eq!(first, second);
        assert!(first >= 0.0);
    }

    #[test]
    fn no_seeds_no_fitness() {
        let evaluator = FitnessEvaluator::new(BoardConfig::STANDARD, 100);
        assert_eq!(evaluator.fitness(FeatureWeights::TUNED, &[]), 0.0);
    }
}
