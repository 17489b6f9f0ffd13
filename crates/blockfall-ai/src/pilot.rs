use blockfall_engine::{Game, GameStats};

use crate::{search, weights::FeatureWeights};

/// Plays a [`Game`] by itself.
///
/// For every fresh piece the pilot searches a placement, snaps the piece
/// there, and then lets gravity run. The placement is committed once per
/// piece; the search never revises a drop in flight.
#[derive(Debug, Clone)]
pub struct Pilot {
    weights: FeatureWeights,
    lookahead: bool,
    committed: bool,
}

impl Pilot {
    #[must_use]
    pub const fn new(weights: FeatureWeights) -> Self {
        Self {
            weights,
            lookahead: false,
            committed: false,
        }
    }

    /// Searches one ply deeper before committing each piece. Much slower.
    #[must_use]
    pub const fn with_lookahead(mut self, lookahead: bool) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Commits the falling piece to a placement if it has none yet, then
    /// ticks once.
    pub fn step(&mut self, game: &mut Game) {
        if !self.committed {
            let placement = if self.lookahead {
                search::select_move_with_lookahead(
                    game.board(),
                    game.piece().kind(),
                    game.next_kind(),
                    &self.weights,
                )
            } else {
                search::select_move(game.board(), game.piece().kind(), &self.weights)
            };
            if let Some(placement) = placement {
                game.apply_placement(placement.rotation, placement.col);
            }
            self.committed = true;
        }
        if game.tick().locked {
            self.committed = false;
        }
    }

    /// Plays until game over or `tick_limit` gravity steps, whichever comes
    /// first, and returns the final stats.
    pub fn play(&mut self, game: &mut Game, tick_limit: u64) -> GameStats {
        self.committed = false;
        while game.status().is_running() && game.stats().ticks() < tick_limit {
            self.step(game);
        }
        *game.stats()
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{BoardConfig, PieceSeed};

    use super::*;

    #[test]
    fn step_commits_the_searched_placement() {
        let mut game = Game::new(BoardConfig::STANDARD, PieceSeed(21));
        let expected =
            search::select_move(game.board(), game.piece().kind(), &FeatureWeights::TUNED)
                .unwrap();

        let mut pilot = Pilot::new(FeatureWeights::TUNED);
        pilot.step(&mut game);
        assert_eq!(game.piece().rotation(), expected.rotation);
        assert_eq!(game.piece().col(), expected.col);
        assert_eq!(game.stats().ticks(), 1);
    }

    #[test]
    fn budget_caps_the_run() {
        let mut game = Game::new(BoardConfig::STANDARD, PieceSeed(33));
        let mut pilot = Pilot::new(FeatureWeights::TUNED);
        let stats = pilot.play(&mut game, 64);
        assert_eq!(stats.ticks(), 64);
        assert!(game.status().is_running());
    }

    #[test]
    fn careless_weights_top_out() {
        // zero weights always take the first-scanned placement, piling
        // everything against the left wall
        let config = BoardConfig::new(8, 5, 2, 100).unwrap();
        let zero = FeatureWeights {
            holes: 0.0,
            jaggedness: 0.0,
            aggregate_height: 0.0,
            filled_rows: 0.0,
        };
        let mut game = Game::new(config, PieceSeed(2));
        let mut pilot = Pilot::new(zero);
        let stats = pilot.play(&mut game, 2_000);
        assert!(game.status().is_over());
        assert!(stats.ticks() < 2_000);
    }

    #[test]
    fn play_resets_commitment_between_games() {
        let mut pilot = Pilot::new(FeatureWeights::TUNED);
        let mut first = Game::new(BoardConfig::STANDARD, PieceSeed(9));
        pilot.play(&mut first, 200);

        // the budget cuts the first run mid-drop; a stale commitment would
        // skip the opening search of the next game
        let mut second = Game::new(BoardConfig::STANDARD, PieceSeed(9));
        pilot.play(&mut second, 200);
        assert_eq!(first.board().to_string(), second.board().to_string());
        assert_eq!(first.stats(), second.stats());
    }
}
