use blockfall_engine::Board;
use serde::{Deserialize, Serialize};

use crate::features::BoardFeatures;

/// Linear weights over [`BoardFeatures`].
///
/// A placement's score is the dot product of these weights with the feature
/// vector of the board after the piece settles. Holes, jaggedness, and
/// height are conventionally negative (they describe damage), filled rows
/// positive (they are about to pay out).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights {
    pub holes: f32,
    pub jaggedness: f32,
    pub aggregate_height: f32,
    pub filled_rows: f32,
}

impl FeatureWeights {
    /// Weights from the stock training run on the standard board.
    pub const TUNED: Self = Self {
        holes: -0.969_941_1,
        jaggedness: -0.116_088_89,
        aggregate_height: -0.432_092_8,
        filled_rows: 0.951_499_8,
    };

    /// The conventional sign for each feature, in weight order. Fresh random
    /// genomes start on these sides of zero.
    pub const CONVENTIONAL_SIGNS: [f32; BoardFeatures::COUNT] = [-1.0, -1.0, -1.0, 1.0];

    /// Weight values in feature order: holes, jaggedness, aggregate height,
    /// filled rows.
    #[must_use]
    pub const fn as_array(self) -> [f32; BoardFeatures::COUNT] {
        [
            self.holes,
            self.jaggedness,
            self.aggregate_height,
            self.filled_rows,
        ]
    }

    #[must_use]
    pub const fn from_array(values: [f32; BoardFeatures::COUNT]) -> Self {
        let [holes, jaggedness, aggregate_height, filled_rows] = values;
        Self {
            holes,
            jaggedness,
            aggregate_height,
            filled_rows,
        }
    }

    /// Dot product with a measured feature vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blockfall_ai::{BoardFeatures, FeatureWeights};
    /// let weights = FeatureWeights::from_array([-1.0, 0.0, 0.0, 2.0]);
    /// let features = BoardFeatures {
    ///     holes: 3,
    ///     jaggedness: 7,
    ///     aggregate_height: 9,
    ///     filled_rows: 1,
    /// };
    /// assert_eq!(weights.score(features), -1.0);
    /// ```
    #[must_use]
    pub fn score(&self, features: BoardFeatures) -> f32 {
        self.as_array()
            .into_iter()
            .zip(features.as_array())
            .map(|(weight, value)| weight * value)
            .sum()
    }

    /// Scores a whole board position. A board whose stack reaches the hidden
    /// band scores negative infinity, so no survivable placement ever loses
    /// to a fatal one.
    #[must_use]
    pub fn evaluate(&self, board: &Board) -> f32 {
        if board.is_terminal() {
            return f32::NEG_INFINITY;
        }
        self.score(BoardFeatures::extract(board))
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::BoardConfig;

    use super::*;

    #[test]
    fn arrays_round_trip() {
        let weights = FeatureWeights::TUNED;
        assert_eq!(FeatureWeights::from_array(weights.as_array()), weights);
    }

    #[test]
    fn tuned_weights_follow_the_conventional_signs() {
        for (weight, sign) in FeatureWeights::TUNED
            .as_array()
            .into_iter()
            .zip(FeatureWeights::CONVENTIONAL_SIGNS)
        {
            assert_eq!(weight.signum(), sign);
        }
    }

    #[test]
    fn terminal_boards_score_negative_infinity() {
        let config = BoardConfig::new(6, 4, 2, 100).unwrap();
        let board = Board::from_ascii(config, "....\n1...\n....\n....\n....\n....");
        assert_eq!(
            FeatureWeights::TUNED.evaluate(&board),
            f32::NEG_INFINITY
        );

        let alive = Board::from_ascii(config, "....\n....\n1...\n....\n....\n....");
        assert!(FeatureWeights::TUNED.evaluate(&alive).is_finite());
    }

    #[test]
    fn weights_serialize_as_json() {
        let json = serde_json::to_string(&FeatureWeights::TUNED).unwrap();
        let back: FeatureWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FeatureWeights::TUNED);
    }
}
