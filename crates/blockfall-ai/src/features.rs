use blockfall_engine::Board;

/// Raw board measurements feeding the placement evaluator.
///
/// All four are plain counts over the settled stack. A column's height runs
/// from the floor to its topmost occupied cell, so a single block on the
/// floor gives its column height 1 and empty rows above the stack change
/// nothing. Marked rows still count as occupied; they have not left the
/// board yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardFeatures {
    /// Free cells with an occupied cell somewhere above them in the same
    /// column.
    pub holes: u32,
    /// Summed absolute height difference between neighboring columns.
    pub jaggedness: u32,
    /// Summed column heights.
    pub aggregate_height: u32,
    /// Rows with no free cell, counted before they clear.
    pub filled_rows: u32,
}

impl BoardFeatures {
    /// Number of features, which is also the weight vector's width.
    pub const COUNT: usize = 4;

    /// Measures a board.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn extract(board: &Board) -> Self {
        let (rows, cols) = (board.rows(), board.cols());
        let mut features = Self::default();
        let mut prev_height = 0_u32;
        for col in 0..cols {
            let top = (0..rows).find(|&row| !board.cell(row, col).is_free());
            let height = top.map_or(0, |row| (rows - row) as u32);
            if let Some(top) = top {
                let holes = (top + 1..rows)
                    .filter(|&row| board.cell(row, col).is_free())
                    .count();
                features.holes += holes as u32;
            }
            features.aggregate_height += height;
            if col > 0 {
                features.jaggedness += height.abs_diff(prev_height);
            }
            prev_height = height;
        }
        features.filled_rows = (0..rows)
            .filter(|&row| (0..cols).all(|col| !board.cell(row, col).is_free()))
            .count() as u32;
        features
    }

    /// Feature values in weight order: holes, jaggedness, aggregate height,
    /// filled rows.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_array(self) -> [f32; Self::COUNT] {
        [
            self.holes as f32,
            self.jaggedness as f32,
            self.aggregate_height as f32,
            self.filled_rows as f32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{BoardConfig, MoveDirection, Piece, PieceKind};

    use super::*;

    fn features_of(config: BoardConfig, art: &str) -> BoardFeatures {
        BoardFeatures::extract(&Board::from_ascii(config, art))
    }

    fn small_config() -> BoardConfig {
        BoardConfig::new(6, 4, 1, 100).unwrap()
    }

    #[test]
    fn empty_board_measures_zero() {
        let features = BoardFeatures::extract(&Board::new(BoardConfig::STANDARD));
        assert_eq!(features, BoardFeatures::default());
    }

    #[test]
    fn floor_block_has_height_one() {
        let features = features_of(small_config(), "....\n....\n....\n....\n....\n#...");
        assert_eq!(
            features,
            BoardFeatures {
                holes: 0,
                jaggedness: 1,
                aggregate_height: 1,
                filled_rows: 0,
            }
        );
    }

    #[test]
    fn counts_follow_the_column_profile() {
        let features = features_of(small_config(), "....\n....\n....\n#...\n#.#.\n##.#");
        // heights 3, 1, 2, 1; one covered cell under column 2's top
        assert_eq!(
            features,
            BoardFeatures {
                holes: 1,
                jaggedness: 4,
                aggregate_height: 7,
                filled_rows: 0,
            }
        );
    }

    #[test]
    fn full_and_marked_rows_count_as_filled() {
        let features = features_of(small_config(), "....\n....\n....\n....\n****\n1234");
        assert_eq!(features.filled_rows, 2);
        assert_eq!(features.aggregate_height, 8);
        assert_eq!(features.holes, 0);
    }

    #[test]
    fn empty_rows_above_the_stack_are_invisible() {
        let stack = "#...\n#.#.\n##.#";
        let short = features_of(BoardConfig::new(5, 4, 1, 100).unwrap(), &format!("....\n....\n{stack}"));
        let tall = features_of(BoardConfig::new(8, 4, 1, 100).unwrap(), &format!("....\n....\n....\n....\n....\n{stack}"));
        assert_eq!(short, tall);
    }

    #[test]
    fn vertical_straight_piece_in_the_well() {
        let config = BoardConfig::STANDARD;
        let mut board = Board::new(config);
        let mut piece = Piece::spawn(PieceKind::I, &config)
            .with_rotation(1)
            .with_col(-2);
        while board.is_move_legal(&piece, MoveDirection::Down) {
            piece = piece.shifted(MoveDirection::Down);
        }
        board.place(&piece);

        assert!(board.cell(23, 0).is_filled());
        assert!(board.cell(19, 0).is_free());
        let features = BoardFeatures::extract(&board);
        assert_eq!(
            features,
            BoardFeatures {
                holes: 0,
                jaggedness: 4,
                aggregate_height: 4,
                filled_rows: 0,
            }
        );
    }
}
