use derive_more::{Display, Error};

/// Upper bound on `rows * cols`. Keeps per-candidate board clones cheap and
/// every cell coordinate comfortably inside `i32`.
const MAX_CELLS: usize = 4096;

/// Why a [`BoardConfig`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardConfigError {
    #[display("board must be at least 4 columns wide")]
    TooNarrow,
    #[display("board must be at least 4 rows tall")]
    TooShort,
    #[display("hidden band must leave at least one visible row")]
    HiddenBandTooTall,
    #[display("board must not exceed 4096 cells")]
    TooLarge,
}

/// Board geometry and scoring constants.
///
/// Everything that varies between boards lives here: the grid dimensions, the
/// height of the hidden band at the top, and the bonus paid per cleared row.
/// The config is validated once at construction and then threaded through the
/// engine by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    rows: usize,
    cols: usize,
    hidden_rows: usize,
    row_bonus: u32,
}

impl BoardConfig {
    /// The stock configuration: 24 rows by 10 columns with a 4-row hidden
    /// band and 100 points per cleared row.
    pub const STANDARD: Self = Self {
        rows: 24,
        cols: 10,
        hidden_rows: 4,
        row_bonus: 100,
    };

    /// Validates and builds a configuration.
    ///
    /// The board must be at least 4x4 so every piece fits, the hidden band
    /// must leave at least one visible row, and the total cell count must
    /// stay small enough for the move search to clone boards freely.
    pub fn new(
        rows: usize,
        cols: usize,
        hidden_rows: usize,
        row_bonus: u32,
    ) -> Result<Self, BoardConfigError> {
        if cols < 4 {
            return Err(BoardConfigError::TooNarrow);
        }
        if rows < 4 {
            return Err(BoardConfigError::TooShort);
        }
        if hidden_rows >= rows {
            return Err(BoardConfigError::HiddenBandTooTall);
        }
        if rows.saturating_mul(cols) > MAX_CELLS {
            return Err(BoardConfigError::TooLarge);
        }
        Ok(Self {
            rows,
            cols,
            hidden_rows,
            row_bonus,
        })
    }

    /// Total rows, hidden band included.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Rows at the top that end the game when a settled block reaches them.
    #[must_use]
    pub const fn hidden_rows(&self) -> usize {
        self.hidden_rows
    }

    /// Points paid for each cleared row.
    #[must_use]
    pub const fn row_bonus(&self) -> u32 {
        self.row_bonus
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}
