use std::{fmt, ops::Range};

use super::{
    config::BoardConfig,
    piece::{MoveDirection, Piece, PieceKind, Spin},
};

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Nothing here.
    #[default]
    Free,
    /// Part of a completed row queued for removal by the staged clear.
    Marked,
    /// Settled block from a piece of the given kind.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }

    /// Whether this cell obstructs movement and rotation. Marked cells do
    /// not: a row on its way out never blocks play.
    #[must_use]
    pub const fn is_filled(self) -> bool {
        matches!(self, Self::Filled(_))
    }

    /// Character used by [`Board`]'s `Display` output.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Free => '.',
            Self::Marked => '*',
            Self::Filled(kind) => char::from(b'0' + kind.digit()),
        }
    }

    /// Parses the `Display` alphabet back; `#` reads as a generic filled
    /// cell.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Self::Free),
            '*' => Some(Self::Marked),
            '#' => Some(Self::Filled(PieceKind::I)),
            _ => {
                let digit = u8::try_from(c.to_digit(10)?).ok()?;
                PieceKind::from_digit(digit).map(Self::Filled)
            }
        }
    }
}

/// The playfield: a `rows x cols` grid of [`Cell`]s plus its configuration.
///
/// Rows are numbered from the top, columns from the left. The top
/// [`BoardConfig::hidden_rows`] rows form the game-over band; they behave
/// like ordinary rows for movement and clearing, but any settled block inside
/// them makes the board [terminal](Self::is_terminal).
///
/// Boards clone cheaply, which the move search leans on: every candidate
/// placement is tried on a throwaway copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    config: BoardConfig,
    cells: Vec<Cell>,
}

impl Board {
    /// An empty board for the given configuration.
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            cells: vec![Cell::Free; config.rows() * config.cols()],
        }
    }

    /// Builds a board from the `Display` alphabet, one whitespace-separated
    /// token per row. Intended for tests and fixtures.
    ///
    /// # Panics
    ///
    /// Panics when the art does not match the configured dimensions or holds
    /// an unknown character.
    #[must_use]
    pub fn from_ascii(config: BoardConfig, art: &str) -> Self {
        let mut board = Self::new(config);
        let mut filled_rows = 0;
        for (row, line) in art.split_whitespace().enumerate() {
            assert!(row < config.rows(), "more rows than the configuration has");
            assert_eq!(line.len(), config.cols(), "bad width in row {row}");
            for (col, c) in line.chars().enumerate() {
                let cell = Cell::from_char(c)
                    .unwrap_or_else(|| panic!("unknown cell character {c:?}"));
                board.cells[row * config.cols() + col] = cell;
            }
            filled_rows = row + 1;
        }
        assert_eq!(filled_rows, config.rows(), "expected {} rows", config.rows());
        board
    }

    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.config.rows()
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.config.cols()
    }

    /// Cell at a grid position.
    ///
    /// # Panics
    ///
    /// Panics when the position is outside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.rows() && col < self.cols(), "cell out of bounds");
        self.cells[row * self.cols() + col]
    }

    fn cell_at(&self, row: i32, col: i32) -> Option<Cell> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.rows() && col < self.cols()).then(|| self.cells[row * self.cols() + col])
    }

    fn cell_mut_at(&mut self, row: i32, col: i32) -> Option<&mut Cell> {
        let (rows, cols) = (self.rows(), self.cols());
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < rows && col < cols).then(move || &mut self.cells[row * cols + col])
    }

    /// A position blocks when it lies outside the grid or holds a settled
    /// block.
    fn is_position_blocked(&self, row: i32, col: i32) -> bool {
        self.cell_at(row, col).is_none_or(Cell::is_filled)
    }

    /// Whether the piece can translate one cell in `direction`.
    #[must_use]
    pub fn is_move_legal(&self, piece: &Piece, direction: MoveDirection) -> bool {
        let (dr, dc) = direction.delta();
        piece
            .cells()
            .into_iter()
            .all(|(row, col)| !self.is_position_blocked(row + dr, col + dc))
    }

    /// Whether the piece can turn in place: the rotated copy must satisfy
    /// the same bounds and occupancy rule as a move.
    #[must_use]
    pub fn is_rotation_legal(&self, piece: &Piece, spin: Spin) -> bool {
        piece
            .rotated(spin)
            .cells()
            .into_iter()
            .all(|(row, col)| !self.is_position_blocked(row, col))
    }

    /// Writes the piece's cells into the grid. Cells outside the grid are
    /// dropped silently; the rest land regardless of what they overwrite.
    pub fn place(&mut self, piece: &Piece) {
        for (row, col) in piece.cells() {
            if let Some(cell) = self.cell_mut_at(row, col) {
                *cell = Cell::Filled(piece.kind());
            }
        }
    }

    const fn row_range(&self, row: usize) -> Range<usize> {
        row * self.cols()..(row + 1) * self.cols()
    }

    fn is_row_full(&self, row: usize) -> bool {
        let range = self.row_range(row);
        self.cells[range].iter().all(|cell| !cell.is_free())
    }

    fn is_row_marked(&self, row: usize) -> bool {
        let range = self.row_range(row);
        self.cells[range].iter().all(|&cell| cell == Cell::Marked)
    }

    /// First phase of the staged clear: overwrites every completed row with
    /// [`Cell::Marked`]. Returns how many rows were newly marked.
    pub fn mark_full_rows(&mut self) -> usize {
        let mut marked = 0;
        for row in 0..self.rows() {
            if self.is_row_full(row) && !self.is_row_marked(row) {
                let range = self.row_range(row);
                self.cells[range].fill(Cell::Marked);
                marked += 1;
            }
        }
        marked
    }

    /// Second phase of the staged clear: removes the bottom-most marked row,
    /// shifting everything above it down by one, and pays the per-row bonus.
    ///
    /// One row per call. A multi-row clear spreads its payout over
    /// consecutive calls, which is what gives cleared rows their brief
    /// on-screen lifetime. Returns 0 when nothing is marked.
    pub fn collapse_marked_rows(&mut self) -> u32 {
        let Some(target) = (0..self.rows()).rev().find(|&row| self.is_row_marked(row)) else {
            return 0;
        };
        let cols = self.cols();
        self.cells.copy_within(0..target * cols, cols);
        self.cells[..cols].fill(Cell::Free);
        self.config.row_bonus()
    }

    /// The per-tick staged clear: collapses if a marked row is pending,
    /// otherwise marks newly completed rows. Detection and removal stay one
    /// call apart, so a freshly completed row only gets marked now and pays
    /// on the next call.
    pub fn clear_filled_rows(&mut self) -> u32 {
        let points = self.collapse_marked_rows();
        if points == 0 {
            self.mark_full_rows();
        }
        points
    }

    /// Immediate clear for speculative boards: removes every completed row
    /// in one pass, marked rows included, and returns how many went.
    pub fn clear_full_rows_now(&mut self) -> usize {
        let cols = self.cols();
        let mut cleared = 0;
        for row in (0..self.rows()).rev() {
            if self.is_row_full(row) {
                cleared += 1;
                continue;
            }
            if cleared > 0 {
                let range = self.row_range(row);
                self.cells.copy_within(range, (row + cleared) * cols);
            }
        }
        self.cells[..cleared * cols].fill(Cell::Free);
        cleared
    }

    /// Whether the stack has reached the hidden band.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.cells[..self.config.hidden_rows() * self.cols()]
            .iter()
            .any(|cell| cell.is_filled())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                write!(f, "{}", self.cell(row, col).as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
