use derive_more::IsVariant;

use crate::{
    Board, BoardConfig, GameStats, MoveDirection, Piece, PieceKind, PieceQueue, PieceSeed, Spin,
};

/// Whether a game is still accepting ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum GameStatus {
    Running,
    Over,
}

/// What one [`Game::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// The falling piece could not descend and settled into the board.
    pub locked: bool,
    /// Points credited by the staged row clear this tick.
    pub points: u32,
}

/// One headless game: a board, the falling piece, a seeded queue, and
/// counters.
///
/// The game makes no move decisions of its own. Callers steer the falling
/// piece between ticks, either cell by cell with [`Self::try_move`] and
/// [`Self::try_rotate`] or all at once with [`Self::apply_placement`], and
/// [`Self::tick`] advances time.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    piece: Piece,
    next_kind: PieceKind,
    queue: PieceQueue,
    stats: GameStats,
    status: GameStatus,
}

impl Game {
    #[must_use]
    pub fn new(config: BoardConfig, seed: PieceSeed) -> Self {
        let mut queue = PieceQueue::new(seed);
        let piece = Piece::spawn(queue.deal(), &config);
        let next_kind = queue.deal();
        Self {
            board: Board::new(config),
            piece,
            next_kind,
            queue,
            stats: GameStats::new(),
            status: GameStatus::Running,
        }
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The piece currently falling.
    #[must_use]
    pub const fn piece(&self) -> &Piece {
        &self.piece
    }

    /// The kind that spawns once the current piece locks.
    #[must_use]
    pub const fn next_kind(&self) -> PieceKind {
        self.next_kind
    }

    #[must_use]
    pub const fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Advances the game one gravity step.
    ///
    /// The falling piece descends one row, or locks where it rests and the
    /// next piece spawns. Afterwards the staged row clear runs one step and
    /// the hidden band is checked for game over. Ticking a finished game
    /// does nothing.
    pub fn tick(&mut self) -> TickReport {
        if self.status.is_over() {
            return TickReport::default();
        }
        self.stats.record_tick();
        let mut report = TickReport::default();
        if self.board.is_move_legal(&self.piece, MoveDirection::Down) {
            self.piece = self.piece.shifted(MoveDirection::Down);
        } else {
            self.lock_piece();
            report.locked = true;
        }
        report.points = self.board.clear_filled_rows();
        self.stats.record_clear_points(report.points);
        if self.board.is_terminal() {
            self.status = GameStatus::Over;
        }
        report
    }

    fn lock_piece(&mut self) {
        self.board.place(&self.piece);
        self.stats.record_lock();
        self.piece = Piece::spawn(self.next_kind, self.board.config());
        self.next_kind = self.queue.deal();
    }

    /// Moves the falling piece one cell if the board allows it. Returns
    /// whether the piece moved.
    pub fn try_move(&mut self, direction: MoveDirection) -> bool {
        if self.status.is_over() || !self.board.is_move_legal(&self.piece, direction) {
            return false;
        }
        self.piece = self.piece.shifted(direction);
        true
    }

    /// Turns the falling piece in place if the board allows it. Returns
    /// whether the piece turned.
    pub fn try_rotate(&mut self, spin: Spin) -> bool {
        if self.status.is_over() || !self.board.is_rotation_legal(&self.piece, spin) {
            return false;
        }
        self.piece = self.piece.rotated(spin);
        true
    }

    /// Snaps the falling piece to a searched placement: sets its rotation
    /// state and anchor column directly, leaving the descent to gravity.
    ///
    /// # Panics
    ///
    /// Panics when `rotation` is not a valid state for the current kind.
    pub fn apply_placement(&mut self, rotation: u8, col: i32) {
        self.piece = self.piece.with_rotation(rotation).with_col(col);
    }
}
