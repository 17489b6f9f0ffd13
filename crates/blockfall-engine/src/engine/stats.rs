/// Running counters for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStats {
    ticks: u64,
    pieces_locked: u32,
    rows_cleared: u32,
    score: u32,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            pieces_locked: 0,
            rows_cleared: 0,
            score: 0,
        }
    }

    /// Gravity steps taken, locking ticks included.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    #[must_use]
    pub const fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    /// Total points paid out by collapsed rows.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub(crate) fn record_lock(&mut self) {
        self.pieces_locked += 1;
    }

    pub(crate) fn record_clear_points(&mut self, points: u32) {
        if points > 0 {
            self.rows_cleared += 1;
            self.score += points;
        }
    }
}
