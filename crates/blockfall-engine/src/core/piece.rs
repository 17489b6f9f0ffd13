use std::fmt;

use arrayvec::ArrayVec;

use super::config::BoardConfig;

/// The seven piece kinds.
///
/// Each kind carries a stable digit used by the board's text format and a
/// fixed rotation-state count: the square piece has one state, the straight
/// piece alternates between two, and the rest cycle through four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    I = 1,
    O = 2,
    T = 3,
    S = 4,
    Z = 5,
    J = 6,
    L = 7,
}

impl PieceKind {
    /// Number of distinct kinds.
    pub const LEN: usize = 7;

    /// Every kind, in digit order.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    /// The digit representing this kind in grid dumps, `1..=7`.
    #[must_use]
    pub const fn digit(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::I),
            2 => Some(Self::O),
            3 => Some(Self::T),
            4 => Some(Self::S),
            5 => Some(Self::Z),
            6 => Some(Self::J),
            7 => Some(Self::L),
            _ => None,
        }
    }

    /// How many distinct rotation states this kind cycles through.
    ///
    /// # Examples
    ///
    /// ```
    /// # use blockfall_engine::PieceKind;
    /// assert_eq!(PieceKind::O.rotation_states(), 1);
    /// assert_eq!(PieceKind::I.rotation_states(), 2);
    /// assert_eq!(PieceKind::T.rotation_states(), 4);
    /// ```
    #[must_use]
    pub const fn rotation_states(self) -> u8 {
        match self {
            Self::O => 1,
            Self::I => 2,
            _ => 4,
        }
    }

    /// Side length of the square grid bounding this kind's shape.
    #[must_use]
    pub const fn grid_size(self) -> usize {
        match self {
            Self::I => 4,
            Self::O => 2,
            _ => 3,
        }
    }

    const fn table_index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::I => "I",
            Self::O => "O",
            Self::T => "T",
            Self::S => "S",
            Self::Z => "Z",
            Self::J => "J",
            Self::L => "L",
        };
        f.write_str(name)
    }
}

/// Horizontal and vertical piece translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

impl MoveDirection {
    /// Translation delta as `(row, col)`. Rows grow downward.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::Down => (1, 0),
        }
    }
}

/// Rotation directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

type SpawnGrid = [[u8; 4]; 4];

/// Spawn-state shapes, anchored at the top-left of each kind's bounding grid.
/// Successive clockwise quarter turns of these generate every rotation state.
const SPAWN_GRIDS: [SpawnGrid; PieceKind::LEN] = [
    // I
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
    // O
    [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // T
    [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // S
    [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // Z
    [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // J
    [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // L
    [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
];

/// Cell offsets `(row, col)` from the anchor for one rotation state.
type CellOffsets = [(i32, i32); 4];

const fn rotated_cw(grid: SpawnGrid, size: usize) -> SpawnGrid {
    let mut out = [[0; 4]; 4];
    let mut y = 0;
    while y < size {
        let mut x = 0;
        while x < size {
            out[y][x] = grid[size - 1 - x][y];
            x += 1;
        }
        y += 1;
    }
    out
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn cell_offsets(grid: SpawnGrid, size: usize) -> CellOffsets {
    let mut out = [(0, 0); 4];
    let mut n = 0;
    let mut y = 0;
    while y < size {
        let mut x = 0;
        while x < size {
            if grid[y][x] != 0 {
                assert!(n < 4, "piece shapes have exactly four cells");
                out[n] = (y as i32, x as i32);
                n += 1;
            }
            x += 1;
        }
        y += 1;
    }
    assert!(n == 4, "piece shapes have exactly four cells");
    out
}

const fn offset_rotations(kind: PieceKind) -> [CellOffsets; 4] {
    let size = kind.grid_size();
    let r0 = SPAWN_GRIDS[kind.table_index()];
    let r1 = rotated_cw(r0, size);
    let r2 = rotated_cw(r1, size);
    let r3 = rotated_cw(r2, size);
    [
        cell_offsets(r0, size),
        cell_offsets(r1, size),
        cell_offsets(r2, size),
        cell_offsets(r3, size),
    ]
}

/// Occupied-cell offsets for every kind and rotation state, generated at
/// compile time from [`SPAWN_GRIDS`].
static PIECE_CELLS: [[CellOffsets; 4]; PieceKind::LEN] = [
    offset_rotations(PieceKind::I),
    offset_rotations(PieceKind::O),
    offset_rotations(PieceKind::T),
    offset_rotations(PieceKind::S),
    offset_rotations(PieceKind::Z),
    offset_rotations(PieceKind::J),
    offset_rotations(PieceKind::L),
];

/// A falling piece: a kind, a rotation state, and a board anchor.
///
/// The anchor is the top-left corner of the bounding grid. It may sit outside
/// the board while the shape's occupied cells stay inside, which is how the
/// straight piece hugs the walls when vertical. Pieces are plain values;
/// movement and rotation return adjusted copies, and legality is the board's
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: u8,
    row: i32,
    col: i32,
}

impl Piece {
    /// The spawn piece for a kind: rotation 0, anchored at the top row and
    /// horizontally centered for the kind's grid size.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn spawn(kind: PieceKind, config: &BoardConfig) -> Self {
        let col = (config.cols() - kind.grid_size() + 1) / 2;
        Self {
            kind,
            rotation: 0,
            row: 0,
            col: col as i32,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Same piece in a different rotation state.
    ///
    /// # Panics
    ///
    /// Panics when `rotation` is not a valid state index for the kind.
    #[must_use]
    pub fn with_rotation(self, rotation: u8) -> Self {
        assert!(
            rotation < self.kind.rotation_states(),
            "rotation {rotation} out of range for kind {}",
            self.kind,
        );
        Self { rotation, ..self }
    }

    /// Same piece anchored at a different column.
    #[must_use]
    pub const fn with_col(self, col: i32) -> Self {
        Self { col, ..self }
    }

    /// The piece translated one cell in `direction`.
    #[must_use]
    pub const fn shifted(self, direction: MoveDirection) -> Self {
        let (dr, dc) = direction.delta();
        Self {
            row: self.row + dr,
            col: self.col + dc,
            ..self
        }
    }

    /// The piece turned one state in `spin`, wrapping modulo the kind's
    /// state count.
    #[must_use]
    pub const fn rotated(self, spin: Spin) -> Self {
        let states = self.kind.rotation_states();
        let rotation = match spin {
            Spin::Clockwise => (self.rotation + 1) % states,
            Spin::CounterClockwise => (self.rotation + states - 1) % states,
        };
        Self { rotation, ..self }
    }

    /// Absolute board positions of the four occupied cells.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<(i32, i32), 4> {
        PIECE_CELLS[self.kind.table_index()][self.rotation as usize]
            .iter()
            .map(|&(dr, dc)| (self.row + dr, self.col + dc))
            .collect()
    }
}
