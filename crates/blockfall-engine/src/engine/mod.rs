//! Headless game engine.
//!
//! The [`core`](crate::core) module defines the passive pieces: boards,
//! pieces, and their legality rules. This module strings them together into a
//! playable game:
//!
//! - [`PieceQueue`] deals piece kinds in shuffled 7-bags from a [`PieceSeed`]
//! - [`Game`] owns the board, the falling piece, and the queue, and advances
//!   one gravity step per [`Game::tick`]
//! - [`GameStats`] counts ticks, locked pieces, cleared rows, and score
//!
//! A tick applies gravity or locks the piece, runs one step of the staged
//! row clear, and then checks the hidden band for game over. Callers steer
//! the falling piece between ticks, either manually through
//! [`Game::try_move`] and [`Game::try_rotate`] or all at once through
//! [`Game::apply_placement`].
//!
//! ```
//! use blockfall_engine::{BoardConfig, Game, PieceSeed};
//!
//! let mut game = Game::new(BoardConfig::STANDARD, PieceSeed(42));
//! while game.status().is_running() && game.stats().ticks() < 100 {
//!     game.tick();
//! }
//! assert!(game.stats().pieces_locked() > 0);
//! ```

pub use self::{game::*, piece_queue::*, stats::*};

pub(crate) mod game;
pub(crate) mod piece_queue;
pub(crate) mod stats;
