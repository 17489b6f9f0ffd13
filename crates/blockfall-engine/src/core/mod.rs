pub use self::{board::*, config::*, piece::*};

pub(crate) mod board;
pub(crate) mod config;
pub(crate) mod piece;
