//! Placement search for the headless game engine.
//!
//! The search is a weighted one-piece enumeration: every rotation state and
//! column of the falling piece is dropped on a copy of the board, the result
//! is measured by [`BoardFeatures`], and a [`FeatureWeights`] dot product
//! ranks the outcomes. [`Pilot`] wraps the search into a self-playing driver.

pub use self::{features::*, pilot::*, search::*, weights::*};

mod features;
mod pilot;
mod search;
mod weights;
