pub use self::{fitness::*, genetic::*, stats::*};

mod fitness;
mod genetic;
mod stats;
