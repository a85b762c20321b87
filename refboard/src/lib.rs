//! Display text for the referee board: stages, commands, teams and game events.

mod summary;
mod texts;

pub use summary::RefereeSummary;
pub use texts::*;
