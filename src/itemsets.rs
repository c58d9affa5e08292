pub mod pcy;
pub mod seed;

pub use seed::{LevelReport, LevelwiseSeed, SeedOutcome};
