//! Approximate Nash equilibria of two-player bimatrix games by fictitious play.

pub mod error;
pub mod games;
pub mod player;
pub mod report;
pub mod solver;

pub use error::{
    Error,
    Result,
};
pub use player::{
    Player,
    PlayerId,
};
pub use report::Report;
pub use solver::{
    Solver,
    TrainingArgs,
};
