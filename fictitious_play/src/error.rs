use thiserror::Error;

use crate::player::PlayerId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("player id must be 0 or 1, got {0}")]
    InvalidPlayerId(usize),

    #[error("{id} has {policy_len} actions but its utility matrix provides {expected}")]
    PolicyLenMismatch {
        id: PlayerId,
        policy_len: usize,
        expected: usize,
    },

    #[error("a game needs at least one action per player")]
    EmptyGame,

    /// The opponent policy (or the other player's utility matrix) does not
    /// broadcast against the utility matrix.
    #[error("shape mismatch: expected something broadcastable to {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("both players are {0}")]
    DuplicatePlayer(PlayerId),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
