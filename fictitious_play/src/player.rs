use std::fmt::Display;

use log::trace;
use more_asserts::debug_assert_ge;
use ndarray::{
    Array1,
    Array2,
    ArrayView2,
    Axis,
};
use rand::Rng;

use crate::{
    error::{
        Error,
        Result,
    },
    games::PlayerConfig,
    report::Exploitability,
};

/// Seat of a player in a bimatrix game.
///
/// Rows of every utility matrix are the row player's actions and columns
/// are the column player's actions, regardless of which player owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    Row,
    Column,
}

impl PlayerId {
    pub fn index(&self) -> usize {
        match self {
            PlayerId::Row => 0,
            PlayerId::Column => 1,
        }
    }

    pub fn opponent(&self) -> PlayerId {
        match self {
            PlayerId::Row => PlayerId::Column,
            PlayerId::Column => PlayerId::Row,
        }
    }

    /// Axis of a utility matrix summed away when evaluating this player's
    /// actions against the opponent's mixed strategy.
    fn reduced_axis(&self) -> Axis {
        Axis(self.opponent().index())
    }
}

impl TryFrom<usize> for PlayerId {
    type Error = Error;

    fn try_from(num: usize) -> Result<Self> {
        match num {
            0 => Ok(PlayerId::Row),
            1 => Ok(PlayerId::Column),
            _ => Err(Error::InvalidPlayerId(num)),
        }
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.index())
    }
}

/// Returns the index of the largest value. Ties go to the lowest index.
fn max_index(values: &Array1<f64>) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, v)| if *v > values[best] { i } else { best })
}

/// A fictitious-play participant.
///
/// Each `update` plays a pure best response against the opponent's current
/// mixed strategy, and the player's own strategy becomes the empirical
/// frequency of all best responses played so far.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    utility: Array2<f64>,
    history: Array1<u64>,
    policy: Array1<f64>,
}

impl Player {
    pub fn new(policy_len: usize, utility: Array2<f64>, num: usize) -> Result<Self> {
        Self::new_with_rng(policy_len, utility, num, &mut rand::thread_rng())
    }

    /// Same as `new`, drawing the initial policy from `rng`.
    ///
    /// The initial policy is `policy_len` independent draws from `[0, 1)` and
    /// is NOT normalized. It only becomes a probability distribution after
    /// the first `update`.
    pub fn new_with_rng<R: Rng>(
        policy_len: usize,
        utility: Array2<f64>,
        num: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let id = PlayerId::try_from(num)?;
        if policy_len == 0 || utility.is_empty() {
            return Err(Error::EmptyGame);
        }
        let expected = utility.len_of(Axis(id.index()));
        if policy_len != expected {
            return Err(Error::PolicyLenMismatch {
                id,
                policy_len,
                expected,
            });
        }

        let policy = Array1::from_shape_fn(policy_len, |_| rng.gen::<f64>());
        Ok(Self {
            id,
            utility,
            history: Array1::zeros(policy_len),
            policy,
        })
    }

    pub fn from_config<R: Rng>(config: &PlayerConfig, rng: &mut R) -> Result<Self> {
        Self::new_with_rng(config.policy_len, config.utility.clone(), config.id, rng)
    }

    #[cfg(test)]
    pub fn new_with_policy(utility: Array2<f64>, num: usize, policy: Vec<f64>) -> Result<Self> {
        let mut player = Self::new(policy.len(), utility, num)?;
        player.policy = Array1::from(policy);
        Ok(player)
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn policy_len(&self) -> usize {
        self.history.len()
    }

    pub fn utility(&self) -> &Array2<f64> {
        &self.utility
    }

    pub fn history(&self) -> &Array1<u64> {
        &self.history
    }

    /// Number of updates applied so far.
    pub fn updates(&self) -> u64 {
        self.history.sum()
    }

    /// The current policy as a flat vector.
    pub fn policy(&self) -> &Array1<f64> {
        &self.policy
    }

    /// The current policy shaped to broadcast against a utility matrix:
    /// a column vector `(n, 1)` for the row player and a row vector `(1, n)`
    /// for the column player.
    ///
    /// Before the first `update` this is the raw random initial vector, which
    /// generally does not sum to 1.
    pub fn get_policy(&self) -> Array2<f64> {
        self.policy.view().insert_axis(self.id.reduced_axis()).to_owned()
    }

    /// Expected payoff of each own pure action against `opponent_policy`.
    fn expected_payoffs(&self, opponent_policy: ArrayView2<f64>) -> Result<Array1<f64>> {
        let broadcasted = opponent_policy.broadcast(self.utility.raw_dim()).ok_or(
            Error::ShapeMismatch {
                expected: self.utility.dim(),
                got: opponent_policy.dim(),
            },
        )?;
        let earn = &broadcasted * &self.utility;
        Ok(earn.sum_axis(self.id.reduced_axis()))
    }

    /// Plays a best response to `opponent_policy` and folds it into the
    /// empirical strategy. Returns the chosen action.
    ///
    /// On error the player is left untouched.
    pub fn update(&mut self, opponent_policy: ArrayView2<f64>) -> Result<usize> {
        let expected_payoff = self.expected_payoffs(opponent_policy)?;
        let best_action = max_index(&expected_payoff);
        trace!("{} best response: {} {}", self.id, best_action, expected_payoff);

        self.history[best_action] += 1;
        let total = self.history.sum() as f64;
        self.policy = self.history.mapv(|h| h as f64 / total);
        debug_assert_ge!(total, 1.0);
        Ok(best_action)
    }

    /// Measures how exploitable `opponent_policy` is from this player's seat.
    pub fn exploitability(&self, opponent_policy: ArrayView2<f64>) -> Result<Exploitability> {
        let expected_payoff = self.expected_payoffs(opponent_policy)?;
        let value = expected_payoff[max_index(&expected_payoff)];
        let current = expected_payoff.dot(&self.policy);
        Ok(Exploitability {
            target: self.id.opponent(),
            value,
            gap: value - current,
        })
    }
}
