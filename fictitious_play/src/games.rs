use clap::ValueEnum;
use ndarray::{
    array,
    Array2,
};

/// Everything needed to build one `Player`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    pub policy_len: usize,

    /// Own payoffs, indexed `[row action][column action]`.
    pub utility: Array2<f64>,

    /// 0 for the row player, 1 for the column player.
    pub id: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub name: String,
    pub players: [PlayerConfig; 2],
}

impl GameConfig {
    pub fn new(name: &str, row_utility: Array2<f64>, column_utility: Array2<f64>) -> Self {
        let (rows, columns) = row_utility.dim();
        Self {
            name: name.to_string(),
            players: [
                PlayerConfig {
                    policy_len: rows,
                    utility: row_utility,
                    id: 0,
                },
                PlayerConfig {
                    policy_len: columns,
                    utility: column_utility,
                    id: 1,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Game {
    PrisonersDilemma,
    RockPaperScissors,
}

impl Game {
    pub fn config(&self) -> GameConfig {
        match self {
            Game::PrisonersDilemma => prisoners_dilemma(),
            Game::RockPaperScissors => rock_paper_scissors(),
        }
    }
}

/// Action 0 is "confess", action 1 is "deny". Both confessing is the only
/// equilibrium.
pub fn prisoners_dilemma() -> GameConfig {
    GameConfig::new(
        "prisoners-dilemma",
        array![[-4.0, 0.0], [-5.0, -1.0]],
        array![[-4.0, -5.0], [0.0, -1.0]],
    )
}

/// Actions: rock, scissors, paper.
pub fn rock_paper_scissors() -> GameConfig {
    zero_sum("rock-paper-scissors", array![[0.0, 1.0, -1.0], [-1.0, 0.0, 1.0], [1.0, -1.0, 0.0]])
}

/// A zero-sum game where the column player's payoffs are the negation of
/// `row_utility`.
pub fn zero_sum(name: &str, row_utility: Array2<f64>) -> GameConfig {
    let column_utility = row_utility.mapv(|u| -u);
    GameConfig::new(name, row_utility, column_utility)
}
