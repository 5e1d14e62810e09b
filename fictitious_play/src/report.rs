use std::fmt::Display;

use ndarray::Array1;

use crate::player::PlayerId;

/// How exploitable `target`'s policy is for the other player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exploitability {
    pub target: PlayerId,

    /// Expected payoff of the best pure response against `target`'s policy.
    pub value: f64,

    /// `value` minus what the responding player currently earns with its own
    /// policy. Zero at an exact equilibrium.
    pub gap: f64,
}

impl Display for Exploitability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} exploitability: {}", self.target, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerReport {
    pub id: PlayerId,
    pub policy: Array1<f64>,
    pub exploitability: Exploitability,
}

/// Final strategies of both players plus the symmetric exploitability check.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub iterations: usize,
    pub players: [PlayerReport; 2],
}

impl Report {
    pub fn player(&self, id: PlayerId) -> &PlayerReport {
        &self.players[id.index()]
    }

    /// The larger of both players' epsilon-Nash gaps.
    pub fn max_gap(&self) -> f64 {
        self.players.iter().map(|p| p.exploitability.gap).fold(f64::MIN, f64::max)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Iterations: {}", self.iterations)?;
        for p in &self.players {
            write!(f, "{} [", p.id)?;
            for s in p.policy.iter() {
                write!(f, "{:.05}, ", s)?;
            }
            writeln!(f, "]")?;
        }
        for p in &self.players {
            writeln!(f, "{} (gap: {:.05})", p.exploitability, p.exploitability.gap)?;
        }
        Ok(())
    }
}
