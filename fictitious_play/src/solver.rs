use std::{
    fs::File,
    io::{
        BufWriter,
        Write,
    },
    path::PathBuf,
};

use clap::{
    Args,
    ValueHint,
};
use log::{
    debug,
    info,
};
use rand::Rng;

use crate::{
    error::{
        Error,
        Result,
    },
    games::GameConfig,
    player::{
        Player,
        PlayerId,
    },
    report::{
        PlayerReport,
        Report,
    },
};

#[derive(Args)]
pub struct TrainingArgs {
    #[clap(long, short, value_parser, default_value_t = 1000)]
    iterations: usize,

    /// Log exploitability every N iterations. 0 disables it.
    #[clap(long, value_parser, default_value_t = 100)]
    log_interval: usize,

    #[clap(long, short, value_parser, value_hint(ValueHint::FilePath))]
    log_path: Option<PathBuf>,
}

impl TrainingArgs {
    pub fn new(iterations: usize) -> Self {
        TrainingArgs {
            iterations,
            log_interval: 0,
            log_path: None,
        }
    }
}

/// Runs fictitious play between a row player and a column player.
pub struct Solver {
    players: [Player; 2],
    iterations: usize,
}

impl Solver {
    /// Accepts the two players in either order.
    pub fn new(a: Player, b: Player) -> Result<Self> {
        if a.id() == b.id() {
            return Err(Error::DuplicatePlayer(a.id()));
        }
        let [row, column] = if a.id() == PlayerId::Row {
            [a, b]
        } else {
            [b, a]
        };
        if row.utility().dim() != column.utility().dim() {
            return Err(Error::ShapeMismatch {
                expected: row.utility().dim(),
                got: column.utility().dim(),
            });
        }
        Ok(Solver {
            players: [row, column],
            iterations: 0,
        })
    }

    pub fn from_config<R: Rng>(config: &GameConfig, rng: &mut R) -> Result<Self> {
        let [row, column] = &config.players;
        Self::new(Player::from_config(row, rng)?, Player::from_config(column, rng)?)
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// Number of rounds played so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// One round: the row player responds to the column player's current
    /// policy, then the column player responds to the row player's policy
    /// as it stands after that update.
    fn step(&mut self) -> Result<()> {
        let [row, column] = &mut self.players;
        row.update(column.get_policy().view())?;
        column.update(row.get_policy().view())?;
        self.iterations += 1;
        Ok(())
    }

    /// Plays exactly `loop_time` rounds. The first error aborts the run.
    pub fn run(&mut self, loop_time: usize) -> Result<()> {
        for _ in 0..loop_time {
            self.step()?;
        }
        debug!("{} rounds played", self.iterations);
        Ok(())
    }

    /// Current policies of both players, each with its exploitability as
    /// measured by the other player.
    pub fn report(&self) -> Result<Report> {
        let player_report = |id: PlayerId| -> Result<PlayerReport> {
            let player = self.player(id);
            let exploitability =
                self.player(id.opponent()).exploitability(player.get_policy().view())?;
            Ok(PlayerReport {
                id,
                policy: player.policy().clone(),
                exploitability,
            })
        };
        Ok(Report {
            iterations: self.iterations,
            players: [player_report(PlayerId::Row)?, player_report(PlayerId::Column)?],
        })
    }

    pub fn train(&mut self, args: &TrainingArgs) -> Result<Report> {
        let mut log_writer = match &args.log_path {
            Some(path) => {
                let mut w = BufWriter::new(File::create(path)?);
                writeln!(w, "epoch,p0_exploitability,p1_exploitability,p0_gap,p1_gap")?;
                Some(w)
            }
            None => None,
        };

        for _ in 0..args.iterations {
            self.step()?;
            if args.log_interval == 0 || self.iterations % args.log_interval != 0 {
                continue;
            }

            let report = self.report()?;
            let [p0, p1] = &report.players;
            info!(
                "epoch {:10}: exploitability gap: p0 {:.06}, p1 {:.06}",
                self.iterations, p0.exploitability.gap, p1.exploitability.gap
            );
            if let Some(w) = &mut log_writer {
                writeln!(
                    w,
                    "{},{:.12},{:.12},{:.12},{:.12}",
                    self.iterations,
                    p0.exploitability.value,
                    p1.exploitability.value,
                    p0.exploitability.gap,
                    p1.exploitability.gap
                )?;
                w.flush()?;
            }
        }
        info!("Training has finished");

        let report = self.report()?;
        for line in report.to_string().lines() {
            info!("{}", line);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{
        array,
        Array2,
    };
    use rand::{
        rngs::StdRng,
        SeedableRng,
    };

    use super::*;
    use crate::games;

    #[test]
    fn test_invalid_pairs() {
        let utility = array![[1.0, 0.0], [0.0, 1.0]];
        let a = Player::new(2, utility.clone(), 0).unwrap();
        let b = Player::new(2, utility.clone(), 0).unwrap();
        assert!(matches!(Solver::new(a, b), Err(Error::DuplicatePlayer(PlayerId::Row))));

        let a = Player::new(2, utility, 0).unwrap();
        let b = Player::new(3, Array2::zeros((2, 3)), 1).unwrap();
        assert!(matches!(
            Solver::new(a, b),
            Err(Error::ShapeMismatch {
                expected: (2, 2),
                got: (2, 3),
            })
        ));
    }

    #[test]
    fn test_players_in_any_order() {
        let game = games::prisoners_dilemma();
        let mut rng = StdRng::seed_from_u64(0);
        let row = Player::from_config(&game.players[0], &mut rng).unwrap();
        let column = Player::from_config(&game.players[1], &mut rng).unwrap();
        let solver = Solver::new(column, row).unwrap();
        assert_eq!(PlayerId::Row, solver.player(PlayerId::Row).id());
        assert_eq!(PlayerId::Column, solver.player(PlayerId::Column).id());
    }

    #[test]
    fn test_zero_rounds_is_a_no_op() {
        let row = Player::new_with_policy(array![[1.0, 0.0], [0.0, 1.0]], 0, vec![0.3, 0.9]).unwrap();
        let column =
            Player::new_with_policy(array![[0.0, 1.0], [1.0, 0.0]], 1, vec![0.4, 0.2]).unwrap();
        let mut solver = Solver::new(row, column).unwrap();
        solver.run(0).unwrap();

        let report = solver.report().unwrap();
        assert_eq!(0, report.iterations);
        assert_eq!(array![0.3, 0.9], report.player(PlayerId::Row).policy);
        assert_eq!(array![0.4, 0.2], report.player(PlayerId::Column).policy);
        assert_eq!(0, solver.player(PlayerId::Row).updates());
    }

    #[test]
    fn test_first_round_reads_initial_column_policy() {
        let row = Player::new_with_policy(array![[1.0, 0.0], [0.0, 1.0]], 0, vec![0.5, 0.5]).unwrap();
        let column =
            Player::new_with_policy(array![[0.0, 0.0], [0.0, 0.0]], 1, vec![0.2, 0.9]).unwrap();
        let mut solver = Solver::new(row, column).unwrap();
        solver.run(1).unwrap();
        assert_eq!(solver.player(PlayerId::Row).history(), &array![0u64, 1]);
    }

    #[test]
    fn test_column_player_sees_updated_row_policy() {
        // The row player always picks action 1. The column player copies
        // whatever the row player's policy favours.
        let row = Player::new_with_policy(array![[0.0, 0.0], [1.0, 1.0]], 0, vec![1.0, 0.0]).unwrap();
        let column =
            Player::new_with_policy(array![[1.0, 0.0], [0.0, 1.0]], 1, vec![0.5, 0.5]).unwrap();
        let mut solver = Solver::new(row, column).unwrap();
        solver.run(1).unwrap();

        // Reacting to the row player's initial policy would have picked 0.
        assert_eq!(solver.player(PlayerId::Column).history(), &array![0u64, 1]);
        assert_eq!(1, solver.iterations());
    }

    #[test]
    fn test_prisoners_dilemma_converges() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut solver = Solver::from_config(&games::prisoners_dilemma(), &mut rng).unwrap();
        solver.run(1000).unwrap();

        let report = solver.report().unwrap();
        assert_eq!(1000, report.iterations);
        for p in &report.players {
            assert_eq!(array![1.0, 0.0], p.policy);
            assert_abs_diff_eq!(-4.0, p.exploitability.value, epsilon = 1e-12);
            assert_abs_diff_eq!(0.0, p.exploitability.gap, epsilon = 1e-12);
        }
        assert_eq!(solver.player(PlayerId::Row).history(), &array![1000u64, 0]);
    }

    #[test]
    fn test_rock_paper_scissors_converges() {
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut solver = Solver::from_config(&games::rock_paper_scissors(), &mut rng).unwrap();
            solver.run(1000).unwrap();

            let report = solver.report().unwrap();
            for p in &report.players {
                for prob in p.policy.iter() {
                    assert_abs_diff_eq!(1.0 / 3.0, *prob, epsilon = 0.05);
                }
                assert_abs_diff_eq!(1.0, p.policy.sum(), epsilon = 1e-9);
                assert!(p.exploitability.value < 0.05);
                assert!(p.exploitability.gap < 0.05);
            }
        }
    }

    #[test]
    fn test_run_resumes() {
        let game = games::rock_paper_scissors();
        let mut rng = StdRng::seed_from_u64(1);
        let mut once = Solver::from_config(&game, &mut rng).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut twice = Solver::from_config(&game, &mut rng).unwrap();

        once.run(50).unwrap();
        twice.run(20).unwrap();
        twice.run(30).unwrap();
        assert_eq!(once.report().unwrap(), twice.report().unwrap());
    }

    #[test]
    fn test_train_writes_log() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("exploitability.csv");
        let args = TrainingArgs {
            iterations: 30,
            log_interval: 10,
            log_path: Some(log_path.clone()),
        };

        let mut rng = StdRng::seed_from_u64(3);
        let mut solver = Solver::from_config(&games::prisoners_dilemma(), &mut rng).unwrap();
        let report = solver.train(&args).unwrap();
        assert_eq!(30, report.iterations);

        let log = std::fs::read_to_string(log_path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(4, lines.len());
        assert_eq!("epoch,p0_exploitability,p1_exploitability,p0_gap,p1_gap", lines[0]);
        assert!(lines[3].starts_with("30,-4.000000000000,"));
    }
}
