use clap::Parser;
use log::{
    error,
    info,
};

use fictitious_play::{
    games::Game,
    Solver,
    TrainingArgs,
};

#[derive(Parser)]
struct AppArgs {
    #[clap(long, short, value_enum, default_value_t = Game::PrisonersDilemma)]
    game: Game,

    #[clap(flatten)]
    training_args: TrainingArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize env_logger with a default log level of INFO.
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = AppArgs::parse();
    let config = args.game.config();
    info!("Solving {}", config.name);

    let mut solver = Solver::from_config(&config, &mut rand::thread_rng())?;
    let report = solver.train(&args.training_args).map_err(|err| {
        error!("Training failed: {}", err);
        err
    })?;
    print!("{}", report);
    Ok(())
}
