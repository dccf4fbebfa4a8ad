use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use std::fs::File;
use std::io::{stdin, BufReader};

use patchwork_advisor::{
    snapshot::Snapshot,
    solver::{Solver, Strategy},
    GameState, DEFAULT_DEPTH,
};

mod report;

/// Set to `debug` to log every root candidate
const LOG_ENV: &str = "PATCHWORK_LOG";

fn init_logging() -> Result<()> {
    let level = match std::env::var(LOG_ENV).as_deref() {
        Ok("debug") => LevelFilter::Debug,
        Ok("off") => LevelFilter::Off,
        _ => LevelFilter::Info,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    Ok(())
}

// usage: patchwork-advisor [snapshot.json|-] [depth] [strategy]
fn main() -> Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let path = args.next();
    let depth = match args.next() {
        Some(depth) => depth
            .parse::<usize>()
            .with_context(|| format!("invalid search depth '{}'", depth))?,
        None => DEFAULT_DEPTH,
    };
    let strategy = match args.next() {
        Some(name) => name.parse::<Strategy>()?,
        None => Strategy::default(),
    };

    let snapshot = match path.as_deref() {
        None | Some("-") => {
            let stdin = stdin();
            Snapshot::from_reader(stdin.lock()).context("failed to read snapshot from stdin")?
        }
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
            Snapshot::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to read snapshot from {}", path))?
        }
    };
    let state = GameState::from_snapshot(&snapshot)?;

    report::position(&snapshot, &state)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));
    spinner.set_message(&format!("Searching {} turns ahead ({})", depth, strategy));
    spinner.enable_steady_tick(100);

    let mut solver = Solver::new(state.clone())
        .with_depth(depth)
        .with_strategy(strategy);
    let recommendation = solver.solve();
    spinner.finish_and_clear();

    report::recommendation(&snapshot, &state, &recommendation?)?;
    Ok(())
}
