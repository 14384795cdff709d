use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing_subscriber::filter::LevelFilter;
use voltorb_core::{AdvanceOutcome, FlipOutcome, MarkOutcome, Phase, Session, SpendOutcome};

use command::{Command, HELP};
use store::FileStore;

mod command;
mod render;
mod store;

#[derive(Parser, Debug)]
#[command(version, about = "Flip cards, multiply your points, avoid the mines", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where total and high score are kept between sessions
    #[arg(long, default_value = "score.json")]
    save_file: PathBuf,
}

fn init_logging(level: log::LevelFilter) {
    let level = match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

type CliSession = Session<FileStore, SmallRng>;

fn show(out: &mut impl Write, session: &CliSession) -> io::Result<()> {
    match session.phase() {
        Phase::Intermission => {
            writeln!(out, "\nCurrent level: {}", session.level())?;
            writeln!(out, "Total score: {}", session.total_score())?;
            writeln!(out, "High score: {}", session.high_score())?;
            if let Some(change) = session.last_level_change() {
                writeln!(out, "Your level has {change}.")?;
            }
            writeln!(
                out,
                "Press enter to start, \"spend\" to pay 100 points for a level, \"reset\" to clear the total."
            )
        }
        Phase::Playing => {
            let board = session.board();
            writeln!(out, "\n{}", render::board(board))?;
            writeln!(out, "{}", render::status(board, session.high_score()))
        }
    }
}

/// Applies one command, returns `false` when the player wants to leave.
fn apply(out: &mut impl Write, session: &mut CliSession, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Continue => match session.phase() {
            Phase::Intermission => {
                if let Err(reason) = session.start_round() {
                    writeln!(out, "Cannot start: {reason}")?;
                }
            }
            Phase::Playing => match session.advance()? {
                AdvanceOutcome::Rejected(reason) => writeln!(out, "Not yet: {reason}")?,
                AdvanceOutcome::Cleared { banked, level } => {
                    writeln!(out, "Banked {banked} points, on to level {level}.")?
                }
                AdvanceOutcome::Failed { level, .. } => {
                    writeln!(out, "Round lost, next round at level {level}.")?
                }
            },
        },
        Command::Flip(coords) => match session.flip(coords)? {
            FlipOutcome::Rejected(reason) => writeln!(out, "Cannot flip: {reason}")?,
            outcome if outcome.is_terminal() => {
                let verdict = if outcome == FlipOutcome::Won {
                    "All multipliers found!"
                } else {
                    "That was a mine."
                };
                writeln!(out, "{verdict} Press enter to continue.")?
            }
            FlipOutcome::Revealed(_) | FlipOutcome::HitMine | FlipOutcome::Won => {}
        },
        Command::Mark(coords) => {
            if let MarkOutcome::Rejected(reason) = session.toggle_mark(coords)? {
                writeln!(out, "Cannot mark: {reason}")?;
            }
        }
        Command::Spend => match session.spend_points()? {
            SpendOutcome::Accepted { level, total_score } => {
                writeln!(out, "Skipped to level {level}, {total_score} points left.")?
            }
            SpendOutcome::Rejected { reason, .. } => writeln!(out, "Cannot spend: {reason}")?,
        },
        Command::Reset => match session.reset_score() {
            Ok(()) => writeln!(out, "Total score reset.")?,
            Err(reason) => writeln!(out, "Cannot reset: {reason}")?,
        },
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}, save file: {}", args.save_file.display());

    let store = FileStore::new(args.save_file);
    let mut session = Session::open(store, SmallRng::seed_from_u64(seed))
        .context("Could not deal the first board")?;

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    show(&mut out, &session)?;

    for line in stdin.lock().lines() {
        let line = line.context("Could not read input")?;
        let keep_going = match line.parse::<Command>() {
            Ok(command) => apply(&mut out, &mut session, command)?,
            Err(err) => {
                writeln!(out, "{err:#}")?;
                true
            }
        };
        if !keep_going {
            break;
        }
        show(&mut out, &session)?;
    }

    let store = session.close();
    log::info!("Scores saved to {}", store.path().display());
    Ok(())
}
