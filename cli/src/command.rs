use std::str::FromStr;

use anyhow::{Context, bail, ensure};
use voltorb_core::{BOARD_SIZE, Coord, Coord2};

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the round from the menu, or continue once it is over.
    Continue,
    Flip(Coord2),
    Mark(Coord2),
    Spend,
    Reset,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Continue);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "c" | "continue" | "start" => Self::Continue,
            "f" | "flip" => Self::Flip(parse_coords(&mut words)?),
            "m" | "mark" => Self::Mark(parse_coords(&mut words)?),
            "s" | "spend" => Self::Spend,
            "r" | "reset" => Self::Reset,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => bail!("unknown command {other:?}, type \"help\" for a list"),
        };

        ensure!(words.next().is_none(), "too many arguments");
        Ok(command)
    }
}

/// Reads a 1-based `row col` pair into zero-based board coordinates.
fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<Coord2> {
    let row = parse_axis(words.next(), "row")?;
    let col = parse_axis(words.next(), "column")?;
    Ok((row, col))
}

fn parse_axis(word: Option<&str>, name: &str) -> anyhow::Result<Coord> {
    let word = word.with_context(|| format!("missing {name}"))?;
    let value: Coord = word
        .parse()
        .with_context(|| format!("{name} {word:?} is not a number"))?;
    ensure!(
        (1..=BOARD_SIZE).contains(&value),
        "{name} must be between 1 and {BOARD_SIZE}"
    );
    Ok(value - 1)
}

pub const HELP: &str = "\
commands:
  <enter> | continue     start the round, or go on once it is over
  flip <row> <col>       reveal a card (rows and columns are 1-5)
  mark <row> <col>       mark or unmark a card you think is a mine
  spend                  pay 100 points to skip a level (between rounds)
  reset                  reset the total score (between rounds)
  help                   show this list
  quit                   save and leave";
