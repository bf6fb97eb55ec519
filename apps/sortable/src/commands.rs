//! Line commands read from stdin by the terminal host.

use anyhow::{anyhow, bail, Context, Result};
use shared::domain::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick up the item at `from` and drop it at `to`.
    Move { from: Position, to: Position },
    Submit,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "commands: move <from> <to> | submit | show | help | quit";

pub fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        bail!("empty command");
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "move" | "mv" => {
            let from = parse_position(parts.next(), "from")?;
            let to = parse_position(parts.next(), "to")?;
            Command::Move { from, to }
        }
        "submit" => Command::Submit,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}'; {HELP}"),
    };

    if let Some(extra) = parts.next() {
        bail!("unexpected argument '{extra}'");
    }
    Ok(command)
}

fn parse_position(raw: Option<&str>, name: &str) -> Result<Position> {
    let raw = raw.ok_or_else(|| anyhow!("missing <{name}> position"))?;
    let index = raw
        .parse::<usize>()
        .with_context(|| format!("invalid <{name}> position '{raw}'"))?;
    Ok(Position(index))
}
