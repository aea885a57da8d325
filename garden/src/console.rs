//! Line-oriented console for the plant service.
//!
//! One command per line:
//! - `#hello <name>`                  - greet a gardener
//! - `#add <owner> <json>`            - create a plant
//! - `#light <owner> <plant> <json>`  - apply a light reading (`{"value": n}`)
//! - `#water <owner> <plant> <json>`  - apply a soil moisture reading
//! - `#plants [owner]`                - list plants as JSON
//! - `#help`, `#quit`

use garden_core::{GardenService, Plant, ServiceError};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Errors that end a console session.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const HELP: &str = "\
[HELP]
  #hello <name>                  - Greet a gardener
  #add <owner> <json>            - Create a plant
  #light <owner> <plant> <json>  - Send a light reading, e.g. {\"value\": 420}
  #water <owner> <plant> <json>  - Send a soil moisture reading
  #plants [owner]                - List all plants, or one gardener's
  #help                          - Show this help
  #quit                          - Exit";

/// What to do after a line.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Print(String),
    Quit,
    Nothing,
}

/// Run commands from `input` until EOF or `#quit`.
pub async fn run_console<R, W>(service: &GardenService, input: R, mut output: W) -> Result<(), ConsoleError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match handle_line(service, &line) {
            Reply::Print(text) => {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
            Reply::Quit => {
                output.write_all(b"Goodbye!\n").await?;
                output.flush().await?;
                break;
            }
            Reply::Nothing => {}
        }
    }

    Ok(())
}

/// Interpret one line.
pub fn handle_line(service: &GardenService, line: &str) -> Reply {
    let line = line.trim();
    if line.is_empty() {
        return Reply::Nothing;
    }

    let Some(command) = line.strip_prefix('#') else {
        return Reply::Print("[ERROR] Commands start with '#'. Type #help for help.".to_string());
    };

    let (verb, rest) = split_word(command);
    match verb {
        "quit" | "exit" => Reply::Quit,
        "help" => Reply::Print(HELP.to_string()),
        "hello" => match split_word(rest) {
            ("", _) => usage("#hello <name>"),
            (name, _) => Reply::Print(service.greet(name)),
        },
        "add" => match split_word(rest) {
            (owner, body) if !owner.is_empty() && !body.is_empty() => {
                respond(service.add_plant_json(owner, body))
            }
            _ => usage("#add <owner> <json>"),
        },
        "light" | "water" => {
            let (owner, rest) = split_word(rest);
            let (plant, body) = split_word(rest);
            if owner.is_empty() || plant.is_empty() || body.is_empty() {
                return usage(&format!("#{verb} <owner> <plant> <json>"));
            }
            let result = if verb == "light" {
                service.record_light_json(owner, plant, body)
            } else {
                service.record_water_json(owner, plant, body)
            };
            respond(result)
        }
        "plants" => match split_word(rest) {
            ("", _) => list(&service.plants()),
            (owner, _) => list(&service.plants_of(owner)),
        },
        _ => Reply::Print("[ERROR] Unknown command. Type #help for help.".to_string()),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(at) => (&s[..at], s[at..].trim()),
        None => (s, ""),
    }
}

fn usage(form: &str) -> Reply {
    Reply::Print(format!("[ERROR] Usage: {form}"))
}

fn respond<T: std::fmt::Display>(result: Result<T, ServiceError>) -> Reply {
    match result {
        Ok(ack) => Reply::Print(format!("[OK] {ack}")),
        Err(e) if e.is_not_found() => Reply::Print(format!("[NOT FOUND] {e}")),
        Err(e) => Reply::Print(format!("[ERROR] {e}")),
    }
}

fn list(plants: &[Plant]) -> Reply {
    match serde_json::to_string_pretty(plants) {
        Ok(json) => Reply::Print(json),
        Err(e) => Reply::Print(format!("[ERROR] {e}")),
    }
}
