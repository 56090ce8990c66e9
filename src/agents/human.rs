//! Interactive agent reading moves from stdin

use std::io::{self, BufRead, Write};

use super::Agent;
use crate::{Error, Result, tictactoe::BoardState};

/// Prompts a human for a cell index (0-8) and re-prompts until the input
/// parses and names an empty cell.
#[derive(Debug, Default)]
pub struct HumanAgent;

impl HumanAgent {
    pub fn new() -> Self {
        Self
    }

    fn prompt(&self, state: &BoardState) -> Result<usize> {
        let stdin = io::stdin();
        let mut line = String::new();

        loop {
            print!("{} to move, enter a cell (0-8): ", state.to_move);
            io::stdout().flush().map_err(|source| Error::Io {
                operation: "flush stdout".to_string(),
                source,
            })?;

            line.clear();
            let read = stdin.lock().read_line(&mut line).map_err(|source| Error::Io {
                operation: "read move from stdin".to_string(),
                source,
            })?;
            if read == 0 {
                return Err(Error::Io {
                    operation: "read move from stdin".to_string(),
                    source: io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"),
                });
            }

            match line.trim().parse::<usize>() {
                Ok(position) if state.legal_moves().contains(&position) => return Ok(position),
                Ok(position) => println!("cell {position} is not available, try again"),
                Err(_) => println!("expected a number between 0 and 8, try again"),
            }
        }
    }
}

impl Agent for HumanAgent {
    fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        self.prompt(state)
    }

    fn name(&self) -> &str {
        "human"
    }
}
