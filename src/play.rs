//! Match runner pitting two agents against each other

use crate::{
    Result,
    agents::Agent,
    tictactoe::{Game, GameOutcome, Player},
};

/// Drive a single game to completion, X moving first.
///
/// With `verbose` set, the board is rendered before every ply.
///
/// # Errors
///
/// Propagates any agent failure or illegal move immediately; the game is
/// abandoned rather than patched up.
pub fn play_game<'a>(
    x_agent: &'a mut dyn Agent,
    o_agent: &'a mut dyn Agent,
    verbose: bool,
) -> Result<GameOutcome> {
    let mut game = Game::new();

    while !game.is_over() {
        let state = game.current_state()?;
        if verbose {
            println!("\n{}\n", state.render());
        }

        let agent = match state.to_move {
            Player::X => &mut *x_agent,
            Player::O => &mut *o_agent,
        };
        let position = agent.select_move(&state)?;
        game.play(position)?;
    }

    if verbose {
        let final_state = game.current_state()?;
        println!("\n{}\n", final_state.render());
    }

    Ok(game.outcome.expect("finished game has an outcome"))
}

/// Outcome tallies over a series of games, from X's perspective
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
}

impl MatchStats {
    pub fn record(&mut self, outcome: GameOutcome) {
        self.games += 1;
        match outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }
}

/// Play a series of games and tally the outcomes
pub fn play_series(
    x_agent: &mut dyn Agent,
    o_agent: &mut dyn Agent,
    games: usize,
) -> Result<MatchStats> {
    let mut stats = MatchStats::default();
    for _ in 0..games {
        stats.record(play_game(x_agent, o_agent, false)?);
    }
    Ok(stats)
}
