//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// Complete board state including cells and whose turn it is
///
/// This type implements `Copy` for efficiency since it's only 10 bytes
/// (9 bytes for cells + 1 byte for player enum). Equality and hashing are
/// structural, so two boards with the same cells and side to move compare
/// equal wherever they are used as map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; 9],
    pub to_move: Player,
}

impl BoardState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        Self::new_with_player(Player::X)
    }

    /// Create a new empty board with a specified player to move first
    pub fn new_with_player(first_player: Player) -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
            to_move: first_player,
        }
    }

    /// Create a board from label format "XXXXXXXXX_P" where P is X or O.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The label format is invalid (not "board_player")
    /// - The board part is not exactly 9 characters
    /// - Any character is not a valid cell representation
    /// - The player part is not "X" or "O"
    /// - The piece counts are inconsistent with the player to move
    pub fn from_label(label: &str) -> Result<Self, crate::Error> {
        let mut parts = label.split('_');
        let (Some(board), Some(to_move_str)) = (parts.next(), parts.next()) else {
            return Err(crate::Error::InvalidLabelFormat {
                label: label.to_string(),
                expected: "XXXXXXXXX_P".to_string(),
            });
        };

        if parts.next().is_some() || board.len() != 9 {
            return Err(crate::Error::InvalidLabelFormat {
                label: label.to_string(),
                expected: "XXXXXXXXX_P".to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (position, character) in board.chars().enumerate() {
            cells[position] =
                Cell::from_char(character).ok_or(crate::Error::InvalidCellCharacter {
                    character,
                    position,
                    context: label.to_string(),
                })?;
        }

        let to_move = match to_move_str {
            "X" => Player::X,
            "O" => Player::O,
            other => {
                return Err(crate::Error::InvalidPlayerString {
                    player: other.to_string(),
                    label: label.to_string(),
                });
            }
        };

        let x_count = cells.iter().filter(|&&c| c == Cell::X).count() as isize;
        let o_count = cells.iter().filter(|&&c| c == Cell::O).count() as isize;
        let diff = x_count - o_count;

        let invalid_label = |reason: &str| crate::Error::InvalidConfiguration {
            message: format!("invalid board label '{label}': {reason}"),
        };

        if diff.abs() > 1 {
            return Err(invalid_label(&format!(
                "piece counts must differ by at most 1 (X={x_count}, O={o_count})"
            )));
        }
        if diff == 1 && to_move != Player::O {
            return Err(invalid_label(
                "X has an extra move, so it must be O's turn in the label",
            ));
        }
        if diff == -1 && to_move != Player::X {
            return Err(invalid_label(
                "O has an extra move, so it must be X's turn in the label",
            ));
        }

        let board = BoardState { cells, to_move };
        if board.has_won(Player::X) && board.has_won(Player::O) {
            return Err(invalid_label("both players cannot have winning lines"));
        }

        Ok(board)
    }

    /// Count the number of occupied cells on the board
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions in ascending cell order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Make a move and return a new board state
    #[must_use = "make_move returns a new board state; the original is unchanged"]
    pub fn make_move(&self, pos: usize) -> Result<BoardState, crate::Error> {
        if pos >= 9 {
            return Err(crate::Error::InvalidPosition { position: pos });
        }

        if !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }

        let mut new_state = *self;
        new_state.cells[pos] = self.to_move.to_cell();
        new_state.to_move = self.to_move.opponent();
        Ok(new_state)
    }

    /// Get legal moves in this position (empty cells when game not terminal).
    ///
    /// The ascending cell order is part of the contract: policy extraction
    /// breaks Q-value ties by enumeration order, so this must stay stable.
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.has_won(Player::X) || self.has_won(Player::O) || self.occupied_count() == 9
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        !self.cells.contains(&Cell::Empty) && self.winner().is_none()
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Get a string representation for use as a key, e.g. "X...O...._X"
    pub fn encode(&self) -> String {
        format!(
            "{}_{}",
            self.cells.iter().map(|&c| c.to_char()).collect::<String>(),
            self.to_move
        )
    }

    /// Render the board as a 3x3 grid for terminal display
    pub fn render(&self) -> String {
        let c = |i: usize| self.cells[i].to_char();
        format!(
            " {} | {} | {}\n---+---+---\n {} | {} | {}\n---+---+---\n {} | {} | {}",
            c(0),
            c(1),
            c(2),
            c(3),
            c(4),
            c(5),
            c(6),
            c(7),
            c(8)
        )
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = BoardState::new();
        assert_eq!(board.to_move, Player::X);
        assert_eq!(board.occupied_count(), 0);
        assert!(!board.is_terminal());
        assert_eq!(board.legal_moves().len(), 9);
    }

    #[test]
    fn test_make_move_alternates_players() {
        let board = BoardState::new();
        let after_x = board.make_move(4).unwrap();
        assert_eq!(after_x.get(4), Cell::X);
        assert_eq!(after_x.to_move, Player::O);

        let after_o = after_x.make_move(0).unwrap();
        assert_eq!(after_o.get(0), Cell::O);
        assert_eq!(after_o.to_move, Player::X);
    }

    #[test]
    fn test_make_move_rejects_occupied() {
        let board = BoardState::new().make_move(4).unwrap();
        assert!(matches!(
            board.make_move(4),
            Err(crate::Error::InvalidMove { position: 4 })
        ));
    }

    #[test]
    fn test_make_move_rejects_out_of_bounds() {
        let board = BoardState::new();
        assert!(matches!(
            board.make_move(9),
            Err(crate::Error::InvalidPosition { position: 9 })
        ));
    }

    #[test]
    fn test_structural_equality() {
        let a = BoardState::new().make_move(0).unwrap().make_move(4).unwrap();
        let b = BoardState::new().make_move(0).unwrap().make_move(4).unwrap();
        assert_eq!(a, b);

        use std::collections::HashMap;
        let mut table = HashMap::new();
        table.insert(a, 1.0);
        assert_eq!(table.get(&b), Some(&1.0));
    }

    #[test]
    fn test_encode_round_trip() {
        let board = BoardState::new().make_move(0).unwrap().make_move(4).unwrap();
        let label = board.encode();
        assert_eq!(label, "X...O...._X");
        assert_eq!(BoardState::from_label(&label).unwrap(), board);
    }

    #[test]
    fn test_from_label_rejects_bad_input() {
        assert!(BoardState::from_label("XXXX_X").is_err());
        assert!(BoardState::from_label("........._Z").is_err());
        assert!(BoardState::from_label("XX......._X").is_err());
        assert!(BoardState::from_label(".Q......._X").is_err());
    }

    #[test]
    fn test_terminal_detection() {
        let win = BoardState::from_label("XXX...OO._O").unwrap();
        assert!(win.is_terminal());
        assert_eq!(win.winner(), Some(Player::X));
        assert!(win.legal_moves().is_empty());

        let draw = BoardState::from_label("XOXXOOOXX_O").unwrap();
        assert!(draw.is_terminal());
        assert!(draw.is_draw());
        assert_eq!(draw.winner(), None);
    }
}
