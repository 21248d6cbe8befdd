//! Canonical position protocol.
//!
//! A complete board snapshot travels as one line of text:
//!
//! ```text
//! setposition g "rrrrrrrrhdcemcdh                                HDCMECDHRRRRRRRR"
//! ```
//!
//! The quoted payload is exactly 64 characters, row-major from the north
//! edge, one piece letter per occupied cell and a space per empty cell.
//! The token before the payload is the side to move, `g` or `s`.

use thiserror::Error;

use crate::board::{Board, Piece, Side, Square};
use crate::constants::{BOARDSIZE, N};

/// Malformed canonical position string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("position string has no quoted payload")]
    MissingQuotes,
    #[error("position payload is {0} characters, expected 64")]
    BadLength(usize),
}

/// The 64-character cell payload for a board, row-major north to south.
pub fn payload(board: &Board) -> String {
    let mut out = String::with_capacity(BOARDSIZE);
    for row in 0..N as i8 {
        for col in 0..N as i8 {
            out.push(match board.get(Square::new(row, col)) {
                Some(piece) => piece.letter(),
                None => ' ',
            });
        }
    }
    out
}

/// Encode a board and side to move as a canonical position string.
pub fn encode(board: &Board, side: Side) -> String {
    format!("setposition {} \"{}\"", side.letter(), payload(board))
}

/// Decode a canonical position string.
///
/// The payload must sit between double quotes and hold exactly 64
/// characters. Unknown payload characters decode as empty cells, and an
/// unrecognized side token falls back to Gold; only a missing payload or
/// a wrong payload length is an error.
pub fn decode(text: &str) -> Result<(Side, Board), FormatError> {
    let open = text.find('"').ok_or(FormatError::MissingQuotes)?;
    let close = text.rfind('"').ok_or(FormatError::MissingQuotes)?;
    if close <= open {
        return Err(FormatError::MissingQuotes);
    }

    let cells: Vec<char> = text[open + 1..close].chars().collect();
    if cells.len() != BOARDSIZE {
        return Err(FormatError::BadLength(cells.len()));
    }

    let side = text[..open]
        .split_whitespace()
        .nth(1)
        .and_then(|tok| tok.chars().next())
        .and_then(Side::from_letter)
        .unwrap_or(Side::Gold);

    let mut board = Board::new();
    for (row, chunk) in cells.chunks(N).enumerate() {
        for (col, &c) in chunk.iter().enumerate() {
            if let Some(piece) = Piece::from_letter(c) {
                board.set(Square::new(row as i8, col as i8), piece);
            }
        }
    }
    Ok((side, board))
}
