//! Constants for board geometry, trap squares, and step notation.
//!
//! Arimaa is always played on a fixed 8x8 board with four trap squares,
//! so unlike variable-size games everything here is a plain constant.
//! The board is stored as a flat 64-cell array in row-major order with
//! row 0 at the north edge (rank 8).

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Arimaa is played on 8x8.
pub const N: usize = 8;

/// Total number of cells on the board.
pub const BOARDSIZE: usize = N * N;

/// The four trap squares as (row, col), zero-indexed from the north-west
/// corner.
pub const TRAPS: [(i8, i8); 4] = [(2, 2), (2, 5), (5, 2), (5, 5)];

// =============================================================================
// Turn Structure
// =============================================================================

/// Maximum number of steps in one turn. A push or pull costs two.
pub const MAX_STEPS: usize = 4;

// =============================================================================
// Directions
// =============================================================================

/// Direction index for north (toward rank 8).
pub const NORTH: usize = 0;
/// Direction index for east (toward file h).
pub const EAST: usize = 1;
/// Direction index for south (toward rank 1).
pub const SOUTH: usize = 2;
/// Direction index for west (toward file a).
pub const WEST: usize = 3;

/// (row, col) offsets per direction, in scan order north, east, south, west.
/// North decreases the row because row 0 is the north edge.
pub const DIR_DELTA: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Notation letters in the same order as [`DIR_DELTA`].
pub const DIR_LETTERS: [char; 4] = ['n', 'e', 's', 'w'];
