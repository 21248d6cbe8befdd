//! Legal move sequence reconstruction.
//!
//! Given a turn's before-board (side to move known) and after-board, this
//! module finds a 1-4 step token sequence whose application, with trap
//! captures resolved after every half-step, turns the one into the other.
//! The search is a plain breadth-first walk over cloned boards: slides
//! branch once per piece and direction, pushes and pulls branch per
//! adjacent enemy and destination, and a visited set keyed on the
//! serialized board bounds re-exploration. BFS order makes the first hit
//! minimal in step count, though not otherwise canonical.

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::board::{Board, Side, Square};
use crate::codec::{self, FormatError};
use crate::constants::{MAX_STEPS, N};
use crate::steps;

/// A board reached during reconstruction, with the steps that got there.
/// Ephemeral: copied on extension, discarded when its path is exhausted.
struct SearchState {
    board: Board,
    steps: Vec<String>,
}

/// Visited-set key: side to move plus the serialized 64-cell board.
fn state_key(side: Side, board: &Board) -> String {
    let mut key = String::with_capacity(1 + N * N);
    key.push(side.letter());
    key.push_str(&codec::payload(board));
    key
}

/// Reconstruct the step tokens that turn `before` into `after` with
/// `side` to move. Returns the space-joined notation of the first
/// sequence found, minimal in step count, or None when no 1-4 step
/// sequence exists.
pub fn reconstruct(before: &Board, after: &Board, side: Side) -> Option<String> {
    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();
    visited.insert(state_key(side, before));
    queue.push_back(SearchState {
        board: before.clone(),
        steps: Vec::new(),
    });
    let mut expanded = 0usize;

    while let Some(state) = queue.pop_front() {
        let taken = state.steps.len();
        if (1..=MAX_STEPS).contains(&taken) && state.board == *after {
            debug!("reconstructed {taken} steps after {expanded} expansions");
            return Some(state.steps.join(" "));
        }
        if taken >= MAX_STEPS {
            continue;
        }
        expanded += 1;
        for (next, tokens) in successors(&state.board, side, MAX_STEPS - taken) {
            if visited.insert(state_key(side, &next)) {
                let mut steps = state.steps.clone();
                steps.extend(tokens);
                queue.push_back(SearchState { board: next, steps });
            }
        }
    }
    debug!("no sequence found after {expanded} expansions");
    None
}

/// String-level convenience: decode two canonical position snapshots and
/// reconstruct the move between them. The side to move comes from the
/// before-snapshot; the after-snapshot's side token is not consulted.
pub fn reconstruct_snapshots(before: &str, after: &str) -> Result<Option<String>, FormatError> {
    let (side, before) = codec::decode(before)?;
    let (_, after) = codec::decode(after)?;
    Ok(reconstruct(&before, &after, side))
}

/// Enumerate successor boards with their tokens in canonical order:
/// row-major origin scan, directions north east south west, and at each
/// origin slides, then pushes, then pulls. Compounds only appear while
/// at least two steps of budget remain.
fn successors(board: &Board, side: Side, budget: usize) -> Vec<(Board, Vec<String>)> {
    let mut out = Vec::new();
    for row in 0..N as i8 {
        for col in 0..N as i8 {
            let from = Square::new(row, col);
            let Some(piece) = board.get(from) else {
                continue;
            };
            if piece.side != side || steps::is_frozen(board, from) {
                continue;
            }

            for dir in 0..4 {
                if let Some((next, tok)) = steps::slide(board, side, from, dir) {
                    out.push((next, vec![tok]));
                }
            }

            if budget < 2 {
                continue;
            }
            for dir in 0..4 {
                let target = from.step(dir);
                let Some(victim) = board.get(target) else {
                    continue;
                };
                if victim.side == side || victim.strength() > piece.strength() {
                    continue;
                }
                for push_dir in 0..4 {
                    if let Some((next, tokens)) =
                        steps::push(board, side, from, target, push_dir)
                    {
                        out.push((next, tokens.to_vec()));
                    }
                }
                for pull_dir in 0..4 {
                    if let Some((next, tokens)) =
                        steps::pull(board, side, from, target, pull_dir)
                    {
                        out.push((next, tokens.to_vec()));
                    }
                }
            }
        }
    }
    out
}
