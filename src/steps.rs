//! Atomic step execution and the full movement rules.
//!
//! This module provides the core game logic for Arimaa:
//! - Step token parsing (`Rb6`, `Hb6n`, `Rc6x`)
//! - Freezing and full slide legality
//! - Push and pull compounds as pure functions returning new boards
//! - Trap-capture resolution after every half-step
//!
//! Two execution paths exist on purpose. The mutating path
//! ([`apply_token`]/[`apply_step`]) replays transcript tokens: it checks
//! structure only (bounds, emptiness, occupant type) because a transcript
//! records pushed enemy pieces and pushed-backward rabbits as ordinary
//! tokens inside the other side's turn. The pure path ([`slide`],
//! [`push`], [`pull`]) generates new moves and enforces the full rules:
//! side ownership, freezing, strength, and the rabbit restriction.
//! Rules-illegal tokens never raise; they leave the board untouched.

use log::debug;

use crate::board::{Board, Piece, PieceType, Side, Square};
use crate::constants::{DIR_LETTERS, NORTH, SOUTH, TRAPS};

/// One parsed step token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Setup placement: put a piece on an empty square.
    Place { piece: Piece, to: Square },
    /// Move the piece of the given kind on `from` one square along `dir`.
    Slide { kind: PieceType, from: Square, dir: usize },
    /// Remove whatever occupies `from` (transcript capture annotation).
    Remove { from: Square },
}

fn dir_from_letter(c: char) -> Option<usize> {
    DIR_LETTERS.iter().position(|&d| d == c)
}

/// Direction index leading from `from` to the adjacent square `to`, or
/// None when the squares are not orthogonally adjacent.
fn dir_towards(from: Square, to: Square) -> Option<usize> {
    (0..4).find(|&dir| from.step(dir) == to)
}

/// Token for a single half-step: uppercase piece letter, origin square,
/// direction letter.
fn step_token(kind: PieceType, from: Square, dir: usize) -> String {
    format!("{}{}{}", kind.letter(), from, DIR_LETTERS[dir])
}

/// Parse one step token in board coordinate notation:
/// `<PieceLetter><file a-h><rank 1-8>[<direction n|s|e|w|x>[x]]`.
/// Returns None for anything structurally invalid.
pub fn parse_step(tok: &str) -> Option<Step> {
    let chars: Vec<char> = tok.chars().collect();
    if !(3..=5).contains(&chars.len()) {
        return None;
    }
    let piece = Piece::from_letter(chars[0])?;
    let sq = Square::from_name(chars[1], chars[2])?;
    match chars.len() {
        3 => Some(Step::Place { piece, to: sq }),
        4 => match chars[3] {
            'x' => Some(Step::Remove { from: sq }),
            d => dir_from_letter(d).map(|dir| Step::Slide {
                kind: piece.kind,
                from: sq,
                dir,
            }),
        },
        _ => {
            if chars[4] != 'x' {
                return None;
            }
            dir_from_letter(chars[3]).map(|dir| Step::Slide {
                kind: piece.kind,
                from: sq,
                dir,
            })
        }
    }
}

// =============================================================================
// Rules predicates
// =============================================================================

/// The rank-losing direction a rabbit may never take on its own: south
/// for Gold, north for Silver.
fn backward_dir(side: Side) -> usize {
    match side {
        Side::Gold => SOUTH,
        Side::Silver => NORTH,
    }
}

/// A piece is frozen iff it has no adjacent friendly piece and at least
/// one adjacent enemy of strictly greater strength. Frozen pieces cannot
/// initiate a slide but may still be pushed or pulled.
pub fn is_frozen(board: &Board, sq: Square) -> bool {
    let Some(piece) = board.get(sq) else {
        return false;
    };
    let mut friendly = false;
    let mut stronger = false;
    for n in sq.neighbors() {
        if let Some(other) = board.get(n) {
            if other.side == piece.side {
                friendly = true;
            } else if other.strength() > piece.strength() {
                stronger = true;
            }
        }
    }
    !friendly && stronger
}

/// Full slide legality for a voluntary step by `side`: the piece must
/// belong to the side, be unfrozen, target an empty on-board square, and
/// a rabbit may not move backward.
pub fn can_slide(board: &Board, side: Side, from: Square, dir: usize) -> bool {
    let Some(piece) = board.get(from) else {
        return false;
    };
    if piece.side != side || is_frozen(board, from) {
        return false;
    }
    if piece.kind == PieceType::Rabbit && dir == backward_dir(side) {
        return false;
    }
    let to = from.step(dir);
    to.on_board() && board.get(to).is_none()
}

// =============================================================================
// Trap-capture resolution
// =============================================================================

/// Remove every trap occupant that has no adjacent same-side piece.
/// Runs after every half-step; a removal mid-turn can itself strand a
/// piece on another trap by the next half-step, which is why callers
/// never defer this to the end of a turn. Traps are never adjacent to
/// each other, so one scan suffices.
pub fn resolve_captures(board: &mut Board) -> Vec<(Square, Piece)> {
    let mut removed = Vec::new();
    for &(row, col) in &TRAPS {
        let trap = Square::new(row, col);
        if let Some(piece) = board.get(trap) {
            let supported = trap
                .neighbors()
                .iter()
                .any(|&n| board.get(n).is_some_and(|p| p.side == piece.side));
            if !supported {
                board.clear(trap);
                removed.push((trap, piece));
            }
        }
    }
    removed
}

// =============================================================================
// Mutating replay path
// =============================================================================

/// Apply one transcript token to the board in place, then resolve trap
/// captures. Returns whether the board changed; structurally invalid or
/// inapplicable tokens no-op.
pub fn apply_token(board: &mut Board, tok: &str) -> bool {
    match parse_step(tok) {
        Some(step) => apply_step(board, step),
        None => {
            debug!("ignoring malformed step token '{tok}'");
            false
        }
    }
}

/// Apply one parsed step to the board in place, then resolve trap
/// captures. Replay checks structure only: placements need an empty
/// in-bounds target, slides need a matching occupant kind and an empty
/// in-bounds target, removals need an occupant.
pub fn apply_step(board: &mut Board, step: Step) -> bool {
    let changed = match step {
        Step::Place { piece, to } => {
            if to.on_board() && board.get(to).is_none() {
                board.set(to, piece);
                true
            } else {
                false
            }
        }
        Step::Slide { kind, from, dir } => {
            let to = from.step(dir);
            match board.get(from) {
                Some(piece) if piece.kind == kind && to.on_board() && board.get(to).is_none() => {
                    board.clear(from);
                    board.set(to, piece);
                    true
                }
                _ => false,
            }
        }
        Step::Remove { from } => {
            if board.get(from).is_some() {
                board.clear(from);
                true
            } else {
                false
            }
        }
    };
    if changed {
        resolve_captures(board);
    }
    changed
}

/// Replay a whole token list in order, resolving captures after each.
pub fn apply_tokens(board: &mut Board, tokens: &[impl AsRef<str>]) {
    for tok in tokens {
        apply_token(board, tok.as_ref());
    }
}

// =============================================================================
// Pure generation path
// =============================================================================

/// Pure slide: the successor board and its token, or None when the slide
/// is not fully legal for `side`.
pub fn slide(board: &Board, side: Side, from: Square, dir: usize) -> Option<(Board, String)> {
    if !can_slide(board, side, from, dir) {
        return None;
    }
    let piece = board.get(from)?;
    let mut next = board.clone();
    next.clear(from);
    next.set(from.step(dir), piece);
    resolve_captures(&mut next);
    Some((next, step_token(piece.kind, from, dir)))
}

/// Pure push: the unfrozen piece of `side` on `from` forces the adjacent
/// weaker-or-equal enemy on `target` one square along `push_dir` into an
/// empty square, then follows into the vacated square. Captures resolve
/// after each half-step; if the first half-step captures the pusher
/// itself, the second half-step does not happen, exactly as a replay of
/// the two tokens would behave.
pub fn push(
    board: &Board,
    side: Side,
    from: Square,
    target: Square,
    push_dir: usize,
) -> Option<(Board, [String; 2])> {
    let pusher = board.get(from)?;
    let victim = board.get(target)?;
    let follow_dir = dir_towards(from, target)?;
    if pusher.side != side || victim.side == side {
        return None;
    }
    if pusher.strength() < victim.strength() || is_frozen(board, from) {
        return None;
    }
    let dest = target.step(push_dir);
    if !dest.on_board() || board.get(dest).is_some() {
        return None;
    }

    let mut next = board.clone();
    next.clear(target);
    next.set(dest, victim);
    resolve_captures(&mut next);

    if next.get(from) == Some(pusher) && next.get(target).is_none() {
        next.clear(from);
        next.set(target, pusher);
        resolve_captures(&mut next);
    }
    Some((
        next,
        [
            step_token(victim.kind, target, push_dir),
            step_token(pusher.kind, from, follow_dir),
        ],
    ))
}

/// Pure pull: the unfrozen piece of `side` on `from` slides along `dir`
/// (a real slide, so the rabbit restriction applies), then the adjacent
/// weaker-or-equal enemy on `target` is dragged into the vacated square.
/// Captures resolve after each half-step; a victim captured by the first
/// half-step is simply not dragged.
pub fn pull(
    board: &Board,
    side: Side,
    from: Square,
    target: Square,
    dir: usize,
) -> Option<(Board, [String; 2])> {
    let puller = board.get(from)?;
    let victim = board.get(target)?;
    let drag_dir = dir_towards(target, from)?;
    if puller.side != side || victim.side == side {
        return None;
    }
    if puller.strength() < victim.strength() {
        return None;
    }
    if !can_slide(board, side, from, dir) {
        return None;
    }

    let mut next = board.clone();
    next.clear(from);
    next.set(from.step(dir), puller);
    resolve_captures(&mut next);

    if next.get(target) == Some(victim) && next.get(from).is_none() {
        next.clear(target);
        next.set(from, victim);
        resolve_captures(&mut next);
    }
    Some((
        next,
        [
            step_token(puller.kind, from, dir),
            step_token(victim.kind, target, drag_dir),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EAST, WEST};

    fn sq(name: &str) -> Square {
        let mut chars = name.chars();
        Square::from_name(chars.next().unwrap(), chars.next().unwrap()).unwrap()
    }

    fn piece(letter: char) -> Piece {
        Piece::from_letter(letter).unwrap()
    }

    #[test]
    fn test_parse_step_forms() {
        assert_eq!(
            parse_step("Ra1"),
            Some(Step::Place {
                piece: piece('R'),
                to: sq("a1")
            })
        );
        assert_eq!(
            parse_step("hb7n"),
            Some(Step::Slide {
                kind: PieceType::Horse,
                from: sq("b7"),
                dir: NORTH
            })
        );
        assert_eq!(parse_step("Rc3x"), Some(Step::Remove { from: sq("c3") }));
        assert_eq!(
            parse_step("Me4wx"),
            Some(Step::Slide {
                kind: PieceType::Camel,
                from: sq("e4"),
                dir: WEST
            })
        );

        assert_eq!(parse_step(""), None);
        assert_eq!(parse_step("Ra"), None);
        assert_eq!(parse_step("Xa1"), None);
        assert_eq!(parse_step("Ri1"), None);
        assert_eq!(parse_step("Ra9"), None);
        assert_eq!(parse_step("Ra1q"), None);
        assert_eq!(parse_step("Ra1nn"), None);
        assert_eq!(parse_step("Ra1nxx"), None);
    }

    #[test]
    fn test_freezing() {
        let mut board = Board::new();
        board.set(sq("d4"), piece('C'));
        board.set(sq("d5"), piece('m'));
        assert!(is_frozen(&board, sq("d4")), "lone cat next to camel");
        assert!(!is_frozen(&board, sq("d5")), "the stronger piece is free");

        // Friendly support unfreezes.
        board.set(sq("e4"), piece('R'));
        assert!(!is_frozen(&board, sq("d4")));

        // An equal-strength enemy does not freeze.
        let mut board = Board::new();
        board.set(sq("d4"), piece('C'));
        board.set(sq("d5"), piece('c'));
        assert!(!is_frozen(&board, sq("d4")));
    }

    #[test]
    fn test_can_slide_rabbit_direction() {
        let mut board = Board::new();
        board.set(sq("d4"), piece('R'));
        board.set(sq("e5"), piece('r'));
        assert!(can_slide(&board, Side::Gold, sq("d4"), NORTH));
        assert!(can_slide(&board, Side::Gold, sq("d4"), EAST));
        assert!(
            !can_slide(&board, Side::Gold, sq("d4"), SOUTH),
            "gold rabbit may not move south"
        );
        assert!(
            !can_slide(&board, Side::Silver, sq("e5"), NORTH),
            "silver rabbit may not move north"
        );
        assert!(can_slide(&board, Side::Silver, sq("e5"), SOUTH));
    }

    #[test]
    fn test_can_slide_rejects_wrong_side_and_occupied() {
        let mut board = Board::new();
        board.set(sq("d4"), piece('H'));
        board.set(sq("d5"), piece('D'));
        assert!(!can_slide(&board, Side::Silver, sq("d4"), EAST));
        assert!(!can_slide(&board, Side::Gold, sq("d4"), NORTH), "d5 occupied");
        assert!(!can_slide(&board, Side::Gold, sq("a8"), NORTH), "empty origin");
    }

    #[test]
    fn test_edge_slide_stays_on_board() {
        let mut board = Board::new();
        board.set(sq("a8"), piece('E'));
        assert!(!can_slide(&board, Side::Gold, sq("a8"), NORTH));
        assert!(!can_slide(&board, Side::Gold, sq("a8"), WEST));
        assert!(can_slide(&board, Side::Gold, sq("a8"), EAST));
    }

    #[test]
    fn test_trap_capture_on_lost_support() {
        // Rabbit on the c6 trap, horse support on b6. Moving the horse
        // north abandons the rabbit, which is removed at once.
        let mut board = Board::new();
        board.set(sq("c6"), piece('R'));
        board.set(sq("b6"), piece('H'));

        assert!(apply_token(&mut board, "Hb6n"));
        assert_eq!(board.get(sq("b7")), Some(piece('H')));
        assert_eq!(board.get(sq("b6")), None);
        assert_eq!(board.get(sq("c6")), None, "unsupported rabbit is captured");
    }

    #[test]
    fn test_trap_holds_with_support() {
        let mut board = Board::new();
        board.set(sq("c6"), piece('R'));
        board.set(sq("c7"), piece('H'));
        let removed = resolve_captures(&mut board);
        assert!(removed.is_empty());
        assert_eq!(board.get(sq("c6")), Some(piece('R')));

        // Enemy neighbors do not count as support.
        let mut board = Board::new();
        board.set(sq("c6"), piece('R'));
        board.set(sq("c7"), piece('h'));
        let removed = resolve_captures(&mut board);
        assert_eq!(removed.len(), 1);
        assert_eq!(board.get(sq("c6")), None);
    }

    #[test]
    fn test_apply_step_is_lenient_about_side() {
        // A silver token inside gold's turn (a pushed piece) replays fine.
        let mut board = Board::new();
        board.set(sq("d4"), piece('r'));
        assert!(apply_token(&mut board, "Rd4s"), "pushed rabbit moves backward");
        assert_eq!(board.get(sq("d3")), Some(piece('r')));
    }

    #[test]
    fn test_apply_step_noops() {
        let mut board = Board::new();
        board.set(sq("d4"), piece('R'));
        let before = board.clone();

        assert!(!apply_token(&mut board, "Hd4n"), "occupant kind mismatch");
        assert!(!apply_token(&mut board, "Re4n"), "empty origin");
        assert!(!apply_token(&mut board, "Rd4q"), "malformed direction");
        assert!(!apply_token(&mut board, "Rd5x"), "removal of empty square");
        board.set(sq("d5"), piece('c'));
        assert!(!apply_token(&mut board, "Rd4n"), "occupied target");
        board.clear(sq("d5"));
        assert_eq!(board, before, "no-ops leave the board untouched");
    }

    #[test]
    fn test_apply_place_and_remove() {
        let mut board = Board::new();
        assert!(apply_token(&mut board, "Ra1"));
        assert_eq!(board.get(sq("a1")), Some(piece('R')));
        assert!(!apply_token(&mut board, "Ha1"), "occupied placement");
        assert!(apply_token(&mut board, "Ra1x"));
        assert_eq!(board.get(sq("a1")), None);
    }

    #[test]
    fn test_push_tokens_and_board() {
        // Gold camel on d4 pushes the silver dog on d5 north to d6.
        let mut board = Board::new();
        board.set(sq("d4"), piece('M'));
        board.set(sq("d5"), piece('d'));

        let (next, tokens) = push(&board, Side::Gold, sq("d4"), sq("d5"), NORTH).unwrap();
        assert_eq!(tokens, ["Dd5n".to_string(), "Md4n".to_string()]);
        assert_eq!(next.get(sq("d6")), Some(piece('d')));
        assert_eq!(next.get(sq("d5")), Some(piece('M')));
        assert_eq!(next.get(sq("d4")), None);

        // Replaying the tokens reproduces the same board.
        apply_tokens(&mut board, &tokens);
        assert_eq!(board, next);
    }

    #[test]
    fn test_push_requires_strength_and_thaw() {
        let mut board = Board::new();
        board.set(sq("d4"), piece('D'));
        board.set(sq("d5"), piece('m'));
        assert!(
            push(&board, Side::Gold, sq("d4"), sq("d5"), NORTH).is_none(),
            "dog cannot push camel"
        );

        // Equal strength may push.
        let mut board = Board::new();
        board.set(sq("d4"), piece('D'));
        board.set(sq("d5"), piece('d'));
        assert!(push(&board, Side::Gold, sq("d4"), sq("d5"), NORTH).is_some());

        // A frozen pusher may not.
        board.set(sq("e4"), piece('e'));
        assert!(push(&board, Side::Gold, sq("d4"), sq("d5"), NORTH).is_none());
    }

    #[test]
    fn test_push_needs_empty_destination() {
        let mut board = Board::new();
        board.set(sq("d4"), piece('M'));
        board.set(sq("d5"), piece('d'));
        board.set(sq("d6"), piece('R'));
        assert!(push(&board, Side::Gold, sq("d4"), sq("d5"), NORTH).is_none());
        assert!(push(&board, Side::Gold, sq("d4"), sq("d5"), EAST).is_some());
    }

    #[test]
    fn test_pull_tokens_and_board() {
        // Gold horse on c4 steps west and drags the silver cat from c5.
        let mut board = Board::new();
        board.set(sq("c4"), piece('H'));
        board.set(sq("c5"), piece('c'));

        let (next, tokens) = pull(&board, Side::Gold, sq("c4"), sq("c5"), WEST).unwrap();
        assert_eq!(tokens, ["Hc4w".to_string(), "Cc5s".to_string()]);
        assert_eq!(next.get(sq("b4")), Some(piece('H')));
        assert_eq!(next.get(sq("c4")), Some(piece('c')));
        assert_eq!(next.get(sq("c5")), None);

        apply_tokens(&mut board, &tokens);
        assert_eq!(board, next);
    }

    #[test]
    fn test_pull_respects_rabbit_restriction() {
        // A gold rabbit may pull an enemy rabbit, but never by stepping
        // south itself.
        let mut board = Board::new();
        board.set(sq("d4"), piece('R'));
        board.set(sq("d5"), piece('r'));
        assert!(pull(&board, Side::Gold, sq("d4"), sq("d5"), SOUTH).is_none());
        assert!(pull(&board, Side::Gold, sq("d4"), sq("d5"), EAST).is_some());
    }

    #[test]
    fn test_compound_capture_mid_sequence() {
        // The pusher stands on the f3 trap with no friendly neighbor, so
        // the resolution after half-step one removes it before its own
        // half-step runs; the board and tokens must still agree with a
        // literal replay.
        let mut board = Board::new();
        board.set(sq("f3"), piece('M'));
        board.set(sq("f4"), piece('d'));

        let (next, tokens) = push(&board, Side::Gold, sq("f3"), sq("f4"), NORTH).unwrap();
        assert_eq!(next.get(sq("f3")), None, "pusher captured mid-compound");
        assert_eq!(next.get(sq("f5")), Some(piece('d')));
        assert_eq!(next.get(sq("f4")), None);

        apply_tokens(&mut board, &tokens);
        assert_eq!(board, next);
    }
}
