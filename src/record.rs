//! Game transcript parsing and the turn tree.
//!
//! A transcript is a sequence of lines, one turn per line:
//!
//! ```text
//! 1w Ra1 Hb2
//! 1b ra7 hb7
//! 2w Hb2n Hb3n
//! ```
//!
//! [`parse`] is the lenient bulk entry point: unrecognized lines drop
//! with a warning and inapplicable tokens no-op, so one corrupt record
//! never aborts the rest of a transcript. [`validate`] is the strict
//! interactive entry point: it reports every syntactic problem as a
//! human-readable reason and only yields a tree for clean input. The two
//! deliberately disagree about malformed headers.
//!
//! Parsed turns form a tree rooted at a sentinel node (empty board, Gold
//! to move). The current parser only ever appends one linear chain of
//! main-line nodes, but the tree keeps parent links, child lists, and the
//! main-line flag so side variations have somewhere to live; branch
//! detection from move-number collisions is intentionally unimplemented.

use log::warn;

use crate::board::{Board, Piece, Side};
use crate::codec;
use crate::steps;

/// One turn of a parsed transcript.
#[derive(Debug, Clone)]
pub struct TurnNode {
    /// Move-number text as written. Kept opaque; nothing checks
    /// monotonicity.
    pub number: String,
    /// The side making this move (for the sentinel root, the side to
    /// move, which is Gold).
    pub side: Side,
    /// Step tokens in play order.
    pub tokens: Vec<String>,
    /// Canonical snapshot after the move, with the opponent to move.
    pub snapshot: String,
    /// Arena index of the parent; None only for the sentinel root.
    pub parent: Option<usize>,
    /// Arena indices of the children in insertion order.
    pub children: Vec<usize>,
    /// Whether this node lies on the principal continuation.
    pub main_line: bool,
}

/// A turn tree stored as an arena. Index 0 is always the sentinel root.
#[derive(Debug, Clone)]
pub struct GameTree {
    pub nodes: Vec<TurnNode>,
}

impl GameTree {
    fn new() -> GameTree {
        GameTree {
            nodes: vec![TurnNode {
                number: String::new(),
                side: Side::Gold,
                tokens: Vec::new(),
                snapshot: codec::encode(&Board::new(), Side::Gold),
                parent: None,
                children: Vec::new(),
                main_line: true,
            }],
        }
    }

    pub fn root(&self) -> &TurnNode {
        &self.nodes[0]
    }

    /// The principal continuation in play order, excluding the root.
    pub fn main_line(&self) -> Vec<&TurnNode> {
        let mut out = Vec::new();
        let mut at = 0;
        while let Some(&child) = self.nodes[at].children.first() {
            out.push(&self.nodes[child]);
            at = child;
        }
        out
    }

    fn push_child(&mut self, parent: usize, node: TurnNode) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.nodes[parent].children.push(idx);
        idx
    }
}

/// Normalize escaped newline sequences and CR/LF variants to plain line
/// feeds.
fn normalize(text: &str) -> String {
    text.replace("\\n", "\n")
        .replace("\\r", "\n")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Split a header token like `12w` into its number text and side. The
/// side letter is the final character: w/g Gold, b/s Silver, either
/// case. Returns None for headers under two characters or with an
/// unrecognized side letter.
fn parse_header(tok: &str) -> Option<(String, Side)> {
    let chars: Vec<char> = tok.chars().collect();
    if chars.len() < 2 {
        return None;
    }
    let side = Side::from_letter(*chars.last()?)?;
    Some((chars[..chars.len() - 1].iter().collect(), side))
}

/// Parse a transcript into a turn tree. Lenient: lines whose header is
/// unrecognizable are dropped with a warning, and each node's snapshot
/// is whatever the step engine makes of its tokens.
pub fn parse(transcript: &str) -> GameTree {
    let mut tree = GameTree::new();
    let mut tip = 0usize;

    for line in normalize(transcript).lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            continue;
        };
        let Some((number, side)) = parse_header(head) else {
            warn!("dropping transcript line with unrecognized header: {line}");
            continue;
        };
        let tokens: Vec<String> = parts.map(str::to_string).collect();

        let mut board = match codec::decode(&tree.nodes[tip].snapshot) {
            Ok((_, board)) => board,
            Err(_) => Board::new(),
        };
        steps::apply_tokens(&mut board, &tokens);

        let node = TurnNode {
            number,
            side,
            tokens,
            snapshot: codec::encode(&board, side.opponent()),
            parent: Some(tip),
            children: Vec::new(),
            main_line: true,
        };
        tip = tree.push_child(tip, node);
    }
    tree
}

/// Outcome of strict transcript validation.
#[derive(Debug)]
pub struct ValidationReport {
    pub valid: bool,
    /// Human-readable reasons, one per problem found.
    pub errors: Vec<String>,
    /// The parsed tree, present only when the transcript is clean.
    pub root: Option<GameTree>,
}

/// Strictly validate a raw transcript. Rejects empty input, headers
/// without a recognized side code, headers with zero step tokens, and
/// every syntactically illegal token. Never panics; problems come back
/// as readable reasons.
pub fn validate(transcript: &str) -> ValidationReport {
    let normalized = normalize(transcript);
    let mut errors = Vec::new();

    let lines: Vec<&str> = normalized
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        errors.push("transcript is empty".to_string());
    }

    for (num, line) in lines.iter().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            continue;
        };
        if parse_header(head).is_none() {
            errors.push(format!(
                "line {}: header '{}' has no recognized side code",
                num + 1,
                head
            ));
            continue;
        }
        let mut any = false;
        for tok in parts {
            any = true;
            if let Some(reason) = token_error(tok) {
                errors.push(format!("line {}: token '{}' {}", num + 1, tok, reason));
            }
        }
        if !any {
            errors.push(format!("line {}: move '{}' has no steps", num + 1, head));
        }
    }

    let valid = errors.is_empty();
    let root = valid.then(|| parse(transcript));
    ValidationReport {
        valid,
        errors,
        root,
    }
}

/// Why a step token is syntactically illegal, or None for a well-formed
/// token.
fn token_error(tok: &str) -> Option<String> {
    let chars: Vec<char> = tok.chars().collect();
    if !(3..=5).contains(&chars.len()) {
        return Some(format!("has length {}, expected 3 to 5", chars.len()));
    }
    if Piece::from_letter(chars[0]).is_none() {
        return Some("does not start with a piece letter".to_string());
    }
    if !('a'..='h').contains(&chars[1]) {
        if Piece::from_letter(chars[1]).is_some() {
            return Some("has two piece letters in succession".to_string());
        }
        return Some(format!("has file '{}' outside a-h", chars[1]));
    }
    if !('1'..='8').contains(&chars[2]) {
        return Some(format!("has rank '{}' outside 1-8", chars[2]));
    }
    if chars.len() >= 4 && !matches!(chars[3], 'n' | 's' | 'e' | 'w' | 'x') {
        return Some(format!("has direction '{}' outside n/s/e/w/x", chars[3]));
    }
    if chars.len() == 5 && chars[4] != 'x' {
        return Some(format!(
            "has trailing '{}' where only a capture marker is allowed",
            chars[4]
        ));
    }
    None
}
