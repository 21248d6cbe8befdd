//! Arimaa-Rust: a rules and notation engine for the board game Arimaa.
//!
//! This crate provides the board model and movement rules of Arimaa, a
//! codec for the canonical `setposition` text protocol, a transcript
//! parser, and a bounded search that recovers the step sequence between
//! two position snapshots.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, trap squares, and step notation
//! - [`board`] - Sides, pieces, squares, the 64-cell board, and the
//!   presentation-layer move primitive
//! - [`codec`] - Board state to and from the canonical position protocol
//! - [`steps`] - Atomic step execution, freezing, push/pull compounds,
//!   and trap-capture resolution
//! - [`record`] - Transcript parsing into a turn tree, plus strict
//!   validation
//! - [`search`] - Breadth-first reconstruction of the 1-4 step sequence
//!   connecting two snapshots
//!
//! ## Example
//!
//! ```
//! use arimaa_rust::board::{Board, Side};
//! use arimaa_rust::{search, steps};
//!
//! // Apply one step to the opening position, then recover its notation
//! // from the two snapshots alone.
//! let before = Board::starting_array();
//! let mut after = before.clone();
//! steps::apply_token(&mut after, "Ee2n");
//!
//! let found = search::reconstruct(&before, &after, Side::Gold);
//! assert_eq!(found.as_deref(), Some("Ee2n"));
//! ```

pub mod board;
pub mod codec;
pub mod constants;
pub mod record;
pub mod search;
pub mod steps;
