//! Minesweeper engine

pub mod board;

pub use board::{Board, BoardState, Cell, EndMark, MarkOutcome, RevealOutcome};

/// Lives a new board starts with
pub const DEFAULT_LIVES: u32 = 3;
