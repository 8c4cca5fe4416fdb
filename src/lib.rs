// src/lib.rs
//! Mailbox chess rules core.
//!
//! A 12x10 mailbox board, a vector-walking move generator that also tracks
//! attacked squares, castling/en passant/promotion execution, and an exact
//! undo log. Square indices are the only addressing scheme; see `tables` for
//! the geometry.
//!
//! The move tables are pseudo-legal: castling is checked against attacked
//! squares, but ordinary moves that leave the mover's king attacked are still
//! listed. `GameState::is_in_check` lets a caller apply that filter itself.

pub mod board;
pub mod castling;
pub mod error;
mod execute;
pub mod game;
pub mod history;
pub mod movegen;
pub mod moves;
pub mod snapshot;
pub mod tables;

pub use board::{Board, Color, Piece, PieceKind, Square};
pub use error::{MoveError, SetupError, SnapshotError};
pub use game::GameState;
pub use history::{Action, HistoryEntry};
pub use moves::{Move, MoveKind, MoveTable};
pub use snapshot::Snapshot;
