// src/error.rs
//! Error types for the rules core.
//!
//! Every failure here is reported before any state is touched, so a caller
//! that receives an error can rely on the game being exactly as it was.

use std::io;

use thiserror::Error;

use crate::board::{Color, Square};
use crate::moves::{Move, MoveKind};

/// Why a requested move was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on square {0}")]
    EmptySquare(Square),

    #[error("the piece on square {0} does not belong to the side to move")]
    NotPlayersTurn(Square),

    #[error("{origin} -> {destination} as {kind} is not in the mover's move table")]
    NotInMoveTable { origin: Square, destination: Square, kind: MoveKind },

    /// The board disagrees with the move or history record being applied.
    #[error("expected a piece on square {square} while handling {mv}")]
    MissingPiece { square: Square, mv: Move },
}

/// Problems with an explicit piece placement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("square {0} is not on the playable board")]
    OffBoard(Square),

    #[error("square {0} was given more than one piece")]
    DuplicateSquare(Square),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    MultipleKings(Color),
}

/// Failures while exporting a snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error with file '{0}': {1}")]
    Io(String, #[source] io::Error),
}
