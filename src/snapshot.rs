// src/snapshot.rs
use serde::{Deserialize, Serialize};
use std::fs;

use crate::board::{Color, Piece, Square};
use crate::error::SnapshotError;
use crate::game::GameState;
use crate::moves::Move;

/// Serializable view of a position, for saving or handing to other tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub side_to_move: Color,
    pub en_passant_square: Option<Square>,
    pub white_king: Square,
    pub black_king: Square,
    pub white_score: u32,
    pub black_score: u32,
    pub moves_played: usize,
    pub pieces: Vec<(Square, Piece)>,
    pub legal_moves: Vec<Move>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, filename: &str) -> Result<(), SnapshotError> {
        let json_data = self.to_json()?;
        fs::write(filename, json_data)
            .map_err(|e| SnapshotError::Io(filename.to_string(), e))?;
        Ok(())
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            side_to_move: self.current_player(),
            en_passant_square: self.en_passant_square(),
            white_king: self.king_square(Color::White),
            black_king: self.king_square(Color::Black),
            white_score: self.score(Color::White),
            black_score: self.score(Color::Black),
            moves_played: self.history_len(),
            pieces: self.board().occupied().collect(),
            legal_moves: self.legal_moves().iter().collect(),
        }
    }
}
