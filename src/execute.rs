// src/execute.rs
use log::debug;

use crate::board::{Color, Piece, PieceKind, Square};
use crate::castling;
use crate::error::MoveError;
use crate::game::GameState;
use crate::history::{Action, HistoryEntry};
use crate::moves::{Move, MoveKind};
use crate::tables::BOARD_WIDTH;

impl GameState {
    /// Applies a move that the caller has already validated against the
    /// mover's table. Records one history entry and regenerates the maps.
    /// On failure nothing is recorded and the position is left as it was.
    pub(crate) fn apply_move(&mut self, mv: Move) -> Result<(), MoveError> {
        let mover = self.side_to_move;
        let mut entry = HistoryEntry::begin(mv, self.en_passant, self.king_squares, self.scores);
        let board_before = self.board.clone();

        if let Err(error) = self.perform(mv, mover, &mut entry) {
            self.board = board_before;
            self.en_passant = entry.en_passant_square;
            self.king_squares = entry.king_squares;
            self.scores = entry.scores;
            return Err(error);
        }

        // 5. Switch turn, 6. record, 7. regenerate
        self.side_to_move = mover.opponent();
        self.history.push(entry);
        self.refresh();

        debug!("{} played {}, {} now has {} moves", mover, mv, self.side_to_move, self.legal_moves().len());
        Ok(())
    }

    /// Board mutations of one move, stopping at the first missing piece.
    fn perform(&mut self, mv: Move, mover: Color, entry: &mut HistoryEntry) -> Result<(), MoveError> {
        // 1. Move the main piece (2. the king cache follows inside relocate)
        self.relocate(mv.origin, mv.destination, entry)?;

        // 3. The en passant window only lasts one move
        self.en_passant = None;

        // 4. Secondary effects
        match mv.kind {
            MoveKind::WhiteKingSideCastle
            | MoveKind::WhiteQueenSideCastle
            | MoveKind::BlackKingSideCastle
            | MoveKind::BlackQueenSideCastle => {
                if let Some(route) = castling::route_for(mv.kind) {
                    self.relocate(route.rook_from, route.rook_to, entry)?;
                }
            }
            MoveKind::EnPassantAttack => {
                // The captured pawn sits one rank behind the landing square
                let victim_square = (mv.destination as i16 - BOARD_WIDTH * mover.pawn_direction()) as Square;
                let victim = self.board.take(victim_square)
                    .ok_or(MoveError::MissingPiece { square: victim_square, mv })?;
                self.credit_capture(mover, victim);
                entry.actions.push(Action::Remove { square: victim_square, piece: victim });
            }
            MoveKind::EnPassantTrigger => {
                self.en_passant = Some((mv.origin + mv.destination) / 2);
            }
            MoveKind::QueenPromotion
            | MoveKind::RookPromotion
            | MoveKind::BishopPromotion
            | MoveKind::KnightPromotion => {
                if let Some(kind) = mv.kind.promotion_kind() {
                    self.promote(mv.destination, kind, mover, entry)?;
                }
            }
            MoveKind::Neutral => {}
        }
        Ok(())
    }

    /// Moves whatever stands on `from` to `to`, marking it moved and recording
    /// the relocation with its prior flag and any capture.
    fn relocate(&mut self, from: Square, to: Square, entry: &mut HistoryEntry) -> Result<(), MoveError> {
        let mut piece = self.board.take(from)
            .ok_or(MoveError::MissingPiece { square: from, mv: entry.mv })?;
        let had_moved = piece.has_moved;
        piece.has_moved = true;

        let captured = self.board.put(to, piece);
        if let Some(victim) = captured {
            self.credit_capture(piece.color, victim);
        }
        if piece.kind == PieceKind::King {
            self.king_squares[piece.color.index()] = to;
        }

        entry.actions.push(Action::Relocate { from, to, had_moved, captured, promoted_from: None });
        Ok(())
    }

    /// Swaps the pawn on `square` for a fresh piece of `kind`.
    fn promote(&mut self, square: Square, kind: PieceKind, color: Color, entry: &mut HistoryEntry) -> Result<(), MoveError> {
        let mut promoted = Piece::new(kind, color);
        promoted.has_moved = true;
        let pawn = self.board.put(square, promoted)
            .ok_or(MoveError::MissingPiece { square, mv: entry.mv })?;
        entry.record_promotion(pawn);
        Ok(())
    }

    fn credit_capture(&mut self, capturer: Color, victim: Piece) {
        let score = &mut self.scores[capturer.index()];
        *score = score.saturating_add(victim.value);
    }
}
