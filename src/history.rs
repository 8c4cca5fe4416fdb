// src/history.rs
//! Reversible move records and the undo operation.
//!
//! Each executed move pushes one `HistoryEntry`; `undo` pops it and replays its
//! actions backwards. An en passant capture is recorded as its own `Remove`
//! action, so it is restored like any other action without special casing.

use log::{debug, error};

use crate::board::{Board, Piece, Square};
use crate::error::MoveError;
use crate::game::GameState;
use crate::moves::Move;

/// One primitive board mutation performed while executing a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A piece went from `from` to `to`.
    Relocate {
        from: Square,
        to: Square,
        /// The moved piece's flag before the move.
        had_moved: bool,
        /// Whatever stood on `to` beforehand.
        captured: Option<Piece>,
        /// The pawn that was swapped out on `to` by a promotion.
        promoted_from: Option<Piece>,
    },
    /// A piece was lifted off the board without anything taking its place.
    Remove { square: Square, piece: Piece },
}

/// Everything needed to restore the position before one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    pub actions: Vec<Action>,
    pub en_passant_square: Option<Square>,
    pub king_squares: [Square; 2],
    pub scores: [u32; 2],
}

impl HistoryEntry {
    /// Records the pieces of derived state that undo restores wholesale.
    pub fn begin(mv: Move, en_passant_square: Option<Square>, king_squares: [Square; 2], scores: [u32; 2]) -> Self {
        HistoryEntry { mv, actions: Vec::with_capacity(2), en_passant_square, king_squares, scores }
    }

    /// Marks the primary relocation as a promotion of `pawn`.
    pub fn record_promotion(&mut self, pawn: Piece) {
        if let Some(Action::Relocate { promoted_from, .. }) = self.actions.first_mut() {
            *promoted_from = Some(pawn);
        }
    }

    /// Applies the inverse of every action, most recent first. The board is
    /// only written back once every action has found the piece it expects.
    pub fn revert(&self, board: &mut Board) -> Result<(), MoveError> {
        let mut restored = board.clone();
        for action in self.actions.iter().rev() {
            match *action {
                Action::Relocate { from, to, had_moved, captured, promoted_from } => {
                    if let Some(pawn) = promoted_from {
                        restored.put(to, pawn);
                    }
                    let mut piece = restored.take(to)
                        .ok_or(MoveError::MissingPiece { square: to, mv: self.mv })?;
                    piece.has_moved = had_moved;
                    restored.put(from, piece);
                    restored.set(to, captured);
                }
                Action::Remove { square, piece } => {
                    restored.put(square, piece);
                }
            }
        }
        *board = restored;
        Ok(())
    }
}

impl GameState {
    /// Reverts the most recent move. Returns false, changing nothing, when the
    /// history is empty or its last entry no longer matches the board. With
    /// `full_refresh` false the move tables are marked stale instead of being
    /// rebuilt; the next move request or `refresh` rebuilds them. This is the
    /// cheap path for backtracking many moves in a row.
    pub fn undo(&mut self, full_refresh: bool) -> bool {
        let Some(entry) = self.history.pop() else {
            return false;
        };

        if let Err(e) = entry.revert(&mut self.board) {
            error!("cannot undo {}: {}", entry.mv, e);
            self.history.push(entry);
            return false;
        }

        self.en_passant = entry.en_passant_square;
        self.king_squares = entry.king_squares;
        self.scores = entry.scores;
        self.side_to_move = self.side_to_move.opponent();

        if full_refresh {
            self.refresh();
        } else {
            self.stale = true;
        }
        debug!("undid {}, {} moves remain in history", entry.mv, self.history.len());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, PieceKind};
    use crate::moves::MoveKind;

    #[test]
    fn reverting_a_capture_restores_both_pieces() {
        let mut board = Board::empty();
        let mut rook = Piece::new(PieceKind::Rook, Color::White);
        let knight = Piece::new(PieceKind::Knight, Color::Black);
        board.put(62, knight);

        // Rook arrived on 62 from 98, capturing the knight
        rook.has_moved = true;
        board.put(62, rook);
        let mut entry = HistoryEntry::begin(Move::new(98, 62, MoveKind::Neutral), None, [102, 18], [3, 0]);
        entry.actions.push(Action::Relocate { from: 98, to: 62, had_moved: false, captured: Some(knight), promoted_from: None });

        entry.revert(&mut board).expect("consistent history");
        assert_eq!(board.piece_at(62), Some(knight));
        assert_eq!(board.piece_at(98), Some(Piece::new(PieceKind::Rook, Color::White)));
    }

    #[test]
    fn reverting_a_promotion_restores_the_pawn_verbatim() {
        let mut board = Board::empty();
        let mut pawn = Piece::new(PieceKind::Pawn, Color::White);
        pawn.has_moved = true;
        let mut queen = Piece::new(PieceKind::Queen, Color::White);
        queen.has_moved = true;
        board.put(15, queen);

        let mut entry = HistoryEntry::begin(Move::new(27, 15, MoveKind::QueenPromotion), None, [102, 18], [0, 0]);
        entry.actions.push(Action::Relocate { from: 27, to: 15, had_moved: true, captured: None, promoted_from: None });
        entry.record_promotion(pawn);

        entry.revert(&mut board).expect("consistent history");
        assert_eq!(board.piece_at(15), None);
        assert_eq!(board.piece_at(27), Some(pawn));
    }

    #[test]
    fn reverting_a_removal_puts_the_piece_back() {
        let mut board = Board::empty();
        let captured = Piece::new(PieceKind::Pawn, Color::Black);
        let mut entry = HistoryEntry::begin(Move::new(54, 43, MoveKind::EnPassantAttack), Some(43), [102, 18], [0, 0]);
        entry.actions.push(Action::Remove { square: 55, piece: captured });
        entry.revert(&mut board).expect("consistent history");
        assert_eq!(board.piece_at(55), Some(captured));
    }

    #[test]
    fn undo_on_an_empty_history_fails() {
        let mut game = GameState::with_seed(5);
        assert!(!game.undo(true));
        assert_eq!(game.current_player(), Color::White);
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn reverting_onto_an_empty_square_fails_without_touching_the_board() {
        let mut board = Board::empty();
        let pawn = Piece::new(PieceKind::Pawn, Color::Black);
        board.put(30, pawn);
        let mv = Move::new(90, 66, MoveKind::EnPassantTrigger);
        let mut entry = HistoryEntry::begin(mv, None, [102, 18], [0, 0]);
        entry.actions.push(Action::Relocate { from: 90, to: 66, had_moved: false, captured: None, promoted_from: None });
        entry.actions.push(Action::Remove { square: 55, piece: pawn });

        assert_eq!(entry.revert(&mut board), Err(MoveError::MissingPiece { square: 66, mv }));
        assert_eq!(board.occupied().count(), 1);
        assert_eq!(board.piece_at(55), None);
    }

    #[test]
    fn undo_keeps_an_entry_that_no_longer_fits() {
        let mut game = GameState::with_seed(5);
        let mut entry = HistoryEntry::begin(Move::new(90, 66, MoveKind::EnPassantTrigger), None, [102, 18], [0, 0]);
        entry.actions.push(Action::Relocate { from: 90, to: 66, had_moved: false, captured: None, promoted_from: None });
        game.history.push(entry);

        assert!(!game.undo(true));
        assert_eq!(game.history_len(), 1);
        assert_eq!(game.current_player(), Color::White);
        assert_eq!(game.board(), &Board::standard());
    }

    #[test]
    fn deferred_undo_marks_the_tables_stale_until_refreshed() {
        let mut game = GameState::with_seed(5);
        assert!(game.execute_move(90, 66, MoveKind::EnPassantTrigger));
        assert!(game.undo(false));
        assert!(game.is_stale());
        game.refresh();
        assert!(!game.is_stale());
        assert_eq!(game.legal_moves().len(), 20);
    }
}
