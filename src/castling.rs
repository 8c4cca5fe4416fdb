// src/castling.rs
use std::collections::BTreeSet;

use crate::board::{Board, Color, PieceKind, Square};
use crate::movegen::MoveMaps;
use crate::moves::MoveKind;
use crate::tables::*;

/// Fixed geometry of one castle: both pieces' homes and landing squares,
/// the squares that must be empty, and the squares the king must not stand
/// on, cross or land on while attacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleRoute {
    pub kind: MoveKind,
    pub color: Color,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    pub between: &'static [Square],
    pub king_path: &'static [Square],
}

pub const WHITE_KING_SIDE: CastleRoute = CastleRoute {
    kind: MoveKind::WhiteKingSideCastle,
    color: Color::White,
    king_from: WHITE_KING_START,
    king_to: WHITE_KING_KS_CASTLE_DEST,
    rook_from: WHITE_KS_ROOK_START,
    rook_to: WHITE_KS_ROOK_DEST,
    between: &[103, 104],
    king_path: &[102, 103, 104],
};

pub const WHITE_QUEEN_SIDE: CastleRoute = CastleRoute {
    kind: MoveKind::WhiteQueenSideCastle,
    color: Color::White,
    king_from: WHITE_KING_START,
    king_to: WHITE_KING_QS_CASTLE_DEST,
    rook_from: WHITE_QS_ROOK_START,
    rook_to: WHITE_QS_ROOK_DEST,
    between: &[99, 100, 101],
    king_path: &[102, 101, 100],
};

pub const BLACK_KING_SIDE: CastleRoute = CastleRoute {
    kind: MoveKind::BlackKingSideCastle,
    color: Color::Black,
    king_from: BLACK_KING_START,
    king_to: BLACK_KING_KS_CASTLE_DEST,
    rook_from: BLACK_KS_ROOK_START,
    rook_to: BLACK_KS_ROOK_DEST,
    between: &[19, 20],
    king_path: &[18, 19, 20],
};

pub const BLACK_QUEEN_SIDE: CastleRoute = CastleRoute {
    kind: MoveKind::BlackQueenSideCastle,
    color: Color::Black,
    king_from: BLACK_KING_START,
    king_to: BLACK_KING_QS_CASTLE_DEST,
    rook_from: BLACK_QS_ROOK_START,
    rook_to: BLACK_QS_ROOK_DEST,
    between: &[15, 16, 17],
    king_path: &[18, 17, 16],
};

pub static CASTLE_ROUTES: [CastleRoute; 4] = [WHITE_KING_SIDE, WHITE_QUEEN_SIDE, BLACK_KING_SIDE, BLACK_QUEEN_SIDE];

/// Looks up the route for a castle tag. None for every other kind.
pub fn route_for(kind: MoveKind) -> Option<&'static CastleRoute> {
    CASTLE_ROUTES.iter().find(|route| route.kind == kind)
}

/// Checks the four castling conditions in order, stopping at the first failure.
/// `enemy_attacked` is the opponent's attacked-square set.
pub fn can_castle(board: &Board, route: &CastleRoute, enemy_attacked: &BTreeSet<Square>) -> bool {
    // 1. The king is home and has never moved
    let king_ready = board.piece_at(route.king_from).is_some_and(|p| {
        p.kind == PieceKind::King && p.color == route.color && !p.has_moved
    });
    if !king_ready {
        return false;
    }

    // 2. The rook is home and has never moved
    let rook_ready = board.piece_at(route.rook_from).is_some_and(|p| {
        p.kind == PieceKind::Rook && p.color == route.color && !p.has_moved
    });
    if !rook_ready {
        return false;
    }

    // 3. Nothing stands between them
    if route.between.iter().any(|&sq| board.piece_at(sq).is_some()) {
        return false;
    }

    // 4. The king does not castle out of, through or into an attack
    !route.king_path.iter().any(|sq| enemy_attacked.contains(sq))
}

pub fn white_king_side(board: &Board, black_attacked: &BTreeSet<Square>) -> bool {
    can_castle(board, &WHITE_KING_SIDE, black_attacked)
}

pub fn white_queen_side(board: &Board, black_attacked: &BTreeSet<Square>) -> bool {
    can_castle(board, &WHITE_QUEEN_SIDE, black_attacked)
}

pub fn black_king_side(board: &Board, white_attacked: &BTreeSet<Square>) -> bool {
    can_castle(board, &BLACK_KING_SIDE, white_attacked)
}

pub fn black_queen_side(board: &Board, white_attacked: &BTreeSet<Square>) -> bool {
    can_castle(board, &BLACK_QUEEN_SIDE, white_attacked)
}

/// Adds king-origin -> king-destination -> castle kind for every route that passes.
pub fn inject_castles(board: &Board, maps: &mut MoveMaps) {
    for route in CASTLE_ROUTES.iter() {
        let enemy_attacked = &maps.attacked[route.color.opponent().index()];
        if can_castle(board, route, enemy_attacked) {
            maps.moves[route.color.index()].insert(route.king_from, route.king_to, route.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn castle_ready() -> Board {
        let mut board = Board::empty();
        board.put(WHITE_KING_START, Piece::new(PieceKind::King, Color::White));
        board.put(WHITE_KS_ROOK_START, Piece::new(PieceKind::Rook, Color::White));
        board.put(WHITE_QS_ROOK_START, Piece::new(PieceKind::Rook, Color::White));
        board.put(BLACK_KING_START, Piece::new(PieceKind::King, Color::Black));
        board.put(BLACK_KS_ROOK_START, Piece::new(PieceKind::Rook, Color::Black));
        board.put(BLACK_QS_ROOK_START, Piece::new(PieceKind::Rook, Color::Black));
        board
    }

    #[test]
    fn all_four_castles_on_a_clear_board() {
        let board = castle_ready();
        let none = BTreeSet::new();
        assert!(white_king_side(&board, &none));
        assert!(white_queen_side(&board, &none));
        assert!(black_king_side(&board, &none));
        assert!(black_queen_side(&board, &none));
    }

    #[test]
    fn moved_king_or_rook_forfeits() {
        let mut board = castle_ready();
        let none = BTreeSet::new();
        if let Some(rook) = board.piece_at_mut(WHITE_KS_ROOK_START) {
            rook.has_moved = true;
        }
        assert!(!white_king_side(&board, &none));
        assert!(white_queen_side(&board, &none));

        if let Some(king) = board.piece_at_mut(BLACK_KING_START) {
            king.has_moved = true;
        }
        assert!(!black_king_side(&board, &none));
        assert!(!black_queen_side(&board, &none));
    }

    #[test]
    fn occupied_b_file_blocks_only_the_long_castle() {
        let mut board = castle_ready();
        board.put(99, Piece::new(PieceKind::Knight, Color::White));
        let none = BTreeSet::new();
        assert!(!white_queen_side(&board, &none));
        assert!(white_king_side(&board, &none));
    }

    #[test]
    fn attacked_path_squares_forbid_castling() {
        let board = castle_ready();
        let f1_attacked: BTreeSet<Square> = [103].into_iter().collect();
        assert!(!white_king_side(&board, &f1_attacked));
        assert!(white_queen_side(&board, &f1_attacked));

        let in_check: BTreeSet<Square> = [WHITE_KING_START].into_iter().collect();
        assert!(!white_king_side(&board, &in_check));
        assert!(!white_queen_side(&board, &in_check));

        // b1 only has to be empty, not safe
        let b1_attacked: BTreeSet<Square> = [99].into_iter().collect();
        assert!(white_queen_side(&board, &b1_attacked));
    }

    #[test]
    fn wrong_piece_on_the_rook_square_fails() {
        let mut board = castle_ready();
        board.put(BLACK_QS_ROOK_START, Piece::new(PieceKind::Queen, Color::Black));
        assert!(!black_queen_side(&board, &BTreeSet::new()));
    }

    #[test]
    fn routes_are_found_by_kind() {
        assert_eq!(route_for(MoveKind::BlackKingSideCastle).map(|r| r.rook_to), Some(BLACK_KS_ROOK_DEST));
        assert!(route_for(MoveKind::Neutral).is_none());
    }
}
