// src/movegen.rs
//! Vector-walking move generator. Produces, for both colors, the move table
//! and the set of attacked squares from a board, the side to move and the
//! current en passant square.

use log::trace;
use std::collections::BTreeSet;

use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::castling;
use crate::moves::{MoveKind, MoveTable};
use crate::tables::{is_promotion_square, step, BOARD_WIDTH, MOVE_VECTORS};

/// Output of one full generator pass, indexed by `Color::index`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveMaps {
    pub moves: [MoveTable; 2],
    pub attacked: [BTreeSet<Square>; 2],
}

impl MoveMaps {
    pub fn moves_for(&self, color: Color) -> &MoveTable {
        &self.moves[color.index()]
    }

    pub fn attacked_by(&self, color: Color) -> &BTreeSet<Square> {
        &self.attacked[color.index()]
    }
}

/// Runs the full pass: every occupied square, then castling injection.
pub fn generate(board: &Board, side_to_move: Color, en_passant: Option<Square>) -> MoveMaps {
    let mut maps = MoveMaps::default();

    for (square, piece) in board.occupied() {
        let table = &mut maps.moves[piece.color.index()];
        let attacked = &mut maps.attacked[piece.color.index()];
        match piece.kind {
            PieceKind::Pawn => walk_pawn(board, square, piece, side_to_move, en_passant, table, attacked),
            _ => walk_vectors(board, square, piece, table, attacked),
        }
    }

    // Castling depends on the opponent's finished attack set, so it runs last.
    castling::inject_castles(board, &mut maps);

    trace!(
        "generated {} white / {} black moves, {} / {} attacked squares",
        maps.moves[0].len(), maps.moves[1].len(), maps.attacked[0].len(), maps.attacked[1].len()
    );
    maps
}

/// Generic walk for kings, knights and sliders.
fn walk_vectors(
    board: &Board,
    origin: Square,
    piece: Piece,
    table: &mut MoveTable,
    attacked: &mut BTreeSet<Square>,
) {
    // Knights skip a blocked offset instead of abandoning the family.
    let leaps = piece.kind == PieceKind::Knight;

    for vector in &MOVE_VECTORS[&piece.kind] {
        for sign in [1, -1] {
            for &offset in vector {
                let Some(target) = step(origin, offset * sign) else {
                    if leaps { continue; }
                    break;
                };

                let occupant = board.piece_at(target);
                if occupant.is_some_and(|other| other.color == piece.color) {
                    if leaps { continue; }
                    break;
                }

                table.insert(origin, target, MoveKind::Neutral);
                attacked.insert(target);

                // A capture ends the ray
                if occupant.is_some() && !leaps {
                    break;
                }
            }
        }
    }
}

/// Pawns only walk forward. Pushes never capture; diagonals capture or guard.
fn walk_pawn(
    board: &Board,
    origin: Square,
    pawn: Piece,
    side_to_move: Color,
    en_passant: Option<Square>,
    table: &mut MoveTable,
    attacked: &mut BTreeSet<Square>,
) {
    let direction = pawn.color.pawn_direction();

    for vector in &MOVE_VECTORS[&PieceKind::Pawn] {
        for &offset in vector {
            let Some(target) = step(origin, offset * direction) else { break };

            let occupant = board.piece_at(target);
            if occupant.is_some_and(|other| other.color == pawn.color) {
                break;
            }

            if offset % BOARD_WIDTH == 0 {
                // Blocked pushes also block the double push behind them
                if occupant.is_some() {
                    break;
                }
                if offset == 2 * BOARD_WIDTH {
                    if pawn.has_moved {
                        continue;
                    }
                    table.insert(origin, target, MoveKind::EnPassantTrigger);
                } else {
                    insert_pawn_move(table, origin, target);
                }
                continue;
            }

            attacked.insert(target);
            match occupant {
                Some(_) => insert_pawn_move(table, origin, target),
                None if en_passant == Some(target) && pawn.color == side_to_move => {
                    table.insert(origin, target, MoveKind::EnPassantAttack);
                }
                None => {}
            }
        }
    }
}

/// Pawn arrivals on a back rank offer all four promotions instead of Neutral.
fn insert_pawn_move(table: &mut MoveTable, origin: Square, target: Square) {
    if is_promotion_square(target) {
        for kind in MoveKind::PROMOTIONS {
            table.insert(origin, target, kind);
        }
    } else {
        table.insert(origin, target, MoveKind::Neutral);
    }
}
