// src/tables.rs
//! Process-wide constant data: mailbox geometry, per-kind offset vectors and
//! the castling squares. Built once on first use and shared read-only.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::board::{PieceKind, Square};

// --- Mailbox Geometry ---
// 12 columns x 10 rows. Row 1 is rank 8 (Black's back rank), row 8 is rank 1.
// Columns 0, 1, 10, 11 and rows 0, 9 are permanently empty sentinels.
pub const BOARD_WIDTH: i16 = 12;
pub const BOARD_HEIGHT: i16 = 10;
pub const BOARD_CELLS: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;

pub const FIRST_ROW: u8 = 1;
pub const LAST_ROW: u8 = 8;
pub const FIRST_COLUMN: u8 = 2;
pub const LAST_COLUMN: u8 = 9;

// Material values. The king's value is a sentinel so it never reads as a trade.
pub const PAWN_VALUE: u32 = 1;
pub const KNIGHT_VALUE: u32 = 3;
pub const BISHOP_VALUE: u32 = 3;
pub const ROOK_VALUE: u32 = 5;
pub const QUEEN_VALUE: u32 = 9;
pub const KING_VALUE: u32 = u32::MAX;

// Square indices for castling
pub const WHITE_KING_START: Square = 102; // e1
pub const WHITE_KS_ROOK_START: Square = 105; // h1
pub const WHITE_QS_ROOK_START: Square = 98; // a1
pub const WHITE_KING_KS_CASTLE_DEST: Square = 104; // g1
pub const WHITE_KING_QS_CASTLE_DEST: Square = 100; // c1
pub const WHITE_KS_ROOK_DEST: Square = 103; // f1
pub const WHITE_QS_ROOK_DEST: Square = 101; // d1

pub const BLACK_KING_START: Square = 18; // e8
pub const BLACK_KS_ROOK_START: Square = 21; // h8
pub const BLACK_QS_ROOK_START: Square = 14; // a8
pub const BLACK_KING_KS_CASTLE_DEST: Square = 20; // g8
pub const BLACK_KING_QS_CASTLE_DEST: Square = 16; // c8
pub const BLACK_KS_ROOK_DEST: Square = 19; // f8
pub const BLACK_QS_ROOK_DEST: Square = 17; // d8

lazy_static! {
    /// Unsigned offset families per piece kind. Each family is walked with
    /// both signs; sliders list successive multiples of the unit step.
    pub static ref MOVE_VECTORS: HashMap<PieceKind, Vec<Vec<i16>>> = build_move_vectors();
    pub static ref PLAYABLE_SQUARES: HashSet<Square> = build_playable_squares();
    pub static ref PROMOTION_SQUARES: HashSet<Square> = build_promotion_squares();
}

fn ray(step: i16) -> Vec<i16> {
    (1..=7).map(|n| n * step).collect()
}

fn build_move_vectors() -> HashMap<PieceKind, Vec<Vec<i16>>> {
    let horizontal = 1;
    let vertical = BOARD_WIDTH;
    let diagonal_1 = BOARD_WIDTH - 1;
    let diagonal_2 = BOARD_WIDTH + 1;

    let mut vectors = HashMap::new();
    vectors.insert(PieceKind::King, vec![vec![horizontal], vec![vertical], vec![diagonal_1], vec![diagonal_2]]);
    vectors.insert(PieceKind::Queen, vec![ray(horizontal), ray(vertical), ray(diagonal_1), ray(diagonal_2)]);
    vectors.insert(PieceKind::Rook, vec![ray(horizontal), ray(vertical)]);
    vectors.insert(PieceKind::Bishop, vec![ray(diagonal_1), ray(diagonal_2)]);
    vectors.insert(PieceKind::Knight, vec![vec![10], vec![14], vec![23], vec![25]]);
    vectors.insert(PieceKind::Pawn, vec![vec![vertical, 2 * vertical], vec![diagonal_1], vec![diagonal_2]]);
    vectors
}

fn build_playable_squares() -> HashSet<Square> {
    let mut squares = HashSet::with_capacity(64);
    for row in FIRST_ROW..=LAST_ROW {
        for column in FIRST_COLUMN..=LAST_COLUMN {
            squares.insert(square_at(row, column));
        }
    }
    squares
}

fn build_promotion_squares() -> HashSet<Square> {
    (FIRST_COLUMN..=LAST_COLUMN)
        .flat_map(|column| [square_at(FIRST_ROW, column), square_at(LAST_ROW, column)])
        .collect()
}

// --- Index Helpers ---

/// Mailbox index of a (row, column) pair.
#[inline(always)]
pub fn square_at(row: u8, column: u8) -> Square {
    row * BOARD_WIDTH as u8 + column
}

#[inline(always)]
pub fn row_of(square: Square) -> u8 {
    square / BOARD_WIDTH as u8
}

#[inline(always)]
pub fn column_of(square: Square) -> u8 {
    square % BOARD_WIDTH as u8
}

/// Steps `delta` cells from `square`. Returns None when the result lands on a
/// sentinel cell or outside the array altogether.
#[inline(always)]
pub fn step(square: Square, delta: i16) -> Option<Square> {
    let target = square as i16 + delta;
    u8::try_from(target).ok().filter(|sq| PLAYABLE_SQUARES.contains(sq))
}

#[inline(always)]
pub fn is_playable(square: Square) -> bool {
    PLAYABLE_SQUARES.contains(&square)
}

#[inline(always)]
pub fn is_promotion_square(square: Square) -> bool {
    PROMOTION_SQUARES.contains(&square)
}
