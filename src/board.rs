// src/board.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tables::{
    square_at, BISHOP_VALUE, BOARD_CELLS, FIRST_COLUMN, FIRST_ROW, KING_VALUE, KNIGHT_VALUE,
    LAST_COLUMN, LAST_ROW, PAWN_VALUE, QUEEN_VALUE, ROOK_VALUE,
};

/// Linear index into the mailbox. Only members of the playable set hold pieces.
pub type Square = u8;

// --- Enums and Basic Structs ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }
    pub fn index(&self) -> usize { // Helper for per-color arrays
        match self { Color::White => 0, Color::Black => 1 }
    }
    /// Sign applied to pawn offsets. White starts on the high indices and advances toward 0.
    pub fn pawn_direction(&self) -> i16 {
        match self { Color::White => -1, Color::Black => 1 }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Color::White => write!(f, "White"), Color::Black => write!(f, "Black") }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceKind { King, Queen, Rook, Bishop, Knight, Pawn }

impl PieceKind {
    pub fn value(&self) -> u32 {
        match self {
            PieceKind::Pawn => PAWN_VALUE, PieceKind::Knight => KNIGHT_VALUE, PieceKind::Bishop => BISHOP_VALUE,
            PieceKind::Rook => ROOK_VALUE, PieceKind::Queen => QUEEN_VALUE, PieceKind::King => KING_VALUE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub value: u32,
    /// Sole source of truth for double-push and castling eligibility.
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color, value: kind.value(), has_moved: false }
    }

    pub fn symbol(&self) -> char {
        let symbol = match self.kind {
            PieceKind::Pawn => 'p', PieceKind::Knight => 'n', PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r', PieceKind::Queen => 'q', PieceKind::King => 'k',
        };
        match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// --- Mailbox Board ---

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook, PieceKind::Knight, PieceKind::Bishop, PieceKind::Queen,
    PieceKind::King, PieceKind::Bishop, PieceKind::Knight, PieceKind::Rook,
];

/// Fixed 12x10 grid. Every piece is owned by exactly one cell; relocating a
/// piece is a `take` followed by a `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; BOARD_CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Board { cells: [None; BOARD_CELLS] }
    }
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the standard starting position.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for (offset, kind) in BACK_RANK.iter().enumerate() {
            let column = FIRST_COLUMN + offset as u8;
            board.put(square_at(FIRST_ROW, column), Piece::new(*kind, Color::Black));
            board.put(square_at(FIRST_ROW + 1, column), Piece::new(PieceKind::Pawn, Color::Black));
            board.put(square_at(LAST_ROW - 1, column), Piece::new(PieceKind::Pawn, Color::White));
            board.put(square_at(LAST_ROW, column), Piece::new(*kind, Color::White));
        }
        board
    }

    /// Gets the piece at a square. Indices outside the array read as empty.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells.get(square as usize).copied().flatten()
    }

    #[inline(always)]
    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.cells.get_mut(square as usize).and_then(Option::as_mut)
    }

    /// Removes and returns whatever occupies the square.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.cells.get_mut(square as usize).and_then(Option::take)
    }

    /// Places a piece, returning the previous occupant (the capture, if any).
    #[inline(always)]
    pub fn put(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.set(square, Some(piece))
    }

    /// Overwrites the cell with `contents`, returning what was there.
    pub fn set(&mut self, square: Square, contents: Option<Piece>) -> Option<Piece> {
        match self.cells.get_mut(square as usize) {
            Some(cell) => std::mem::replace(cell, contents),
            None => None,
        }
    }

    /// Iterates over occupied squares in ascending index order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate()
            .filter_map(|(index, cell)| cell.map(|piece| (index as Square, piece)))
    }

    /// Finds the king's square for a color. Returns None if the king is missing.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.occupied()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.color == color)
            .map(|(square, _)| square)
    }

    /// Sum of material values for one side, kings excluded.
    pub fn material(&self, color: Color) -> u32 {
        self.occupied()
            .filter(|(_, piece)| piece.color == color && piece.kind != PieceKind::King)
            .map(|(_, piece)| piece.value)
            .sum()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "      +-----------------+")?;
        for row in FIRST_ROW..=LAST_ROW {
            let rank = LAST_ROW - row + 1;
            write!(f, "{:>3} {} | ", square_at(row, FIRST_COLUMN), rank)?;
            for column in FIRST_COLUMN..=LAST_COLUMN {
                match self.piece_at(square_at(row, column)) {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "      +-----------------+")?;
        write!(f, "        a b c d e f g h")
    }
}
