// src/moves.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::board::{Color, PieceKind, Square};

// --- Move Representation ---

/// Closed tag describing what a move does beyond relocating one piece.
/// Compared by identity only; the variants carry no ordering.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Neutral,
    EnPassantAttack,
    EnPassantTrigger,
    WhiteKingSideCastle,
    WhiteQueenSideCastle,
    BlackKingSideCastle,
    BlackQueenSideCastle,
    QueenPromotion,
    RookPromotion,
    BishopPromotion,
    KnightPromotion,
}

impl MoveKind {
    pub const PROMOTIONS: [MoveKind; 4] = [
        MoveKind::QueenPromotion, MoveKind::RookPromotion,
        MoveKind::BishopPromotion, MoveKind::KnightPromotion,
    ];

    /// The piece a promotion tag substitutes for the pawn.
    pub fn promotion_kind(&self) -> Option<PieceKind> {
        match self {
            MoveKind::QueenPromotion => Some(PieceKind::Queen),
            MoveKind::RookPromotion => Some(PieceKind::Rook),
            MoveKind::BishopPromotion => Some(PieceKind::Bishop),
            MoveKind::KnightPromotion => Some(PieceKind::Knight),
            _ => None,
        }
    }

    pub fn is_castle(&self) -> bool {
        self.castle_color().is_some()
    }

    pub fn castle_color(&self) -> Option<Color> {
        match self {
            MoveKind::WhiteKingSideCastle | MoveKind::WhiteQueenSideCastle => Some(Color::White),
            MoveKind::BlackKingSideCastle | MoveKind::BlackQueenSideCastle => Some(Color::Black),
            _ => None,
        }
    }

    /// Numeric code used by the console front end.
    pub fn code(&self) -> u8 {
        match self {
            MoveKind::Neutral => 0,
            MoveKind::EnPassantAttack => 1,
            MoveKind::EnPassantTrigger => 2,
            MoveKind::WhiteKingSideCastle => 3,
            MoveKind::WhiteQueenSideCastle => 4,
            MoveKind::BlackKingSideCastle => 5,
            MoveKind::BlackQueenSideCastle => 6,
            MoveKind::QueenPromotion => 7,
            MoveKind::RookPromotion => 8,
            MoveKind::BishopPromotion => 9,
            MoveKind::KnightPromotion => 10,
        }
    }

    pub fn from_code(code: u8) -> Option<MoveKind> {
        Some(match code {
            0 => MoveKind::Neutral,
            1 => MoveKind::EnPassantAttack,
            2 => MoveKind::EnPassantTrigger,
            3 => MoveKind::WhiteKingSideCastle,
            4 => MoveKind::WhiteQueenSideCastle,
            5 => MoveKind::BlackKingSideCastle,
            6 => MoveKind::BlackQueenSideCastle,
            7 => MoveKind::QueenPromotion,
            8 => MoveKind::RookPromotion,
            9 => MoveKind::BishopPromotion,
            10 => MoveKind::KnightPromotion,
            _ => return None,
        })
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub origin: Square,
    pub destination: Square,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(origin: Square, destination: Square, kind: MoveKind) -> Self {
        Move { origin, destination, kind }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} ({})", self.origin, self.destination, self.kind)
    }
}

// --- Move Table ---

/// origin -> destination -> applicable kinds, for one color.
///
/// Ordered maps keep iteration deterministic so seeded random play replays
/// exactly. Kinds at a destination are kept in insertion order without
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveTable {
    entries: BTreeMap<Square, BTreeMap<Square, Vec<MoveKind>>>,
}

impl MoveTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, origin: Square, destination: Square, kind: MoveKind) {
        let kinds = self.entries.entry(origin).or_default().entry(destination).or_default();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    pub fn contains(&self, origin: Square, destination: Square, kind: MoveKind) -> bool {
        self.kinds(origin, destination).contains(&kind)
    }

    /// Kinds offered for one (origin, destination) pair; empty when absent.
    pub fn kinds(&self, origin: Square, destination: Square) -> &[MoveKind] {
        self.entries
            .get(&origin)
            .and_then(|targets| targets.get(&destination))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Destinations reachable from one origin, ascending.
    pub fn destinations(&self, origin: Square) -> impl Iterator<Item = Square> + '_ {
        self.entries.get(&origin).into_iter().flat_map(|targets| targets.keys().copied())
    }

    pub fn origins(&self) -> impl Iterator<Item = Square> + '_ {
        self.entries.keys().copied()
    }

    /// Every (origin, destination, kind) triple in the table.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.entries.iter().flat_map(|(&origin, targets)| {
            targets.iter().flat_map(move |(&destination, kinds)| {
                kinds.iter().map(move |&kind| Move::new(origin, destination, kind))
            })
        })
    }

    /// Number of distinct triples.
    pub fn len(&self) -> usize {
        self.entries.values().flat_map(|targets| targets.values()).map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
