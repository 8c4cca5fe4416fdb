// src/game.rs
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::error::{MoveError, SetupError};
use crate::history::HistoryEntry;
use crate::movegen::{self, MoveMaps};
use crate::moves::{Move, MoveKind, MoveTable};
use crate::tables::is_playable;

// --- Game State ---

/// One game: the board, derived move/attack maps and the undo stack.
///
/// Single owner, no interior locking. Every public operation either completes
/// or reports failure without touching any observable state.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) en_passant: Option<Square>,
    /// Always equals the square of each color's king, indexed by `Color::index`.
    pub(crate) king_squares: [Square; 2],
    /// Material captured so far by each side.
    pub(crate) scores: [u32; 2],
    pub(crate) maps: MoveMaps,
    pub(crate) history: Vec<HistoryEntry>,
    /// Set by a deferred undo; the maps describe a later position until `refresh`.
    pub(crate) stale: bool,
    rng: StdRng,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Starts a new game from the standard position, White to move.
    pub fn new() -> Self {
        Self::assemble(Board::standard(), Color::White, StdRng::from_os_rng())
    }

    /// Same as `new`, with a reproducible random-move generator.
    pub fn with_seed(seed: u64) -> Self {
        Self::assemble(Board::standard(), Color::White, StdRng::seed_from_u64(seed))
    }

    /// Builds a position from explicit (square, piece) pairs. Each color needs
    /// exactly one king. Pieces keep the `has_moved` flag they are given.
    pub fn from_placement(
        pieces: impl IntoIterator<Item = (Square, Piece)>,
        side_to_move: Color,
    ) -> Result<Self, SetupError> {
        let mut board = Board::empty();
        let mut seen = HashSet::new();

        for (square, piece) in pieces {
            if !is_playable(square) {
                return Err(SetupError::OffBoard(square));
            }
            if !seen.insert(square) {
                return Err(SetupError::DuplicateSquare(square));
            }
            board.put(square, piece);
        }

        for color in [Color::White, Color::Black] {
            let kings = board.occupied()
                .filter(|(_, p)| p.kind == PieceKind::King && p.color == color)
                .count();
            match kings {
                0 => return Err(SetupError::MissingKing(color)),
                1 => {}
                _ => return Err(SetupError::MultipleKings(color)),
            }
        }

        Ok(Self::assemble(board, side_to_move, StdRng::from_os_rng()))
    }

    fn assemble(board: Board, side_to_move: Color, rng: StdRng) -> Self {
        // Callers guarantee both kings exist; 0 is a sentinel cell and never a real square.
        let king_squares = [
            board.find_king(Color::White).unwrap_or(0),
            board.find_king(Color::Black).unwrap_or(0),
        ];
        let mut game = GameState {
            board,
            side_to_move,
            en_passant: None,
            king_squares,
            scores: [0, 0],
            maps: MoveMaps::default(),
            history: Vec::new(),
            stale: false,
            rng,
        };
        game.refresh();
        info!("new game, {} to move, {} moves available", game.side_to_move, game.legal_moves().len());
        game
    }

    /// Replaces the random-move generator, e.g. to replay a simulation.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // --- Read-Only Inspection ---

    pub fn current_player(&self) -> Color {
        self.side_to_move
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    /// Move table of one color, as of the last full refresh. After
    /// `undo(false)` this lags behind the board until `refresh` runs.
    pub fn moves(&self, color: Color) -> &MoveTable {
        self.maps.moves_for(color)
    }

    /// The side to move's move table: the legality oracle for `execute_move`.
    /// Move requests rebuild it first when a deferred undo left it stale.
    pub fn legal_moves(&self) -> &MoveTable {
        self.maps.moves_for(self.side_to_move)
    }

    pub fn attacked(&self, color: Color) -> &BTreeSet<Square> {
        self.maps.attacked_by(color)
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    pub fn score(&self, color: Color) -> u32 {
        self.scores[color.index()]
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// True when the color's king stands on a square the opponent attacks.
    /// The move tables themselves do not filter moves that expose the king.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.maps.attacked_by(color.opponent()).contains(&self.king_square(color))
    }

    /// The color whose king has been taken off the board, if any. Pseudo-legal
    /// play can capture a king; the game carries on and undo restores it.
    pub fn king_captured(&self) -> Option<Color> {
        [Color::White, Color::Black].into_iter().find(|&color| {
            !matches!(self.board.piece_at(self.king_square(color)),
                Some(p) if p.kind == PieceKind::King && p.color == color)
        })
    }

    /// True between a deferred undo and the next regeneration.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Recomputes both move tables and attacked sets from scratch.
    pub fn refresh(&mut self) {
        self.maps = movegen::generate(&self.board, self.side_to_move, self.en_passant);
        self.stale = false;
    }

    fn refresh_if_stale(&mut self) {
        if self.stale {
            self.refresh();
        }
    }

    // --- Public Move Execution Interface ---

    /// Executes the move if the exact triple is in the mover's table.
    /// Returns false, changing nothing, otherwise.
    pub fn execute_move(&mut self, origin: Square, destination: Square, kind: MoveKind) -> bool {
        self.try_execute_move(origin, destination, kind).is_ok()
    }

    /// Like `execute_move`, reporting why a request was refused.
    pub fn try_execute_move(&mut self, origin: Square, destination: Square, kind: MoveKind) -> Result<(), MoveError> {
        self.refresh_if_stale();
        if !self.legal_moves().contains(origin, destination, kind) {
            let error = match self.board.piece_at(origin) {
                None => MoveError::EmptySquare(origin),
                Some(piece) if piece.color != self.side_to_move => MoveError::NotPlayersTurn(origin),
                Some(_) => MoveError::NotInMoveTable { origin, destination, kind },
            };
            warn!("rejected move request: {}", error);
            return Err(error);
        }

        self.apply_move(Move::new(origin, destination, kind))
    }

    /// Executes an arbitrary entry of the mover's table using the game's own
    /// generator. Returns false when the mover has no moves.
    pub fn execute_random_move(&mut self) -> bool {
        self.refresh_if_stale();
        let picked = pick_random_move(self.maps.moves_for(self.side_to_move), &mut self.rng);
        self.execute_picked(picked)
    }

    /// Same as `execute_random_move` with a caller-supplied generator.
    pub fn execute_random_move_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.refresh_if_stale();
        let picked = pick_random_move(self.legal_moves(), rng);
        self.execute_picked(picked)
    }

    fn execute_picked(&mut self, picked: Option<Move>) -> bool {
        match picked {
            Some(mv) => match self.apply_move(mv) {
                Ok(()) => true,
                Err(e) => {
                    warn!("random move {} could not be applied: {}", mv, e);
                    false
                }
            },
            None => false,
        }
    }
}

/// Uniform choice over every (origin, destination, kind) triple.
fn pick_random_move<R: Rng + ?Sized>(table: &MoveTable, rng: &mut R) -> Option<Move> {
    let count = table.len();
    if count == 0 {
        return None;
    }
    table.iter().nth(rng.random_range(0..count))
}

// Display trait for printing the board and game state
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f, "Turn: {}", self.side_to_move)?;
        match self.en_passant {
            Some(square) => writeln!(f, "En Passant Target: {}", square)?,
            None => writeln!(f, "En Passant Target: -")?,
        }
        writeln!(f, "Captured material: White {} / Black {}",
            self.score(Color::White), self.score(Color::Black))?;
        write!(f, "Moves played: {}", self.history.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{BLACK_KING_START, WHITE_KING_START};

    fn piece(kind: PieceKind, color: Color) -> Piece {
        Piece::new(kind, color)
    }

    #[test]
    fn new_game_starts_with_white_and_twenty_moves() {
        let game = GameState::with_seed(1);
        assert_eq!(game.current_player(), Color::White);
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.history_len(), 0);
        assert_eq!(game.en_passant_square(), None);
        assert_eq!(game.king_square(Color::White), WHITE_KING_START);
        assert_eq!(game.king_square(Color::Black), BLACK_KING_START);
        assert!(!game.is_in_check(Color::White));
    }

    #[test]
    fn rejected_requests_name_the_reason() {
        let mut game = GameState::with_seed(1);
        assert_eq!(game.try_execute_move(66, 54, MoveKind::Neutral), Err(MoveError::EmptySquare(66)));
        assert_eq!(game.try_execute_move(30, 42, MoveKind::Neutral), Err(MoveError::NotPlayersTurn(30)));
        assert_eq!(
            game.try_execute_move(90, 66, MoveKind::Neutral),
            Err(MoveError::NotInMoveTable { origin: 90, destination: 66, kind: MoveKind::Neutral })
        );
        assert_eq!(game.history_len(), 0);
        assert_eq!(game.current_player(), Color::White);
    }

    #[test]
    fn placement_requires_one_king_each() {
        let only_white = [(WHITE_KING_START, piece(PieceKind::King, Color::White))];
        assert_eq!(
            GameState::from_placement(only_white, Color::White).err(),
            Some(SetupError::MissingKing(Color::Black))
        );

        let two_black = [
            (WHITE_KING_START, piece(PieceKind::King, Color::White)),
            (BLACK_KING_START, piece(PieceKind::King, Color::Black)),
            (14, piece(PieceKind::King, Color::Black)),
        ];
        assert_eq!(
            GameState::from_placement(two_black, Color::White).err(),
            Some(SetupError::MultipleKings(Color::Black))
        );
    }

    #[test]
    fn placement_rejects_sentinel_and_duplicate_squares() {
        let off_board = [(13, piece(PieceKind::Pawn, Color::White))];
        assert_eq!(GameState::from_placement(off_board, Color::White).err(), Some(SetupError::OffBoard(13)));

        let duplicate = [
            (50, piece(PieceKind::Pawn, Color::White)),
            (50, piece(PieceKind::Pawn, Color::Black)),
        ];
        assert_eq!(GameState::from_placement(duplicate, Color::White).err(), Some(SetupError::DuplicateSquare(50)));
    }

    #[test]
    fn check_is_read_from_the_attack_sets() {
        let mut rook = piece(PieceKind::Rook, Color::Black);
        rook.has_moved = true;
        let game = GameState::from_placement(
            [
                (WHITE_KING_START, piece(PieceKind::King, Color::White)),
                (BLACK_KING_START, piece(PieceKind::King, Color::Black)),
                (54, rook), // e5, on the e-file with the white king
            ],
            Color::White,
        ).expect("valid placement");
        assert!(game.is_in_check(Color::White));
        assert!(!game.is_in_check(Color::Black));
    }

    #[test]
    fn taking_the_king_is_reported_and_undone() {
        let mut game = GameState::from_placement(
            [
                (WHITE_KING_START, piece(PieceKind::King, Color::White)),
                (BLACK_KING_START, piece(PieceKind::King, Color::Black)),
                (54, piece(PieceKind::Rook, Color::Black)),
            ],
            Color::Black,
        ).expect("valid placement");
        assert_eq!(game.king_captured(), None);
        assert!(game.execute_move(54, WHITE_KING_START, MoveKind::Neutral));
        assert_eq!(game.king_captured(), Some(Color::White));
        assert!(game.undo(true));
        assert_eq!(game.king_captured(), None);
    }

    #[test]
    fn reseeding_replays_the_same_random_moves() {
        let mut first = GameState::with_seed(1);
        let mut second = GameState::with_seed(2);
        second.reseed(1);
        for _ in 0..10 {
            assert!(first.execute_random_move());
            assert!(second.execute_random_move());
        }
        assert_eq!(first.history(), second.history());
    }

    #[test]
    fn display_shows_turn_and_board() {
        let game = GameState::with_seed(3);
        let text = game.to_string();
        assert!(text.contains("Turn: White"));
        assert!(text.contains("r n b q k b n r"));
        assert!(text.contains("R N B Q K B N R"));
    }
}
