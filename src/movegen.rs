use crate::board::{Board, Color, Piece, PieceType, Square};
use crate::castling::{CastleSide, CastlingRights, KING_HOME_COL};

/// A candidate move. Castling and promotion are implied by the board: a king
/// travelling two columns castles, a pawn reaching the far row promotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub fn castle_side(&self, board: &Board) -> Option<CastleSide> {
        match board.occupant(self.from) {
            Some(piece) if piece.piece_type == PieceType::King => {
                CastleSide::from_king_move(self.from, self.to)
            }
            _ => None,
        }
    }

    pub fn is_promotion(&self, board: &Board) -> bool {
        board.occupant(self.from).map_or(false, |piece| {
            piece.piece_type == PieceType::Pawn && self.to.row() == piece.color.promotion_row()
        })
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];

/// Per-piece movement rules over a board snapshot. Never mutates the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Moves of the piece on `from` ignoring self-check, with castling
    /// appended for kings. Empty if the square is empty.
    pub fn pseudo_legal_moves(
        &self,
        board: &Board,
        rights: &CastlingRights,
        from: Square,
    ) -> Vec<Square> {
        let piece = match board.occupant(from) {
            Some(piece) => piece,
            None => return Vec::new(),
        };
        let mut moves = self.piece_moves(board, from, piece, false);
        if piece.piece_type == PieceType::King {
            moves.extend(self.castling_moves(board, rights, from, piece.color));
        }
        moves
    }

    /// Squares the piece on `from` attacks. Shares the movement rules with
    /// [`pseudo_legal_moves`](Self::pseudo_legal_moves) but never castles, and
    /// pawns count their diagonals whether or not an enemy stands there.
    pub fn raw_attack_squares(&self, board: &Board, from: Square) -> Vec<Square> {
        match board.occupant(from) {
            Some(piece) => self.piece_moves(board, from, piece, true),
            None => Vec::new(),
        }
    }

    fn piece_moves(&self, board: &Board, from: Square, piece: Piece, attacks: bool) -> Vec<Square> {
        match piece.piece_type {
            PieceType::Pawn if attacks => self.pawn_attacks(board, from, piece.color),
            PieceType::Pawn => self.pawn_moves(board, from, piece.color),
            PieceType::Knight => self.step_moves(board, from, piece.color, &KNIGHT_OFFSETS),
            PieceType::King => self.step_moves(board, from, piece.color, &KING_OFFSETS),
            PieceType::Rook => self.sliding_moves(board, from, piece.color, &ROOK_DIRECTIONS),
            PieceType::Bishop => self.sliding_moves(board, from, piece.color, &BISHOP_DIRECTIONS),
            PieceType::Queen => {
                let mut moves = self.sliding_moves(board, from, piece.color, &ROOK_DIRECTIONS);
                moves.extend(self.sliding_moves(board, from, piece.color, &BISHOP_DIRECTIONS));
                moves
            }
        }
    }

    fn pawn_moves(&self, board: &Board, from: Square, color: Color) -> Vec<Square> {
        let mut moves = Vec::new();
        let forward = color.forward();

        if let Some(one) = from.offset(forward, 0) {
            if board.is_empty(one) {
                moves.push(one);
                if from.row() == color.pawn_row() {
                    if let Some(two) = from.offset(2 * forward, 0) {
                        if board.is_empty(two) {
                            moves.push(two);
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            if let Some(target) = from.offset(forward, dc) {
                if board.occupant(target).map_or(false, |p| p.color != color) {
                    moves.push(target);
                }
            }
        }
        moves
    }

    fn pawn_attacks(&self, board: &Board, from: Square, color: Color) -> Vec<Square> {
        [-1, 1]
            .iter()
            .filter_map(|&dc| from.offset(color.forward(), dc))
            .filter(|&target| board.occupant(target).map_or(true, |p| p.color != color))
            .collect()
    }

    fn step_moves(&self, board: &Board, from: Square, color: Color, offsets: &[(i8, i8)]) -> Vec<Square> {
        offsets
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&target| board.occupant(target).map_or(true, |p| p.color != color))
            .collect()
    }

    fn sliding_moves(&self, board: &Board, from: Square, color: Color, directions: &[(i8, i8)]) -> Vec<Square> {
        let mut moves = Vec::new();
        for &(dr, dc) in directions {
            let mut current = from;
            while let Some(target) = current.offset(dr, dc) {
                match board.occupant(target) {
                    None => moves.push(target),
                    Some(blocker) => {
                        if blocker.color != color {
                            moves.push(target);
                        }
                        break;
                    }
                }
                current = target;
            }
        }
        moves
    }

    fn castling_moves(
        &self,
        board: &Board,
        rights: &CastlingRights,
        from: Square,
        color: Color,
    ) -> Vec<Square> {
        let row = color.home_row();
        let enemy = color.opposite();
        let mut moves = Vec::new();

        if from != Square::new(row, KING_HOME_COL) {
            return moves;
        }
        // No castling out of check.
        if self.is_square_attacked(board, from, enemy) {
            return moves;
        }

        for side in CastleSide::BOTH {
            if !rights.may_castle(color, side) {
                continue;
            }
            let rook_home = Square::new(row, side.rook_home_col());
            if board.occupant(rook_home) != Some(Piece::new(color, PieceType::Rook)) {
                continue;
            }
            let path_clear = side
                .between_cols()
                .iter()
                .all(|&col| board.is_empty(Square::new(row, col)));
            if !path_clear {
                continue;
            }
            let transit_safe = side
                .transit_cols()
                .iter()
                .all(|&col| !self.is_square_attacked(board, Square::new(row, col), enemy));
            if transit_safe {
                moves.push(Square::new(row, side.king_target_col()));
            }
        }
        moves
    }
}
