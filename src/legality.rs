use crate::board::{Board, Color, PieceType, Square};
use crate::castling::CastlingRights;
use crate::movegen::{Move, MoveGenerator};

impl MoveGenerator {
    /// Keeps the destinations that do not leave `color`'s king attacked.
    ///
    /// Each candidate is played as a plain relocation on a scratch board. A
    /// castling rook stays on its corner.
    pub fn filter_self_check(
        &self,
        board: &Board,
        color: Color,
        from: Square,
        candidates: &[Square],
    ) -> Vec<Square> {
        candidates
            .iter()
            .copied()
            .filter(|&to| {
                let mut scratch = board.clone();
                scratch.relocate(from, to);
                !self.is_king_in_check(&scratch, color)
            })
            .collect()
    }

    /// Legal destinations of the piece on `from`.
    pub fn legal_moves(&self, board: &Board, rights: &CastlingRights, from: Square) -> Vec<Square> {
        let color = match board.occupant(from) {
            Some(piece) => piece.color,
            None => return Vec::new(),
        };
        let candidates = self.pseudo_legal_moves(board, rights, from);
        self.filter_self_check(board, color, from, &candidates)
    }

    /// Every legal move of `color`.
    pub fn generate_moves(&self, board: &Board, rights: &CastlingRights, color: Color) -> Vec<Move> {
        board
            .pieces_of(color)
            .flat_map(|(from, _)| {
                self.legal_moves(board, rights, from)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// Whether `color` has at least one legal move. The king is tried first
    /// since stepping away is the most common escape.
    pub fn has_any_escape(&self, board: &Board, rights: &CastlingRights, color: Color) -> bool {
        if let Some(king) = board.find_king(color) {
            if !self.legal_moves(board, rights, king).is_empty() {
                return true;
            }
        }
        board
            .pieces_of(color)
            .filter(|(_, piece)| piece.piece_type != PieceType::King)
            .any(|(from, _)| !self.legal_moves(board, rights, from).is_empty())
    }
}
