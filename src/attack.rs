use crate::board::{Board, Color, Square};
use crate::movegen::MoveGenerator;

impl MoveGenerator {
    /// True if any piece of `by_color` attacks `square`.
    pub fn is_square_attacked(&self, board: &Board, square: Square, by_color: Color) -> bool {
        board
            .pieces_of(by_color)
            .any(|(from, _)| self.raw_attack_squares(board, from).contains(&square))
    }

    /// A board without a king of `color` is reported as not in check.
    pub fn is_king_in_check(&self, board: &Board, color: Color) -> bool {
        match board.find_king(color) {
            Some(king) => self.is_square_attacked(board, king, color.opposite()),
            None => false,
        }
    }
}
