use crate::board::{Board, Color, Piece, PieceType, Square};
use crate::castling::{CastleSide, CastlingRights};
use crate::error::RulesError;
use crate::movegen::{Move, MoveGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
}

/// What `apply_move` did with the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move is complete and the turn has passed.
    Applied {
        captured: Option<Piece>,
        castled: Option<CastleSide>,
    },
    /// A pawn stands on its promotion row; the move finishes with
    /// [`GameState::resolve_promotion`].
    PendingPromotion {
        captured: Option<Piece>,
        square: Square,
        color: Color,
    },
}

/// The mutable game aggregate: board, castling rights, turn, captures and
/// check status. Replaced wholesale for a new game.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    rights: CastlingRights,
    side_to_move: Color,
    white_captured: Vec<Piece>,
    black_captured: Vec<Piece>,
    status: GameStatus,
    pending_promotion: Option<Square>,
    generator: MoveGenerator,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White)
    }

    /// Starts from an arbitrary position. Castling rights are inferred from
    /// which kings and rooks still stand on their home squares.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        let rights = CastlingRights::inferred(&board);
        let mut state = Self {
            board,
            rights,
            side_to_move,
            white_captured: Vec::new(),
            black_captured: Vec::new(),
            status: GameStatus::Ongoing,
            pending_promotion: None,
            generator: MoveGenerator::new(),
        };
        state.status = state.evaluate_status();
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn castling_rights(&self) -> &CastlingRights {
        &self.rights
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    /// Pieces of `color` that have been captured.
    pub fn captured(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.white_captured,
            Color::Black => &self.black_captured,
        }
    }

    /// Legal destinations for the piece on `from`.
    pub fn legal_moves(&self, from: Square) -> Vec<Square> {
        self.generator.legal_moves(&self.board, &self.rights, from)
    }

    pub fn has_any_escape(&self) -> bool {
        self.generator
            .has_any_escape(&self.board, &self.rights, self.side_to_move)
    }

    /// Executes a move the caller already knows to be legal; legality is not
    /// re-checked here. A pawn reaching its promotion row uses
    /// `promotion_choice`, or leaves the move pending when there is none.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion_choice: Option<PieceType>,
    ) -> Result<MoveOutcome, RulesError> {
        if let Some(square) = self.pending_promotion {
            return Err(RulesError::PromotionPending(square));
        }
        if let Some(choice) = promotion_choice {
            if !choice.is_promotion_choice() {
                return Err(RulesError::InvalidPromotion(choice));
            }
        }
        let piece = self
            .board
            .occupant(from)
            .ok_or(RulesError::EmptySquare(from))?;
        let color = piece.color;
        let mv = Move::new(from, to);
        let castled = mv.castle_side(&self.board);
        let promotes = mv.is_promotion(&self.board);

        if let Some(side) = castled {
            let row = from.row();
            self.board.relocate(
                Square::new(row, side.rook_home_col()),
                Square::new(row, side.rook_target_col()),
            );
            self.rights.mark_rook_moved(color, side);
        }

        match piece.piece_type {
            PieceType::King => self.rights.mark_king_moved(color),
            PieceType::Rook => self.rights.touch_rook_home(color, from),
            _ => {}
        }

        let captured = self.board.relocate(from, to);
        if let Some(victim) = captured {
            // A rook taken at home can no longer castle.
            self.rights.touch_rook_home(victim.color, to);
            match victim.color {
                Color::White => self.white_captured.push(victim),
                Color::Black => self.black_captured.push(victim),
            }
        }

        if promotes {
            self.pending_promotion = Some(to);
            return match promotion_choice {
                Some(choice) => {
                    self.resolve_promotion(choice)?;
                    Ok(MoveOutcome::Applied { captured, castled })
                }
                None => Ok(MoveOutcome::PendingPromotion {
                    captured,
                    square: to,
                    color,
                }),
            };
        }

        self.finish_turn();
        Ok(MoveOutcome::Applied { captured, castled })
    }

    /// Replaces the waiting pawn and completes the move.
    pub fn resolve_promotion(&mut self, piece_type: PieceType) -> Result<(), RulesError> {
        let square = self
            .pending_promotion
            .ok_or(RulesError::NoPendingPromotion)?;
        if !piece_type.is_promotion_choice() {
            return Err(RulesError::InvalidPromotion(piece_type));
        }
        self.board
            .place(square, Piece::new(self.side_to_move, piece_type));
        self.pending_promotion = None;
        self.finish_turn();
        Ok(())
    }

    fn finish_turn(&mut self) {
        self.side_to_move = self.side_to_move.opposite();
        self.status = self.evaluate_status();
    }

    fn evaluate_status(&self) -> GameStatus {
        if !self.generator.is_king_in_check(&self.board, self.side_to_move) {
            GameStatus::Ongoing
        } else if self.has_any_escape() {
            GameStatus::Check
        } else {
            GameStatus::Checkmate
        }
    }
}
