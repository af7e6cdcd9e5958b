use crate::board::{PieceType, Square};
use thiserror::Error;

/// Ways the rules engine can be misused.
///
/// Illegal clicks are not errors: selecting an empty square or proposing a
/// destination outside the legal set is silently ignored by the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("a pawn on {0} is waiting for its promotion piece")]
    PromotionPending(Square),

    #[error("no promotion is pending")]
    NoPendingPromotion,

    #[error("cannot promote to {0:?}")]
    InvalidPromotion(PieceType),
}
