//! The boundary a board UI talks to: click-driven selection, move proposals,
//! promotion choices and a status snapshot.

use crate::board::{Color, Piece, PieceType, Square};
use crate::error::RulesError;
use crate::game::{GameState, GameStatus, MoveOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedResult {
    pub captured: Option<Piece>,
    pub castled: bool,
    /// Set when the moved pawn waits for [`Game::resolve_promotion`].
    pub promotion_required: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status<'a> {
    pub side_to_move: Color,
    pub check: bool,
    pub checkmate: bool,
    pub white_captured: &'a [Piece],
    pub black_captured: &'a [Piece],
}

/// Result of a single board click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Vec<Square>),
    Moved(AppliedResult),
    Deselected,
    Ignored,
}

#[derive(Debug, Clone)]
struct Selection {
    from: Square,
    destinations: Vec<Square>,
}

#[derive(Debug, Clone, Default)]
pub struct Game {
    state: GameState,
    selection: Option<Selection>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            selection: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Throws the current game away and sets up the start position.
    pub fn new_game(&mut self) -> &GameState {
        self.state = GameState::new();
        self.selection = None;
        &self.state
    }

    pub fn selected(&self) -> Option<Square> {
        self.selection.as_ref().map(|s| s.from)
    }

    fn accepting_input(&self) -> bool {
        self.state.pending_promotion().is_none() && self.state.status() != GameStatus::Checkmate
    }

    /// Selects a piece of the side to move and returns its legal destinations.
    /// Anything else clears the selection and yields `None`.
    pub fn select(&mut self, square: Square) -> Option<Vec<Square>> {
        self.selection = None;
        if !self.accepting_input() {
            return None;
        }
        let piece = self.state.board().occupant(square)?;
        if piece.color != self.state.side_to_move() {
            return None;
        }
        let destinations = self.state.legal_moves(square);
        self.selection = Some(Selection {
            from: square,
            destinations: destinations.clone(),
        });
        Some(destinations)
    }

    /// Plays `from` to `to` if it is legal; otherwise nothing happens. The
    /// selection is cleared either way.
    pub fn propose_move(&mut self, from: Square, to: Square) -> Option<AppliedResult> {
        let destinations = match self.selection.take() {
            Some(selection) if selection.from == from => selection.destinations,
            _ => {
                let moves = self.select(from)?;
                self.selection = None;
                moves
            }
        };
        if !destinations.contains(&to) || !self.accepting_input() {
            return None;
        }

        let outcome = match self.state.apply_move(from, to, None) {
            Ok(outcome) => outcome,
            // `accepting_input` rules out a pending promotion and `from` held
            // a piece when its destinations were computed.
            Err(err) => unreachable!("legal move {} {} was rejected: {}", from, to, err),
        };
        Some(match outcome {
            MoveOutcome::Applied { captured, castled } => AppliedResult {
                captured,
                castled: castled.is_some(),
                promotion_required: None,
            },
            MoveOutcome::PendingPromotion {
                captured, color, ..
            } => AppliedResult {
                captured,
                castled: false,
                promotion_required: Some(color),
            },
        })
    }

    pub fn resolve_promotion(&mut self, piece_type: PieceType) -> Result<(), RulesError> {
        self.state.resolve_promotion(piece_type)
    }

    /// First click selects, a click on a highlighted square moves, any other
    /// click drops the selection.
    pub fn click(&mut self, square: Square) -> ClickOutcome {
        match self.selected() {
            Some(from) => match self.propose_move(from, square) {
                Some(result) => ClickOutcome::Moved(result),
                None => ClickOutcome::Deselected,
            },
            None => match self.select(square) {
                Some(destinations) => ClickOutcome::Selected(destinations),
                None => ClickOutcome::Ignored,
            },
        }
    }

    pub fn status(&self) -> Status<'_> {
        let status = self.state.status();
        Status {
            side_to_move: self.state.side_to_move(),
            check: status != GameStatus::Ongoing,
            checkmate: status == GameStatus::Checkmate,
            white_captured: self.state.captured(Color::White),
            black_captured: self.state.captured(Color::Black),
        }
    }
}
