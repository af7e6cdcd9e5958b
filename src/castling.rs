use crate::board::{Board, Color, PieceType, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    pub fn rook_home_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    pub fn king_target_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    pub fn rook_target_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }

    /// Columns strictly between king and rook; all must be empty.
    pub fn between_cols(self) -> &'static [u8] {
        match self {
            CastleSide::Kingside => &[5, 6],
            CastleSide::Queenside => &[1, 2, 3],
        }
    }

    /// Columns the king crosses or lands on; none may be attacked.
    pub fn transit_cols(self) -> &'static [u8] {
        match self {
            CastleSide::Kingside => &[5, 6],
            CastleSide::Queenside => &[3, 2],
        }
    }

    /// Side castled by a king arriving on `to`, if the move is two columns wide.
    pub fn from_king_move(from: Square, to: Square) -> Option<CastleSide> {
        if from.row() != to.row() {
            return None;
        }
        match to.col() as i8 - from.col() as i8 {
            2 => Some(CastleSide::Kingside),
            -2 => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

pub const KING_HOME_COL: u8 = 4;

/// Moved-flags for the pieces castling depends on. Once set, a flag stays set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideRights {
    pub king_moved: bool,
    pub queenside_rook_moved: bool,
    pub kingside_rook_moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub white: SideRights,
    pub black: SideRights,
}

impl CastlingRights {
    /// Nothing has moved yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rights for an arbitrary position: a flag is set whenever the tracked
    /// piece is not standing on its home square.
    pub fn inferred(board: &Board) -> Self {
        let mut rights = Self::new();
        for color in [Color::White, Color::Black] {
            let row = color.home_row();
            let home = |col: u8, piece_type: PieceType| {
                board
                    .occupant(Square::new(row, col))
                    .map_or(false, |piece| piece.is(color, piece_type))
            };
            let side = rights.side_mut(color);
            side.king_moved = !home(KING_HOME_COL, PieceType::King);
            side.queenside_rook_moved = !home(0, PieceType::Rook);
            side.kingside_rook_moved = !home(7, PieceType::Rook);
        }
        rights
    }

    pub fn side(&self, color: Color) -> &SideRights {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn side_mut(&mut self, color: Color) -> &mut SideRights {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    pub fn rook_moved(&self, color: Color, side: CastleSide) -> bool {
        let rights = self.side(color);
        match side {
            CastleSide::Kingside => rights.kingside_rook_moved,
            CastleSide::Queenside => rights.queenside_rook_moved,
        }
    }

    /// King and the rook of `side` are both unmoved.
    pub fn may_castle(&self, color: Color, side: CastleSide) -> bool {
        !self.side(color).king_moved && !self.rook_moved(color, side)
    }

    pub fn mark_king_moved(&mut self, color: Color) {
        self.side_mut(color).king_moved = true;
    }

    pub fn mark_rook_moved(&mut self, color: Color, side: CastleSide) {
        let rights = self.side_mut(color);
        match side {
            CastleSide::Kingside => rights.kingside_rook_moved = true,
            CastleSide::Queenside => rights.queenside_rook_moved = true,
        }
    }

    /// Revokes the side whose rook starts on `square`, if any. Used both when
    /// that rook leaves and when something captures onto its home square.
    pub fn touch_rook_home(&mut self, color: Color, square: Square) {
        if square.row() != color.home_row() {
            return;
        }
        for side in CastleSide::BOTH {
            if square.col() == side.rook_home_col() {
                self.mark_rook_moved(color, side);
            }
        }
    }
}
