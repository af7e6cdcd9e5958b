use std::fmt;
use std::str::FromStr;

use crate::error::RulesError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Piece types a pawn may promote to.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }

    /// Lower case letter, as used in FEN placement and promotion suffixes.
    pub fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub fn from_letter(letter: char) -> Option<PieceType> {
        match letter.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row holding this color's king and rooks at the start.
    pub fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row a pawn of this color promotes on.
    pub fn promotion_row(self) -> u8 {
        self.opposite().home_row()
    }

    /// Row step of a pawn advance.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }

    pub fn is(&self, color: Color, piece_type: PieceType) -> bool {
        self.color == color && self.piece_type == piece_type
    }

    /// FEN letter: upper case for White.
    pub fn letter(&self) -> char {
        let letter = self.piece_type.letter();
        match self.color {
            Color::White => letter.to_ascii_uppercase(),
            Color::Black => letter,
        }
    }

    pub fn glyph(&self) -> char {
        match (self.color, self.piece_type) {
            (Color::White, PieceType::King) => '♔',
            (Color::White, PieceType::Queen) => '♕',
            (Color::White, PieceType::Rook) => '♖',
            (Color::White, PieceType::Bishop) => '♗',
            (Color::White, PieceType::Knight) => '♘',
            (Color::White, PieceType::Pawn) => '♙',
            (Color::Black, PieceType::King) => '♚',
            (Color::Black, PieceType::Queen) => '♛',
            (Color::Black, PieceType::Rook) => '♜',
            (Color::Black, PieceType::Bishop) => '♝',
            (Color::Black, PieceType::Knight) => '♞',
            (Color::Black, PieceType::Pawn) => '♟',
        }
    }
}

/// A board coordinate. Row 0 is Black's back rank, column 0 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Panics if either coordinate is outside `0..8`.
    pub fn new(row: u8, col: u8) -> Self {
        assert!(row < 8 && col < 8, "square ({}, {}) is off the board", row, col);
        Self { row, col }
    }

    pub fn try_new(row: i8, col: i8) -> Option<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        Square::try_new(self.row as i8 + dr, self.col as i8 + dc)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..8).flat_map(|row| (0..8).map(move |col| Square { row, col }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, 8 - self.row)
    }
}

impl FromStr for Square {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(RulesError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(RulesError::InvalidSquare(s.to_string()));
        }
        Ok(Square::new(7 - (rank - b'1'), file - b'a'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (col, &piece_type) in BACK_RANK.iter().enumerate() {
                board.place(
                    Square::new(color.home_row(), col as u8),
                    Piece::new(color, piece_type),
                );
                board.place(
                    Square::new(color.pawn_row(), col as u8),
                    Piece::new(color, PieceType::Pawn),
                );
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    pub fn occupant(&self, square: Square) -> Option<Piece> {
        self.squares[square.row as usize][square.col as usize]
    }

    pub fn place(&mut self, square: Square, piece: Piece) {
        self.squares[square.row as usize][square.col as usize] = Some(piece);
    }

    pub fn clear(&mut self, square: Square) {
        self.squares[square.row as usize][square.col as usize] = None;
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.occupant(square).is_none()
    }

    /// Moves whatever stands on `from` to `to` and returns what `to` held.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.occupant(from);
        let replaced = self.occupant(to);
        self.squares[to.row as usize][to.col as usize] = moving;
        self.clear(from);
        replaced
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.occupant(sq).map(|piece| (sq, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.is(color, PieceType::King))
            .map(|(sq, _)| sq)
    }

    /// Piece-placement field of a FEN string, Black's back rank first.
    pub fn placement(&self) -> String {
        let mut result = String::new();
        for row in 0..8 {
            let mut empty = 0;
            for col in 0..8 {
                match self.occupant(Square::new(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            result.push_str(&empty.to_string());
                            empty = 0;
                        }
                        result.push(piece.letter());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                result.push_str(&empty.to_string());
            }
            if row < 7 {
                result.push('/');
            }
        }
        result
    }

    /// Diagram with rank and file labels; `glyphs` selects figurines over letters.
    pub fn diagram(&self, glyphs: bool) -> String {
        let mut result = String::new();
        for row in 0..8u8 {
            result.push_str(&format!("{} ", 8 - row));
            for col in 0..8u8 {
                let cell = match self.occupant(Square::new(row, col)) {
                    Some(piece) if glyphs => piece.glyph(),
                    Some(piece) => piece.letter(),
                    None => '.',
                };
                result.push(cell);
                if col < 7 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result.push_str("  a b c d e f g h\n");
        result
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.diagram(false))
    }
}

impl FromStr for Board {
    type Err = RulesError;

    /// Parses the piece-placement field of a FEN string. Anything after the
    /// first space is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let placement = s.split_whitespace().next().unwrap_or("");
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(RulesError::InvalidPlacement(format!(
                "expected 8 ranks, found {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let overflow = || {
                RulesError::InvalidPlacement(format!(
                    "rank {} does not describe 8 squares",
                    8 - row
                ))
            };
            let mut col = 0u8;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10) {
                    col += run as u8;
                    if col > 8 {
                        return Err(overflow());
                    }
                    continue;
                }
                let piece_type = PieceType::from_letter(c).ok_or_else(|| {
                    RulesError::InvalidPlacement(format!("unknown piece '{}'", c))
                })?;
                if col >= 8 {
                    return Err(overflow());
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                board.place(Square::new(row as u8, col), Piece::new(color, piece_type));
                col += 1;
            }
            if col != 8 {
                return Err(overflow());
            }
        }
        Ok(board)
    }
}
