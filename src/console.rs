use crate::board::{Board, Color, Piece, PieceType, Square};
use crate::error::RulesError;
use crate::game::GameState;
use crate::session::{AppliedResult, ClickOutcome, Game};
use anyhow::{anyhow, bail, Context, Result};
use std::io::{self, BufRead, Write};

/// Display settings, changed with `set <name> <on|off>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Print the board after every completed move.
    pub show_board: bool,
    /// Figurine glyphs instead of FEN letters.
    pub unicode: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            show_board: true,
            unicode: false,
        }
    }
}

/// Line-oriented driver standing in for a graphical board.
pub struct ConsoleHandler {
    game: Game,
    options: Options,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        ConsoleHandler {
            game: Game::new(),
            options,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        print!("{}", self.render_board());
        stdout.flush()?;

        while reader.read_line(&mut line).context("failed to read command")? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }
            let reply = match self.handle_command(command) {
                Ok(reply) => reply,
                Err(err) => format!("error: {:#}\n", err),
            };
            print!("{}", reply);
            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(String::new());
        }

        match parts[0] {
            "new" => {
                self.game.new_game();
                Ok(self.render_board())
            }
            "show" => Ok(self.render_board()),
            "fen" => Ok(format!("{}\n", self.game.state().board().placement())),
            "status" => Ok(self.handle_status()),
            "select" => self.handle_select(&parts[1..]),
            "move" => self.handle_move(&parts[1..]),
            "click" => self.handle_click(&parts[1..]),
            "promote" => self.handle_promote(&parts[1..]),
            "load" => self.handle_load(&parts[1..]),
            "set" => self.handle_set(&parts[1..]),
            "help" => Ok(HELP.to_string()),
            "quit" => Ok(String::new()),
            other => bail!("unknown command '{}'", other),
        }
    }

    fn handle_status(&self) -> String {
        let status = self.game.status();
        let mut result = format!("{} to move", color_name(status.side_to_move));
        if status.checkmate {
            result.push_str(", checkmate");
        } else if status.check {
            result.push_str(", check");
        }
        if let Some(square) = self.game.state().pending_promotion() {
            result.push_str(&format!(", pawn on {} awaits promotion", square));
        }
        result.push('\n');
        result.push_str(&format!("white took: {}\n", self.piece_list(status.black_captured)));
        result.push_str(&format!("black took: {}\n", self.piece_list(status.white_captured)));
        result
    }

    fn handle_select(&mut self, parts: &[&str]) -> Result<String> {
        let square = parse_square(parts.first())?;
        Ok(match self.game.select(square) {
            Some(destinations) => format!("{}: {}\n", square, square_list(&destinations)),
            None => format!("{}: nothing to select\n", square),
        })
    }

    fn handle_move(&mut self, parts: &[&str]) -> Result<String> {
        let from = parse_square(parts.first())?;
        let to = parse_square(parts.get(1))?;
        let promotion = parts.get(2).map(|s| parse_promotion(s)).transpose()?;

        match self.game.propose_move(from, to) {
            Some(result) => self.after_move(&result, promotion),
            None => Ok(format!("illegal move {} {}\n", from, to)),
        }
    }

    fn handle_click(&mut self, parts: &[&str]) -> Result<String> {
        let square = parse_square(parts.first())?;
        match self.game.click(square) {
            ClickOutcome::Selected(destinations) => {
                Ok(format!("{}: {}\n", square, square_list(&destinations)))
            }
            ClickOutcome::Moved(result) => self.after_move(&result, None),
            ClickOutcome::Deselected => Ok("deselected\n".to_string()),
            ClickOutcome::Ignored => Ok(String::new()),
        }
    }

    fn handle_promote(&mut self, parts: &[&str]) -> Result<String> {
        let piece_type = parse_promotion(
            parts
                .first()
                .ok_or_else(|| anyhow!("promote needs a piece: q, r, b or n"))?,
        )?;
        self.game.resolve_promotion(piece_type)?;
        Ok(self.report_position())
    }

    fn handle_load(&mut self, parts: &[&str]) -> Result<String> {
        let placement = parts
            .first()
            .ok_or_else(|| anyhow!("load needs a piece placement"))?;
        let board: Board = placement
            .parse()
            .with_context(|| format!("cannot load '{}'", placement))?;
        let side = match parts.get(1).copied() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => bail!("side to move must be w or b, not '{}'", other),
        };
        self.game = Game::from_state(GameState::from_board(board, side));
        Ok(self.render_board())
    }

    fn handle_set(&mut self, parts: &[&str]) -> Result<String> {
        let (name, value) = match parts {
            [name, value] => (*name, *value),
            _ => bail!("usage: set <show_board|unicode> <on|off>"),
        };
        let enabled = match value {
            "on" | "true" => true,
            "off" | "false" => false,
            other => bail!("expected on or off, not '{}'", other),
        };
        match name {
            "show_board" => self.options.show_board = enabled,
            "unicode" => self.options.unicode = enabled,
            other => bail!("unknown option '{}'", other),
        }
        Ok(format!("{} = {}\n", name, if enabled { "on" } else { "off" }))
    }

    fn after_move(&mut self, result: &AppliedResult, promotion: Option<PieceType>) -> Result<String> {
        let mut reply = String::new();
        if let Some(piece) = result.captured {
            reply.push_str(&format!("captured {}\n", self.piece_name(piece)));
        }
        if result.castled {
            reply.push_str("castled\n");
        }
        if let Some(color) = result.promotion_required {
            match promotion {
                Some(piece_type) => self.game.resolve_promotion(piece_type)?,
                None => {
                    reply.push_str(&format!(
                        "{} pawn promotes: choose q, r, b or n\n",
                        color_name(color)
                    ));
                    return Ok(reply);
                }
            }
        }
        reply.push_str(&self.report_position());
        Ok(reply)
    }

    fn report_position(&self) -> String {
        let mut reply = String::new();
        if self.options.show_board {
            reply.push_str(&self.render_board());
        }
        reply.push_str(&self.handle_status());
        reply
    }

    fn render_board(&self) -> String {
        self.game.state().board().diagram(self.options.unicode)
    }

    fn piece_name(&self, piece: Piece) -> String {
        if self.options.unicode {
            piece.glyph().to_string()
        } else {
            piece.letter().to_string()
        }
    }

    fn piece_list(&self, pieces: &[Piece]) -> String {
        if pieces.is_empty() {
            return "-".to_string();
        }
        pieces
            .iter()
            .map(|&piece| self.piece_name(piece))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

const HELP: &str = "\
commands:
  new                      start a new game
  show                     print the board
  fen                      print the FEN piece placement
  status                   side to move, check state and captures
  select <sq>              list legal destinations
  move <from> <to> [qrbn]  play a move
  click <sq>               select, move or deselect
  promote <q|r|b|n>        finish a pending promotion
  load <placement> [w|b]   set up a position from a FEN placement
  set <option> <on|off>    options: show_board, unicode
  quit
";

fn parse_square(arg: Option<&&str>) -> Result<Square, RulesError> {
    match arg {
        Some(s) => s.parse(),
        None => Err(RulesError::InvalidSquare("(missing)".to_string())),
    }
}

fn parse_promotion(arg: &str) -> Result<PieceType> {
    let mut chars = arg.chars();
    let piece_type = match (chars.next(), chars.next()) {
        (Some(c), None) => PieceType::from_letter(c),
        _ => None,
    };
    match piece_type {
        Some(piece_type) if piece_type.is_promotion_choice() => Ok(piece_type),
        _ => bail!("promotion piece must be q, r, b or n, not '{}'", arg),
    }
}

fn square_list(squares: &[Square]) -> String {
    if squares.is_empty() {
        return "no legal moves".to_string();
    }
    squares
        .iter()
        .map(|sq| sq.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}
