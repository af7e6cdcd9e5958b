pub mod attack;
pub mod board;
pub mod castling;
pub mod console;
pub mod error;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod session;

pub use board::{Board, Color, Piece, PieceType, Square};
pub use castling::{CastleSide, CastlingRights};
pub use error::RulesError;
pub use game::{GameState, GameStatus, MoveOutcome};
pub use movegen::{Move, MoveGenerator};
pub use session::{AppliedResult, ClickOutcome, Game, Status};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn squares(names: &[&str]) -> HashSet<Square> {
        names.iter().map(|name| sq(name)).collect()
    }

    fn position(placement: &str, side: Color) -> GameState {
        GameState::from_board(placement.parse().unwrap(), side)
    }

    #[test]
    fn test_initial_position() {
        let board = Board::new();
        for color in [Color::White, Color::Black] {
            let count = |piece_type: PieceType| {
                board
                    .pieces_of(color)
                    .filter(|(_, piece)| piece.piece_type == piece_type)
                    .count()
            };
            assert_eq!(count(PieceType::Pawn), 8);
            assert_eq!(count(PieceType::Rook), 2);
            assert_eq!(count(PieceType::Knight), 2);
            assert_eq!(count(PieceType::Bishop), 2);
            assert_eq!(count(PieceType::Queen), 1);
            assert_eq!(count(PieceType::King), 1);
        }
        assert_eq!(board.occupant(sq("d1")), Some(Piece::new(Color::White, PieceType::Queen)));
        assert_eq!(board.occupant(sq("e8")), Some(Piece::new(Color::Black, PieceType::King)));

        let state = GameState::new();
        assert_eq!(state.side_to_move(), Color::White);
        let generator = MoveGenerator::new();
        let moves = generator.generate_moves(state.board(), state.castling_rights(), Color::White);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn test_new_game_status() {
        let mut game = Game::new();
        game.propose_move(sq("e2"), sq("e4")).unwrap();
        game.new_game();
        let status = game.status();
        assert_eq!(status.side_to_move, Color::White);
        assert!(!status.check);
        assert!(!status.checkmate);
        assert!(status.white_captured.is_empty());
        assert!(status.black_captured.is_empty());
        assert_eq!(game.state().status(), GameStatus::Ongoing);
        assert_eq!(*game.state().board(), Board::new());
    }

    #[test]
    fn test_sliding_moves_stop_at_blockers() {
        let board: Board = "4k3/8/3P4/8/3R1p2/8/8/4K3".parse().unwrap();
        let generator = MoveGenerator::new();
        let rights = CastlingRights::inferred(&board);
        let moves: HashSet<Square> = generator
            .pseudo_legal_moves(&board, &rights, sq("d4"))
            .into_iter()
            .collect();
        assert_eq!(
            moves,
            squares(&["d5", "d3", "d2", "d1", "e4", "f4", "c4", "b4", "a4"])
        );

        let board: Board = "4k3/8/1p3P2/8/3Q4/8/8/4K3".parse().unwrap();
        let moves = generator.pseudo_legal_moves(&board, &rights, sq("d4"));
        assert!(moves.contains(&sq("b6")));
        assert!(!moves.contains(&sq("a7")));
        assert!(moves.contains(&sq("e5")));
        assert!(!moves.contains(&sq("f6")));
        assert!(!moves.contains(&sq("g7")));
    }

    #[test]
    fn test_pawn_moves() {
        let generator = MoveGenerator::new();
        let rights = CastlingRights::new();

        let board = Board::new();
        let moves: HashSet<Square> = generator
            .pseudo_legal_moves(&board, &rights, sq("e2"))
            .into_iter()
            .collect();
        assert_eq!(moves, squares(&["e3", "e4"]));
        let moves: HashSet<Square> = generator
            .pseudo_legal_moves(&board, &rights, sq("d7"))
            .into_iter()
            .collect();
        assert_eq!(moves, squares(&["d6", "d5"]));

        let blocked_far: Board = "rnbqkbnr/pppppppp/8/8/4n3/8/PPPPPPPP/RNBQKBNR".parse().unwrap();
        assert_eq!(
            generator.pseudo_legal_moves(&blocked_far, &rights, sq("e2")),
            vec![sq("e3")]
        );
        let blocked_near: Board = "rnbqkbnr/pppppppp/8/8/8/4n3/PPPPPPPP/RNBQKBNR".parse().unwrap();
        assert!(generator
            .pseudo_legal_moves(&blocked_near, &rights, sq("e2"))
            .is_empty());
        assert_eq!(
            generator.pseudo_legal_moves(&blocked_near, &rights, sq("d2")),
            vec![sq("d3"), sq("d4"), sq("e3")]
        );

        let advanced: Board = "4k3/8/8/8/8/4P3/8/4K3".parse().unwrap();
        assert_eq!(
            generator.pseudo_legal_moves(&advanced, &rights, sq("e3")),
            vec![sq("e4")]
        );
    }

    #[test]
    fn test_castling_both_sides() {
        let mut state = position("r3k2r/8/8/8/8/8/8/R3K2R", Color::White);
        let moves = state.legal_moves(sq("e1"));
        assert!(moves.contains(&sq("g1")));
        assert!(moves.contains(&sq("c1")));

        let outcome = state.apply_move(sq("e1"), sq("g1"), None).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Applied {
                captured: None,
                castled: Some(CastleSide::Kingside)
            }
        );
        let board = state.board();
        assert_eq!(board.occupant(sq("g1")), Some(Piece::new(Color::White, PieceType::King)));
        assert_eq!(board.occupant(sq("f1")), Some(Piece::new(Color::White, PieceType::Rook)));
        assert!(board.is_empty(sq("h1")));
        assert!(state.castling_rights().white.king_moved);

        state.apply_move(sq("e8"), sq("c8"), None).unwrap();
        let board = state.board();
        assert_eq!(board.occupant(sq("c8")), Some(Piece::new(Color::Black, PieceType::King)));
        assert_eq!(board.occupant(sq("d8")), Some(Piece::new(Color::Black, PieceType::Rook)));
        assert!(board.is_empty(sq("a8")));
    }

    #[test]
    fn test_castling_requires_safe_transit() {
        let state = position("r3kr2/8/8/8/8/8/8/R3K2R", Color::White);
        let moves = state.legal_moves(sq("e1"));
        assert!(!moves.contains(&sq("g1")));
        assert!(moves.contains(&sq("c1")));

        // b1 only needs to be empty, not safe.
        let state = position("1r2k3/8/8/8/8/8/8/R3K3", Color::White);
        assert!(state.legal_moves(sq("e1")).contains(&sq("c1")));

        let in_check = position("4r1k1/8/8/8/8/8/8/R3K2R", Color::White);
        assert_eq!(in_check.status(), GameStatus::Check);
        let moves = in_check.legal_moves(sq("e1"));
        assert!(!moves.contains(&sq("g1")));
        assert!(!moves.contains(&sq("c1")));

        let blocked = position("4k3/8/8/8/8/8/8/RN2K1NR", Color::White);
        let moves = blocked.legal_moves(sq("e1"));
        assert!(!moves.contains(&sq("g1")));
        assert!(!moves.contains(&sq("c1")));
    }

    #[test]
    fn test_castling_rights_are_permanent() {
        let mut state = position("4k3/7p/8/8/8/8/8/R3K2R", Color::White);
        state.apply_move(sq("h1"), sq("h2"), None).unwrap();
        state.apply_move(sq("e8"), sq("d8"), None).unwrap();
        state.apply_move(sq("h2"), sq("h1"), None).unwrap();
        state.apply_move(sq("d8"), sq("e8"), None).unwrap();
        let moves = state.legal_moves(sq("e1"));
        assert!(!moves.contains(&sq("g1")));
        assert!(moves.contains(&sq("c1")));
        assert!(state.castling_rights().white.kingside_rook_moved);
        assert!(!state.castling_rights().white.queenside_rook_moved);
    }

    #[test]
    fn test_king_walk_revokes_castling() {
        let mut state = position("4k3/7p/8/8/8/8/8/R3K2R", Color::White);
        state.apply_move(sq("e1"), sq("e2"), None).unwrap();
        state.apply_move(sq("e8"), sq("d8"), None).unwrap();
        state.apply_move(sq("e2"), sq("e1"), None).unwrap();
        state.apply_move(sq("d8"), sq("e8"), None).unwrap();
        let moves = state.legal_moves(sq("e1"));
        assert!(!moves.contains(&sq("g1")));
        assert!(!moves.contains(&sq("c1")));
        assert!(state.castling_rights().white.king_moved);
        assert!(!state.castling_rights().white.kingside_rook_moved);
        assert!(!state.castling_rights().white.queenside_rook_moved);
    }

    #[test]
    fn test_pawn_diagonal_guards_castling_transit() {
        // The pawn on e2 attacks f1 and d1 but not the square it would push to.
        let state = position("4k3/8/8/8/8/8/4p3/4K2R", Color::White);
        assert_eq!(state.status(), GameStatus::Ongoing);
        let moves = state.legal_moves(sq("e1"));
        assert!(!moves.contains(&sq("g1")));
        assert!(!moves.contains(&sq("f1")));
        assert!(!moves.contains(&sq("d1")));

        let generator = MoveGenerator::new();
        let attacks: HashSet<Square> = generator
            .raw_attack_squares(state.board(), sq("e2"))
            .into_iter()
            .collect();
        assert_eq!(attacks, squares(&["d1", "f1"]));
    }

    #[test]
    fn test_rook_captured_at_home_loses_castling() {
        let mut state = position("4k3/8/8/8/8/6n1/8/R3K2R", Color::Black);
        let outcome = state.apply_move(sq("g3"), sq("h1"), None).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Applied {
                captured: Some(Piece::new(Color::White, PieceType::Rook)),
                castled: None
            }
        );
        assert!(state.castling_rights().white.kingside_rook_moved);
        assert!(!state.castling_rights().white.king_moved);
        assert!(!state.legal_moves(sq("e1")).contains(&sq("g1")));
    }

    #[test]
    fn test_pinned_piece_stays_on_pin_line() {
        let board: Board = "4k3/4r3/8/8/8/8/4B3/4K3".parse().unwrap();
        let generator = MoveGenerator::new();
        let rights = CastlingRights::inferred(&board);
        let pseudo = generator.pseudo_legal_moves(&board, &rights, sq("e2"));
        assert!(pseudo.contains(&sq("d3")));
        let legal = generator.filter_self_check(&board, Color::White, sq("e2"), &pseudo);
        assert!(legal.is_empty());

        let board: Board = "4k3/4r3/8/8/8/8/4R3/4K3".parse().unwrap();
        let legal: HashSet<Square> = generator
            .legal_moves(&board, &rights, sq("e2"))
            .into_iter()
            .collect();
        assert_eq!(legal, squares(&["e3", "e4", "e5", "e6", "e7"]));
    }

    #[test]
    fn test_fools_mate() {
        let mut game = Game::new();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            assert!(game.propose_move(sq(from), sq(to)).is_some(), "{} {}", from, to);
        }
        let status = game.status();
        assert_eq!(status.side_to_move, Color::White);
        assert!(status.check);
        assert!(status.checkmate);

        let state = game.state();
        assert!(!state.has_any_escape());
        for (from, _) in state.board().pieces_of(Color::White) {
            assert!(state.legal_moves(from).is_empty(), "{} can move", from);
        }
        assert_eq!(game.select(sq("e1")), None);
        assert_eq!(game.propose_move(sq("e1"), sq("f2")), None);
    }

    #[test]
    fn test_check_is_not_mate() {
        let mut game = Game::new();
        for (from, to) in [("e2", "e4"), ("f7", "f6"), ("d1", "h5")] {
            game.propose_move(sq(from), sq(to)).unwrap();
        }
        let status = game.status();
        assert!(status.check);
        assert!(!status.checkmate);
        assert_eq!(game.select(sq("g7")), Some(vec![sq("g6")]));
        assert_eq!(game.select(sq("e8")), Some(vec![]));
    }

    #[test]
    fn test_back_rank_mate() {
        let mut state = position("6k1/5ppp/8/8/8/8/8/R5K1", Color::White);
        state.apply_move(sq("a1"), sq("a8"), None).unwrap();
        assert_eq!(state.status(), GameStatus::Checkmate);
        assert_eq!(state.side_to_move(), Color::Black);
    }

    #[test]
    fn test_captures_are_grouped_by_captured_color() {
        let mut game = Game::new();
        game.propose_move(sq("e2"), sq("e4")).unwrap();
        game.propose_move(sq("d7"), sq("d5")).unwrap();
        let result = game.propose_move(sq("e4"), sq("d5")).unwrap();
        let pawn = Piece::new(Color::Black, PieceType::Pawn);
        assert_eq!(
            result,
            AppliedResult {
                captured: Some(pawn),
                castled: false,
                promotion_required: None
            }
        );
        let result = game.propose_move(sq("d8"), sq("d5")).unwrap();
        assert_eq!(result.captured, Some(Piece::new(Color::White, PieceType::Pawn)));
        let status = game.status();
        assert_eq!(status.black_captured, &[pawn][..]);
        assert_eq!(status.white_captured, &[Piece::new(Color::White, PieceType::Pawn)][..]);
    }

    #[test]
    fn test_promotion() {
        for col in 0..8u8 {
            let mut board = Board::empty();
            board.place(Square::new(0, 7 - col), Piece::new(Color::Black, PieceType::King));
            board.place(Square::new(7, 4), Piece::new(Color::White, PieceType::King));
            let from = Square::new(1, col);
            let to = Square::new(0, col);
            board.place(from, Piece::new(Color::White, PieceType::Pawn));
            let mut game = Game::from_state(GameState::from_board(board, Color::White));

            let result = game.propose_move(from, to).unwrap();
            assert_eq!(result.promotion_required, Some(Color::White));
            assert_eq!(game.status().side_to_move, Color::White);
            assert_eq!(game.state().pending_promotion(), Some(to));
            assert_eq!(game.select(Square::new(7, 4)), None);
            assert_eq!(
                game.resolve_promotion(PieceType::King),
                Err(RulesError::InvalidPromotion(PieceType::King))
            );

            game.resolve_promotion(PieceType::Rook).unwrap();
            assert_eq!(game.status().side_to_move, Color::Black);
            assert_eq!(
                game.state().board().occupant(to),
                Some(Piece::new(Color::White, PieceType::Rook))
            );
            assert_eq!(
                game.resolve_promotion(PieceType::Queen),
                Err(RulesError::NoPendingPromotion)
            );
        }
    }

    #[test]
    fn test_moves_are_ignored_while_promotion_pends() {
        let mut game = Game::from_state(position("4k3/P7/8/8/8/8/8/4K3", Color::White));
        game.propose_move(sq("a7"), sq("a8")).unwrap();
        let before = game.state().board().clone();
        assert_eq!(game.propose_move(sq("e1"), sq("e2")), None);
        assert_eq!(game.click(sq("e1")), ClickOutcome::Ignored);
        assert_eq!(*game.state().board(), before);
        assert_eq!(game.state().pending_promotion(), Some(sq("a8")));

        game.resolve_promotion(PieceType::Queen).unwrap();
        assert!(game.propose_move(sq("e8"), sq("d7")).is_some());
    }

    #[test]
    fn test_promotion_status_waits_for_choice() {
        let mut state = position("4k3/P7/8/8/8/8/8/4K3", Color::White);
        let outcome = state.apply_move(sq("a7"), sq("a8"), None).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::PendingPromotion {
                captured: None,
                square: sq("a8"),
                color: Color::White
            }
        );
        assert_eq!(state.status(), GameStatus::Ongoing);
        assert_eq!(
            state.apply_move(sq("e1"), sq("e2"), None),
            Err(RulesError::PromotionPending(sq("a8")))
        );
        state.resolve_promotion(PieceType::Queen).unwrap();
        assert_eq!(state.status(), GameStatus::Check);

        let mut state = position("1r2k3/P7/8/8/8/8/8/4K3", Color::White);
        let outcome = state
            .apply_move(sq("a7"), sq("b8"), Some(PieceType::Knight))
            .unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Applied {
                captured: Some(Piece::new(Color::Black, PieceType::Rook)),
                castled: None
            }
        );
        assert_eq!(state.side_to_move(), Color::Black);
        assert_eq!(
            state.board().occupant(sq("b8")),
            Some(Piece::new(Color::White, PieceType::Knight))
        );
    }

    #[test]
    fn test_click_selects_moves_and_deselects() {
        let mut game = Game::new();
        assert_eq!(game.click(sq("e5")), ClickOutcome::Ignored);
        assert_eq!(game.click(sq("e7")), ClickOutcome::Ignored);
        match game.click(sq("e2")) {
            ClickOutcome::Selected(moves) => assert_eq!(moves.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(game.click(sq("e5")), ClickOutcome::Deselected);
        assert_eq!(game.selected(), None);
        game.click(sq("e2"));
        assert!(matches!(game.click(sq("e4")), ClickOutcome::Moved(_)));
        assert_eq!(game.status().side_to_move, Color::Black);
    }

    #[test]
    fn test_illegal_destination_is_ignored() {
        let mut game = Game::new();
        assert_eq!(game.select(sq("b1")).map(|m| m.len()), Some(2));
        assert_eq!(game.propose_move(sq("b1"), sq("b3")), None);
        assert_eq!(game.selected(), None);
        assert_eq!(*game.state().board(), Board::new());
        assert_eq!(game.propose_move(sq("e7"), sq("e5")), None);
        assert_eq!(game.status().side_to_move, Color::White);
    }

    #[test]
    fn test_random_games_respect_the_rules() {
        let generator = MoveGenerator::new();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..12 {
            let mut state = GameState::new();
            for _ in 0..150 {
                let mover = state.side_to_move();
                let moves = generator.generate_moves(state.board(), state.castling_rights(), mover);
                let in_check = generator.is_king_in_check(state.board(), mover);
                assert_eq!(
                    state.status() == GameStatus::Checkmate,
                    in_check && moves.is_empty()
                );
                let mv = match moves.choose(&mut rng) {
                    Some(mv) => *mv,
                    None => break,
                };
                let choice = *PieceType::PROMOTIONS.choose(&mut rng).unwrap();
                state.apply_move(mv.from, mv.to, Some(choice)).unwrap();

                assert!(!generator.is_king_in_check(state.board(), mover));
                for color in [Color::White, Color::Black] {
                    let kings = state
                        .board()
                        .pieces_of(color)
                        .filter(|(_, piece)| piece.piece_type == PieceType::King)
                        .count();
                    assert_eq!(kings, 1);
                }
                let on_board = state.board().pieces().count();
                let captured = state.captured(Color::White).len() + state.captured(Color::Black).len();
                assert_eq!(on_board + captured, 32);
            }
        }
    }
}
