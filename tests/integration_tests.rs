//! Integration tests for the game loop: full games driven through actions and ticks

use blockfall::core::{Board, GameState, Randomizer};
use blockfall::engine::Session;
use blockfall::types::{GameAction, GamePhase, PieceKind, BOARD_WIDTH, NEXT_QUEUE_LEN};

/// First seed in `1..` whose opening piece is `kind`.
fn seed_starting_with(kind: PieceKind) -> u32 {
    (1..100_000)
        .find(|&seed| GameState::new(seed).player().kind == kind)
        .unwrap()
}

/// Play until the game ends by dropping every piece straight down.
fn drop_until_over(state: &mut GameState) -> usize {
    let mut pieces = 0;
    while !state.is_game_over() {
        state.apply_action(GameAction::HardDrop);
        state.tick(0);
        pieces += 1;
        assert!(pieces < 1_000, "game never ended");
    }
    pieces
}

#[test]
fn test_game_lifecycle() {
    let mut state = GameState::new(12345);
    assert_eq!(state.phase(), GamePhase::Running);

    assert!(state.apply_action(GameAction::TogglePause));
    assert_eq!(state.phase(), GamePhase::Paused);
    assert!(state.apply_action(GameAction::TogglePause));
    assert_eq!(state.phase(), GamePhase::Running);

    drop_until_over(&mut state);
    assert_eq!(state.phase(), GamePhase::GameOver);

    assert!(state.apply_action(GameAction::Restart));
    assert_eq!(state.phase(), GamePhase::Running);
    assert_eq!(state.board().filled_count(), 0);
}

#[test]
fn test_same_seed_replays_identically() {
    let actions = [
        GameAction::MoveLeft,
        GameAction::Rotate,
        GameAction::HardDrop,
        GameAction::MoveRight,
        GameAction::MoveRight,
        GameAction::RotateCcw,
        GameAction::Hold,
        GameAction::SoftDrop,
        GameAction::HardDrop,
    ];

    let play = |seed| {
        let mut state = GameState::new(seed);
        for _ in 0..10 {
            for action in actions {
                state.apply_action(action);
                state.tick(16);
            }
        }
        state.snapshot()
    };

    assert_eq!(play(77), play(77));
}

#[test]
fn test_gravity_reaches_floor() {
    let seed = seed_starting_with(PieceKind::O);
    let mut state = GameState::new(seed);

    // 18 rows at 1000ms each, then one more step to lock.
    for _ in 0..18 {
        state.tick(1000);
    }
    assert_eq!(state.player().pos.y, 18);
    assert_eq!(state.board().filled_count(), 0);

    state.tick(1000);
    assert_eq!(state.board().filled_count(), 4);
    assert_eq!(state.player().pos.y, 0);
}

#[test]
fn test_small_ticks_add_up() {
    let mut state = GameState::new(5);
    for _ in 0..62 {
        state.tick(16);
    }
    // 992ms so far.
    assert_eq!(state.player().pos.y, 0);
    state.tick(16);
    assert_eq!(state.player().pos.y, 1);
}

#[test]
fn test_tetris_scores_800() {
    let seed = seed_starting_with(PieceKind::I);
    let mut board = Board::new();
    for y in 16..20 {
        for x in 0..BOARD_WIDTH as i8 {
            if x != 0 {
                board.set(x, y, Some(PieceKind::J));
            }
        }
    }
    let mut state = GameState::with_board(seed, board);
    assert_eq!(state.player().kind, PieceKind::I);

    // Stand the I up in column 0.
    state.apply_action(GameAction::Rotate);
    while state.apply_action(GameAction::MoveLeft) {}
    state.apply_action(GameAction::HardDrop);
    state.tick(0);

    assert_eq!(state.lines(), 4);
    // 800 * (0 + 1) + 50 * 1
    assert_eq!(state.score(), 850);
    assert_eq!(state.board().filled_count(), 0);
}

#[test]
fn test_queue_length_constant_through_game() {
    let mut state = GameState::with_randomizer(3, Randomizer::SevenBag);
    for _ in 0..30 {
        if state.is_game_over() {
            break;
        }
        assert_eq!(state.next_pieces().len(), NEXT_QUEUE_LEN);
        state.apply_action(GameAction::HardDrop);
        state.tick(0);
    }
}

#[test]
fn test_seven_bag_first_seven_pieces_are_distinct() {
    let state = GameState::with_randomizer(11, Randomizer::SevenBag);
    let mut seen = vec![state.player().kind];
    seen.extend_from_slice(state.next_pieces());

    let mut state = state;
    for _ in 0..2 {
        state.apply_action(GameAction::HardDrop);
        state.tick(0);
        seen.push(state.next_pieces()[NEXT_QUEUE_LEN - 1]);
    }

    seen.sort_by_key(|k| k.index());
    seen.dedup();
    assert_eq!(seen.len(), 7);
}

/// Current piece followed by the preview queue.
fn upcoming(state: &GameState) -> Vec<PieceKind> {
    let mut pieces = vec![state.player().kind];
    pieces.extend_from_slice(state.next_pieces());
    pieces
}

/// Play `drops` pieces straight down from `seed`, then restart.
fn restart_after(seed: u32, drops: usize) -> GameState {
    let mut state = GameState::new(seed);
    for _ in 0..drops {
        state.apply_action(GameAction::HardDrop);
        state.tick(0);
    }
    state.restart();
    state
}

#[test]
fn test_restart_starts_a_different_sequence() {
    let first = upcoming(&GameState::new(99));
    let restarted = restart_after(99, 5);

    assert_ne!(upcoming(&restarted), first);
    assert_eq!(restarted.randomizer(), Randomizer::Uniform);
    assert_eq!(restarted.score(), 0);
    assert_eq!(restarted.lines(), 0);
    assert_eq!(restarted.board().filled_count(), 0);
    assert_eq!(restarted.next_pieces().len(), NEXT_QUEUE_LEN);
}

#[test]
fn test_restart_sequence_is_reproducible_from_history() {
    // Same seed and same play: the restarted game is the same.
    assert_eq!(upcoming(&restart_after(99, 5)), upcoming(&restart_after(99, 5)));
    // A different history draws a different number of pieces first.
    assert_ne!(upcoming(&restart_after(99, 5)), upcoming(&restart_after(99, 0)));
}

#[test]
fn test_restart_keeps_seven_bag() {
    let mut state = GameState::with_randomizer(4, Randomizer::SevenBag);
    state.restart();
    assert_eq!(state.randomizer(), Randomizer::SevenBag);

    // A fresh bag: the first seven pieces of the new game are all distinct.
    let mut seen = upcoming(&state);
    for _ in 0..2 {
        state.apply_action(GameAction::HardDrop);
        state.tick(0);
        seen.push(state.next_pieces()[NEXT_QUEUE_LEN - 1]);
    }
    seen.sort_by_key(|k| k.index());
    seen.dedup();
    assert_eq!(seen.len(), 7);
}

#[test]
fn test_session_drives_a_full_game() {
    let mut session = Session::new(2024);
    let mut frames = 0;
    while !session.state().is_game_over() {
        session.push(GameAction::HardDrop);
        session.advance(16);
        frames += 1;
        assert!(frames < 1_000);
    }

    session.push(GameAction::Restart);
    session.drain();
    assert_eq!(session.state().phase(), GamePhase::Running);
}
