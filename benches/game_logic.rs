use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{try_rotate, Board, GameSnapshot, GameState, Player};
use blockfall::engine::Session;
use blockfall::term::{FrameBuffer, GameView, Viewport};
use blockfall::types::{GameAction, PieceKind};

fn bench_tick(c: &mut Criterion) {
    let mut state = GameState::new(12345);

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            if state.is_game_over() {
                state.restart();
            }
            state.tick(black_box(16));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    let mut board = Board::new();
    for y in 16..20 {
        for x in 0..10 {
            board.set(x, y, Some(PieceKind::I));
        }
    }

    c.bench_function("clear_4_lines", |b| {
        b.iter(|| black_box(&board).clear_lines())
    });
}

fn bench_hard_drop_and_lock(c: &mut Criterion) {
    let mut state = GameState::new(12345);

    c.bench_function("hard_drop_lock", |b| {
        b.iter(|| {
            if state.is_game_over() {
                state.restart();
            }
            state.apply_action(GameAction::HardDrop);
            state.tick(0);
        })
    });
}

fn bench_move(c: &mut Criterion) {
    let mut state = GameState::new(12345);

    c.bench_function("move_left_right", |b| {
        b.iter(|| {
            state.move_left();
            state.move_right();
        })
    });
}

fn bench_try_rotate(c: &mut Criterion) {
    let board = Board::new();
    let player = Player::spawn(PieceKind::T);

    c.bench_function("try_rotate", |b| {
        b.iter(|| try_rotate(black_box(&player), &board, 1))
    });
}

fn bench_session_frame(c: &mut Criterion) {
    let mut session = Session::new(12345);
    let view = GameView::default();
    let mut fb = FrameBuffer::new(80, 24);
    let mut snap = GameSnapshot::default();

    c.bench_function("session_frame_render", |b| {
        b.iter(|| {
            session.push(GameAction::MoveLeft);
            session.advance(16);
            session.state().snapshot_into(&mut snap);
            view.render_into(&snap, session.particles(), Viewport::new(80, 24), &mut fb);
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_hard_drop_and_lock,
    bench_move,
    bench_try_rotate,
    bench_session_frame
);
criterion_main!(benches);
