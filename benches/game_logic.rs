use criterion::{black_box, criterion_group, criterion_main, Criterion};

use blockfall::{
    apply_action, create_initial_game_state, step_game, Board, EngineAction, EngineConfig,
    PieceKind, Srs,
};

fn started() -> (blockfall::GameState, EngineConfig) {
    let config = EngineConfig::default();
    let state = create_initial_game_state(&config, 12345);
    let state = apply_action(&state, EngineAction::Start, &config, &Srs);
    (state, config)
}

fn bench_step(c: &mut Criterion) {
    let (state, config) = started();
    c.bench_function("step_16ms", |b| {
        b.iter(|| step_game(&state, black_box(16.0), false, &config, &Srs))
    });
}

fn bench_clear_lines(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new(10, 22);
            for y in 18..22 {
                for x in 0..10 {
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            board.clear_lines()
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let (state, config) = started();
    c.bench_function("hard_drop_lock_spawn", |b| {
        b.iter(|| apply_action(&state, black_box(EngineAction::HardDrop), &config, &Srs))
    });
}

fn bench_shift(c: &mut Criterion) {
    let (state, config) = started();
    c.bench_function("shift_right", |b| {
        b.iter(|| apply_action(&state, black_box(EngineAction::MoveRight), &config, &Srs))
    });
}

fn bench_rotate(c: &mut Criterion) {
    let (state, config) = started();
    c.bench_function("rotate_cw", |b| {
        b.iter(|| apply_action(&state, black_box(EngineAction::RotateCw), &config, &Srs))
    });
}

criterion_group!(
    benches,
    bench_step,
    bench_clear_lines,
    bench_hard_drop,
    bench_shift,
    bench_rotate
);
criterion_main!(benches);
