//! Pure game logic: board geometry, piece tables, sequence generation,
//! scoring, and the state machine. Nothing here performs I/O or reads
//! the clock; time and randomness come in through `step_game` deltas
//! and the creation seed.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;

pub use board::{collides, ghost_y, merge_piece, Board};
pub use game_state::{
    apply_action, create_initial_game_state, step_game, GameState, GameStats, LockEvent,
    RuntimeState, ScoringState,
};
pub use pieces::{for_each_piece_cell, ActivePiece, PieceCells, RotationSystem, Srs};
pub use rng::{refill_queue, shuffled_bag, SeededRng, BAG_SIZE};
