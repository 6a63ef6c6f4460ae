//! Deterministic falling-block puzzle engine.
//!
//! The crate owns the play-field, the active piece, scoring, and all
//! timing rules, and exposes them through three pure functions:
//!
//! - [`create_initial_game_state`] builds a fresh [`GameState`] from an
//!   [`EngineConfig`] and an integer seed;
//! - [`apply_action`] applies one discrete input (move, rotate, hold,
//!   hard drop, pause, restart);
//! - [`step_game`] advances gravity and lock-delay timing by a frame
//!   delta.
//!
//! Both transitions return a new state value, so a host can snapshot,
//! fork, and replay games freely; the whole run is a pure function of
//! the seed and the input sequence. Rendering, input mapping, audio,
//! and persistence are host concerns — the engine never touches the
//! clock, the screen, or a file.
//!
//! Piece shapes and wall-kick data are consulted through the
//! [`RotationSystem`] lookup; [`Srs`] provides the standard tables.

pub mod config;
pub mod core;
pub mod types;

pub use config::EngineConfig;
pub use core::board::{collides, ghost_y, merge_piece, Board};
pub use core::game_state::{
    apply_action, create_initial_game_state, step_game, GameState, GameStats, LockEvent,
    RuntimeState, ScoringState,
};
pub use core::pieces::{for_each_piece_cell, ActivePiece, RotationSystem, Srs};
pub use types::{Cell, EngineAction, PieceKind, Rotation, Spin, Status};
