//! Game state machine.
//!
//! Ties the board, piece table, randomizer, and scoring together. The
//! public surface is three pure functions: [`create_initial_game_state`],
//! [`apply_action`], and [`step_game`]. Each returns a fresh
//! [`GameState`]; illegal requests return the input state unchanged, so
//! there is no error type anywhere in the engine. Hosts own the single
//! current value and may clone it freely for replay or preview.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::core::board::{collides, ghost_y, merge_piece, Board};
use crate::core::pieces::{ActivePiece, RotationSystem, HALF_TURN_KICKS};
use crate::core::rng::{refill_queue, QUEUE_BUFFER};
use crate::core::scoring::{drop_score, gravity_cells_per_sec, level_for_lines, score_clear};
use crate::types::{EngineAction, PieceKind, Spin, Status};

/// Score, line, and chain bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringState {
    pub score: u32,
    pub lines: u32,
    /// Derived from `lines`, never below 1.
    pub level: u32,
    /// -1 while no chain is active; otherwise the number of consecutive
    /// clearing locks minus one.
    pub combo: i32,
    /// Set by a four-line clear, dropped by any smaller clear, carried
    /// through locks that clear nothing.
    pub back_to_back: bool,
}

impl Default for ScoringState {
    fn default() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
            combo: -1,
            back_to_back: false,
        }
    }
}

/// Per-piece transient timers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuntimeState {
    /// Fractional cells of descent owed to the piece.
    pub gravity_accum: f64,
    /// Milliseconds the piece has rested against an obstruction.
    pub lock_timer_ms: f64,
    /// Lock-timer restarts consumed by movement and rotation.
    pub lock_resets: u8,
}

/// Running per-game statistics. Observational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameStats {
    pub pieces_placed: u32,
    pub tetrises: u32,
    pub max_combo: i32,
}

/// Summary of the most recent lock, for hosts that flash cleared rows
/// or announce bonuses. Overwritten on every lock.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Row indices that were cleared, top to bottom.
    pub rows: ArrayVec<usize, 4>,
    /// Total score awarded for this lock, drop bonus included.
    pub score_delta: u32,
    pub combo: i32,
    pub back_to_back: bool,
    pub hard_drop: bool,
}

/// Complete game state.
///
/// Constructed by [`create_initial_game_state`] and advanced only by
/// [`apply_action`] and [`step_game`]. All fields are reachable through
/// accessors; mutation goes through the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    board: Board,
    active: Option<ActivePiece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    queue: Vec<PieceKind>,
    /// Randomizer state; advances one step per generated bag.
    seed: u32,
    scoring: ScoringState,
    runtime: RuntimeState,
    stats: GameStats,
    last_event: Option<LockEvent>,
    status: Status,
}

/// Build a fresh game. The queue is filled immediately so the preview
/// is available while the game is still idle; no piece spawns until
/// [`EngineAction::Start`].
pub fn create_initial_game_state(config: &EngineConfig, seed: u32) -> GameState {
    let mut queue = Vec::new();
    let seed = refill_queue(&mut queue, seed, config.preview_count + QUEUE_BUFFER);
    GameState {
        board: Board::new(config.width, config.total_rows()),
        active: None,
        hold: None,
        can_hold: true,
        queue,
        seed,
        scoring: ScoringState::default(),
        runtime: RuntimeState::default(),
        stats: GameStats::default(),
        last_event: None,
        status: Status::Idle,
    }
}

/// Apply one discrete input and return the resulting state.
///
/// `Restart` is legal in any status; `Start` only from idle;
/// `TogglePause` anywhere except game over; everything else requires an
/// active game. Rejected inputs return the state unchanged.
pub fn apply_action(
    state: &GameState,
    action: EngineAction,
    config: &EngineConfig,
    rules: &impl RotationSystem,
) -> GameState {
    let mut next = state.clone();
    match action {
        EngineAction::Restart => {
            return create_initial_game_state(config, state.seed.wrapping_add(7));
        }
        EngineAction::Start => {
            if next.status == Status::Idle {
                next.start(config, rules);
            }
        }
        EngineAction::TogglePause => match next.status {
            Status::Playing => next.status = Status::Paused,
            Status::Paused => next.status = Status::Playing,
            Status::Idle | Status::GameOver => {}
        },
        _ if next.status != Status::Playing => {}
        EngineAction::MoveLeft => {
            next.shift(-1, config, rules);
        }
        EngineAction::MoveRight => {
            next.shift(1, config, rules);
        }
        EngineAction::RotateCw => {
            next.rotate(Spin::Cw, config, rules);
        }
        EngineAction::RotateCcw => {
            next.rotate(Spin::Ccw, config, rules);
        }
        EngineAction::Rotate180 => {
            next.rotate(Spin::Half, config, rules);
        }
        EngineAction::HardDrop => {
            next.hard_drop(config, rules);
        }
        EngineAction::Hold => {
            next.hold_swap(config, rules);
        }
    }
    next
}

/// Advance gravity and lock timing by `delta_ms` and return the
/// resulting state. `soft_drop` reports whether the soft-drop input is
/// currently held. Does nothing unless the game is playing with an
/// active piece.
pub fn step_game(
    state: &GameState,
    delta_ms: f64,
    soft_drop: bool,
    config: &EngineConfig,
    rules: &impl RotationSystem,
) -> GameState {
    let mut next = state.clone();
    next.tick(delta_ms, soft_drop, config, rules);
    next
}

impl GameState {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Upcoming pieces, at most `config.preview_count` of them.
    pub fn preview<'a>(&'a self, config: &EngineConfig) -> &'a [PieceKind] {
        &self.queue[..config.preview_count.min(self.queue.len())]
    }

    /// Current randomizer state.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn scoring(&self) -> ScoringState {
        self.scoring
    }

    pub fn runtime(&self) -> RuntimeState {
        self.runtime
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn last_event(&self) -> Option<&LockEvent> {
        self.last_event.as_ref()
    }

    /// Take and clear the most recent lock summary.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Whether the active piece is resting on the floor or stack.
    pub fn is_grounded(&self, rules: &impl RotationSystem) -> bool {
        match self.active {
            Some(piece) => {
                let below = ActivePiece {
                    y: piece.y + 1,
                    ..piece
                };
                collides(&self.board, &below, rules)
            }
            None => false,
        }
    }

    fn start(&mut self, config: &EngineConfig, rules: &impl RotationSystem) {
        self.status = Status::Playing;
        self.spawn_next(config, rules);
    }

    /// Pull the next piece from the queue and place it at spawn. A
    /// blocked spawn is the one and only loss condition.
    fn spawn_next(&mut self, config: &EngineConfig, rules: &impl RotationSystem) {
        self.seed = refill_queue(
            &mut self.queue,
            self.seed,
            config.preview_count + QUEUE_BUFFER,
        );
        let kind = self.queue.remove(0);
        let piece = ActivePiece::spawn(kind, config);
        if collides(&self.board, &piece, rules) {
            self.active = None;
            self.status = Status::GameOver;
        } else {
            self.active = Some(piece);
        }
    }

    /// Restart the lock timer after a successful move or rotation,
    /// within the per-piece budget. Landing airborne clears both the
    /// timer and the spent credits.
    fn apply_lock_reset(&mut self, grounded: bool, config: &EngineConfig) {
        if !grounded {
            self.runtime.lock_timer_ms = 0.0;
            self.runtime.lock_resets = 0;
            return;
        }
        if self.runtime.lock_resets >= config.lock_reset_limit {
            return;
        }
        self.runtime.lock_timer_ms = 0.0;
        self.runtime.lock_resets += 1;
    }

    fn shift(&mut self, dx: i8, config: &EngineConfig, rules: &impl RotationSystem) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let moved = ActivePiece {
            x: piece.x + dx,
            ..piece
        };
        if collides(&self.board, &moved, rules) {
            return false;
        }
        self.active = Some(moved);
        let grounded = self.is_grounded(rules);
        self.apply_lock_reset(grounded, config);
        true
    }

    /// Rotate with wall kicks: candidates are tried in table order and
    /// the first legal placement wins. Table offsets are y-up, hence the
    /// `y - dy`.
    fn rotate(&mut self, spin: Spin, config: &EngineConfig, rules: &impl RotationSystem) -> bool {
        if spin == Spin::Half && !config.allow_rotate_180 {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let to = piece.rotation.rotated(spin);
        let candidates: &[(i8, i8)] = match spin {
            Spin::Half => &HALF_TURN_KICKS,
            Spin::Cw | Spin::Ccw => rules.kicks(piece.kind, piece.rotation, to),
        };

        for &(dx, dy) in candidates {
            let candidate = ActivePiece {
                rotation: to,
                x: piece.x + dx,
                y: piece.y - dy,
                ..piece
            };
            if !collides(&self.board, &candidate, rules) {
                self.active = Some(candidate);
                let grounded = self.is_grounded(rules);
                self.apply_lock_reset(grounded, config);
                return true;
            }
        }
        false
    }

    fn hard_drop(&mut self, config: &EngineConfig, rules: &impl RotationSystem) {
        let Some(piece) = self.active else {
            return;
        };
        let target = ghost_y(&self.board, &piece, rules);
        let distance = (target - piece.y) as u32;
        self.active = Some(ActivePiece { y: target, ..piece });
        self.lock_active(distance, true, config, rules);
    }

    /// Stash or swap the active piece. A swapped-in piece respawns at
    /// the spawn position; holding is blocked until the next lock.
    fn hold_swap(&mut self, config: &EngineConfig, rules: &impl RotationSystem) {
        if !self.can_hold {
            return;
        }
        let Some(active) = self.active else {
            return;
        };
        self.can_hold = false;
        self.runtime = RuntimeState::default();
        match self.hold.replace(active.kind) {
            Some(held) => {
                let piece = ActivePiece::spawn(held, config);
                if collides(&self.board, &piece, rules) {
                    self.active = None;
                    self.status = Status::GameOver;
                } else {
                    self.active = Some(piece);
                }
            }
            None => self.spawn_next(config, rules),
        }
    }

    /// Merge the active piece, sweep rows, score, and bring on the next
    /// piece. `drop_cells`/`hard` describe the hard drop that forced the
    /// lock, if any.
    fn lock_active(
        &mut self,
        drop_cells: u32,
        hard: bool,
        config: &EngineConfig,
        rules: &impl RotationSystem,
    ) {
        let Some(piece) = self.active.take() else {
            return;
        };

        merge_piece(&mut self.board, &piece, rules);
        let rows = self.board.clear_lines();
        let cleared = rows.len();

        let clear = score_clear(
            cleared,
            self.scoring.level,
            self.scoring.combo,
            self.scoring.back_to_back,
        );
        let delta = clear.total + drop_score(drop_cells, hard);
        self.scoring.score = self.scoring.score.saturating_add(delta);

        if cleared > 0 {
            self.scoring.combo += 1;
            self.scoring.lines += cleared as u32;
            self.scoring.level = level_for_lines(self.scoring.lines);
            self.scoring.back_to_back = cleared == 4;
            if cleared == 4 {
                self.stats.tetrises += 1;
            }
        } else {
            self.scoring.combo = -1;
            // back_to_back survives locks that clear nothing.
        }

        self.stats.pieces_placed += 1;
        self.stats.max_combo = self.stats.max_combo.max(self.scoring.combo);
        self.last_event = Some(LockEvent {
            lines_cleared: cleared as u32,
            rows,
            score_delta: delta,
            combo: self.scoring.combo,
            back_to_back: self.scoring.back_to_back,
            hard_drop: hard,
        });

        self.can_hold = true;
        self.runtime = RuntimeState::default();
        self.spawn_next(config, rules);
    }

    /// One time slice of gravity and lock timing.
    fn tick(
        &mut self,
        delta_ms: f64,
        soft_drop: bool,
        config: &EngineConfig,
        rules: &impl RotationSystem,
    ) {
        if self.status != Status::Playing {
            return;
        }
        let Some(mut piece) = self.active else {
            return;
        };

        let mut cells_per_sec = gravity_cells_per_sec(self.scoring.level);
        if soft_drop {
            cells_per_sec *= config.soft_drop_factor;
        }
        self.runtime.gravity_accum += delta_ms / 1000.0 * cells_per_sec;

        while self.runtime.gravity_accum >= 1.0 {
            self.runtime.gravity_accum -= 1.0;
            let below = ActivePiece {
                y: piece.y + 1,
                ..piece
            };
            if collides(&self.board, &below, rules) {
                // Consume a single unit for the failed step and leave
                // the rest of the accumulator for later ticks.
                break;
            }
            piece = below;
            self.runtime.lock_timer_ms = 0.0;
            self.runtime.lock_resets = 0;
            if soft_drop {
                self.scoring.score = self.scoring.score.saturating_add(drop_score(1, false));
            }
        }
        self.active = Some(piece);

        if self.is_grounded(rules) {
            self.runtime.lock_timer_ms += delta_ms;
            if self.runtime.lock_timer_ms >= config.lock_delay_ms {
                self.lock_active(0, false, config, rules);
            }
        } else {
            self.runtime.lock_timer_ms = 0.0;
            self.runtime.lock_resets = 0;
        }
    }
}
