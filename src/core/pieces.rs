//! Piece geometry and the rotation-system lookup.
//!
//! The engine never branches on piece kinds itself; it asks a
//! [`RotationSystem`] for the occupied cells of a `(kind, rotation)`
//! pair and for the ordered kick candidates of a rotation transition.
//! [`Srs`] ships the Standard Rotation System tables as the default
//! implementation. Reference: <https://tetris.wiki/SRS>
//!
//! Kick offsets are stored in the conventional y-up form and applied by
//! the engine as `(x + dx, y - dy)`, since board rows grow downward.

use crate::config::EngineConfig;
use crate::types::{PieceKind, Rotation};

/// A single cell offset relative to the piece anchor.
pub type Offset = (i8, i8);

/// The four cells a piece occupies, relative to its anchor.
pub type PieceCells = [Offset; 4];

/// Lookup capability for piece shapes and wall-kick candidates.
///
/// Implementations must be total: every `(kind, rotation)` pair has
/// cells, and every quarter-turn transition has a candidate list. The
/// engine consults the table by value and never caches across calls, so
/// a host may swap in a different rotation system wholesale.
pub trait RotationSystem {
    /// Occupied cells for `kind` in rotation state `rotation`.
    fn cells(&self, kind: PieceKind, rotation: Rotation) -> PieceCells;

    /// Ordered kick candidates for the quarter-turn `from -> to`.
    ///
    /// The first candidate is conventionally `(0, 0)` (the unkicked
    /// position). Half turns never reach this lookup; they use
    /// [`HALF_TURN_KICKS`].
    fn kicks(&self, kind: PieceKind, from: Rotation, to: Rotation) -> &[Offset];
}

/// Kick candidates for half-turn rotations, shared by every kind.
pub const HALF_TURN_KICKS: [Offset; 4] = [(0, 0), (1, 0), (-1, 0), (0, 1)];

/// The Standard Rotation System data tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Srs;

impl RotationSystem for Srs {
    fn cells(&self, kind: PieceKind, rotation: Rotation) -> PieceCells {
        match kind {
            PieceKind::I => i_cells(rotation),
            PieceKind::O => O_CELLS,
            PieceKind::T => t_cells(rotation),
            PieceKind::S => s_cells(rotation),
            PieceKind::Z => z_cells(rotation),
            PieceKind::J => j_cells(rotation),
            PieceKind::L => l_cells(rotation),
        }
    }

    fn kicks(&self, kind: PieceKind, from: Rotation, to: Rotation) -> &[Offset] {
        let table = match kind {
            PieceKind::I => &I_KICKS,
            PieceKind::O => &O_KICKS,
            _ => &JLSTZ_KICKS,
        };
        match transition_row(from, to) {
            Some(row) => &table[row],
            // Not a quarter turn; no kick data exists for it.
            None => &UNKICKED,
        }
    }
}

const UNKICKED: [Offset; 1] = [(0, 0)];

/// Row index into the kick tables for a quarter-turn transition.
fn transition_row(from: Rotation, to: Rotation) -> Option<usize> {
    use Rotation::*;
    match (from, to) {
        (North, East) => Some(0),
        (East, North) => Some(1),
        (East, South) => Some(2),
        (South, East) => Some(3),
        (South, West) => Some(4),
        (West, South) => Some(5),
        (West, North) => Some(6),
        (North, West) => Some(7),
        _ => None,
    }
}

/// JLSTZ kick table, rows ordered as in [`transition_row`].
const JLSTZ_KICKS: [[Offset; 5]; 8] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // N->E
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // E->N
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // E->S
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // S->E
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // S->W
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // W->S
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // W->N
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // N->W
];

/// I-piece kick table (the I piece kicks differently from everything else).
const I_KICKS: [[Offset; 5]; 8] = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // N->E
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // E->N
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // E->S
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // S->E
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // S->W
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // W->S
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // W->N
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // N->W
];

/// The O piece rotates in place; every candidate list is just the origin.
const O_KICKS: [[Offset; 5]; 8] = [[(0, 0); 5]; 8];

/// O piece cells, identical in every rotation state.
const O_CELLS: PieceCells = [(1, 0), (2, 0), (1, 1), (2, 1)];

fn i_cells(rotation: Rotation) -> PieceCells {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

fn t_cells(rotation: Rotation) -> PieceCells {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn s_cells(rotation: Rotation) -> PieceCells {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn z_cells(rotation: Rotation) -> PieceCells {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn j_cells(rotation: Rotation) -> PieceCells {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn l_cells(rotation: Rotation) -> PieceCells {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// The currently falling piece.
///
/// `(x, y)` is the anchor in board cell coordinates; the occupied cells
/// come from the rotation system. `y` may be negative while the piece
/// is above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    /// A fresh piece at the spawn position: rotation 0, horizontally
    /// centered, anchored at the top row.
    pub fn spawn(kind: PieceKind, config: &EngineConfig) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: (config.width / 2) as i8 - 2,
            y: 0,
        }
    }

    /// Cell offsets for the current rotation state.
    pub fn shape(&self, rules: &impl RotationSystem) -> PieceCells {
        rules.cells(self.kind, self.rotation)
    }
}

/// Call `f` with the absolute board coordinates of every cell of `piece`.
pub fn for_each_piece_cell(
    piece: &ActivePiece,
    rules: &impl RotationSystem,
    mut f: impl FnMut(i8, i8),
) {
    for &(dx, dy) in &piece.shape(rules) {
        f(piece.x + dx, piece.y + dy);
    }
}
