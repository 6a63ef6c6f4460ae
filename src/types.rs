//! Shared plain data types.
//!
//! Everything here is pure data with no behavior beyond small helpers;
//! the game rules live under `core`.

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in canonical order. One bag is a shuffled copy of this.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];
}

/// Rotation states (North = spawn orientation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Numeric state in `[0, 4)`, North = 0, advancing clockwise.
    pub fn index(self) -> i8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Inverse of [`Rotation::index`]; any integer is normalized into `[0, 4)`.
    pub fn from_index(index: i8) -> Self {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// The state reached by applying `spin` to this one.
    pub fn rotated(self, spin: Spin) -> Self {
        Self::from_index(self.index() + spin.delta())
    }
}

/// A rotation request: quarter turn either way, or a half turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Spin {
    Cw,
    Ccw,
    Half,
}

impl Spin {
    /// Signed rotation-state delta.
    pub fn delta(self) -> i8 {
        match self {
            Spin::Cw => 1,
            Spin::Ccw => -1,
            Spin::Half => 2,
        }
    }
}

/// Discrete inputs accepted by the engine.
///
/// Soft drop is not an action: the host reports it as a flag on each
/// `step_game` call instead, since it modulates gravity continuously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineAction {
    Start,
    TogglePause,
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    Rotate180,
    HardDrop,
    Hold,
    Restart,
}

/// Game lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Cell on the board (None = empty, Some = filled with piece kind).
pub type Cell = Option<PieceKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_index_roundtrip() {
        for rotation in [
            Rotation::North,
            Rotation::East,
            Rotation::South,
            Rotation::West,
        ] {
            assert_eq!(Rotation::from_index(rotation.index()), rotation);
        }
    }

    #[test]
    fn test_rotation_normalizes_negative_indices() {
        assert_eq!(Rotation::from_index(-1), Rotation::West);
        assert_eq!(Rotation::from_index(-3), Rotation::East);
        assert_eq!(Rotation::from_index(5), Rotation::East);
    }

    #[test]
    fn test_spin_deltas() {
        assert_eq!(Rotation::North.rotated(Spin::Cw), Rotation::East);
        assert_eq!(Rotation::North.rotated(Spin::Ccw), Rotation::West);
        assert_eq!(Rotation::North.rotated(Spin::Half), Rotation::South);
        assert_eq!(Rotation::West.rotated(Spin::Cw), Rotation::North);
        assert_eq!(Rotation::East.rotated(Spin::Half), Rotation::West);
    }

    #[test]
    fn test_all_kinds_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
