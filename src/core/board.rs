//! Board geometry.
//!
//! The board is a `width x total_rows` grid with row 0 at the top; the
//! first `hidden_rows` rows sit above the visible play-field so pieces
//! can spawn off-screen. Cells are stored row-major in a flat buffer.
//! All piece-level operations here are pure geometry: collision
//! testing, merging, row sweeping, and the ghost position.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::core::pieces::{ActivePiece, RotationSystem};
use crate::types::Cell;

/// The play-field grid. Dimensions are fixed at creation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Set the cell at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// True when `(x, y)` is inside the grid and filled.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    fn is_row_full(&self, y: usize) -> bool {
        let start = y * self.width as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .all(Cell::is_some)
    }

    /// Remove every full row, shifting survivors down and refilling the
    /// top with empty rows so the height never changes. Returns the
    /// cleared row indices, top to bottom. A single lock can complete at
    /// most four rows.
    pub fn clear_lines(&mut self) -> ArrayVec<usize, 4> {
        let mut cleared = ArrayVec::new();
        let width = self.width as usize;
        let mut write_y = self.height as usize;

        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y) {
                if !cleared.is_full() {
                    cleared.push(read_y);
                }
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src = read_y * width;
                    self.cells.copy_within(src..src + width, write_y * width);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared.reverse();
        cleared
    }

    /// Flat view of the grid, row-major from the top.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// The rows below the hidden spawn area, for rendering.
    pub fn visible_rows<'a>(
        &'a self,
        config: &EngineConfig,
    ) -> impl Iterator<Item = &'a [Cell]> + 'a {
        self.rows().skip(config.hidden_rows as usize)
    }
}

/// True when any cell of `piece` leaves the horizontal bounds, reaches
/// below the bottom row, or overlaps a filled cell. Cells above the grid
/// (negative `y`) never collide, which is what lets pieces spawn above
/// the visible area.
pub fn collides(board: &Board, piece: &ActivePiece, rules: &impl RotationSystem) -> bool {
    piece.shape(rules).iter().any(|&(dx, dy)| {
        let x = piece.x + dx;
        let y = piece.y + dy;
        if x < 0 || x >= board.width() as i8 {
            return true;
        }
        if y >= board.height() as i8 {
            return true;
        }
        y >= 0 && board.is_occupied(x, y)
    })
}

/// Stamp `piece` into the board. Cells outside the grid are skipped;
/// the caller is expected to have collision-checked the position.
pub fn merge_piece(board: &mut Board, piece: &ActivePiece, rules: &impl RotationSystem) {
    for &(dx, dy) in &piece.shape(rules) {
        board.set(piece.x + dx, piece.y + dy, Some(piece.kind));
    }
}

/// The lowest `y` the piece can reach by straight descent from its
/// current position.
pub fn ghost_y(board: &Board, piece: &ActivePiece, rules: &impl RotationSystem) -> i8 {
    let mut probe = *piece;
    loop {
        let below = ActivePiece {
            y: probe.y + 1,
            ..probe
        };
        if collides(board, &below, rules) {
            return probe.y;
        }
        probe = below;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pieces::Srs;
    use crate::types::{PieceKind, Rotation};

    fn board() -> Board {
        Board::new(10, 22)
    }

    fn piece(kind: PieceKind, x: i8, y: i8) -> ActivePiece {
        ActivePiece {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = board();
        assert_eq!(board.cells().len(), 220);
        assert!(board.cells().iter().all(Cell::is_none));
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut board = board();
        board.set(4, 7, Some(PieceKind::T));
        assert_eq!(board.get(4, 7), Some(Some(PieceKind::T)));
        board.set(4, 7, None);
        assert_eq!(board.get(4, 7), Some(None));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut board = board();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(10, 0), None);
        assert_eq!(board.get(0, 22), None);
        // Silently ignored.
        board.set(-1, 0, Some(PieceKind::I));
        board.set(10, 21, Some(PieceKind::I));
        assert!(board.cells().iter().all(Cell::is_none));
    }

    #[test]
    fn test_collides_walls_and_floor() {
        let board = board();
        assert!(!collides(&board, &piece(PieceKind::O, 3, 0), &Srs));
        // O occupies columns x+1..=x+2.
        assert!(collides(&board, &piece(PieceKind::O, -2, 0), &Srs));
        assert!(collides(&board, &piece(PieceKind::O, 8, 0), &Srs));
        // Bottom row is y = 21; O occupies rows y..=y+1.
        assert!(!collides(&board, &piece(PieceKind::O, 3, 20), &Srs));
        assert!(collides(&board, &piece(PieceKind::O, 3, 21), &Srs));
    }

    #[test]
    fn test_cells_above_grid_never_collide() {
        let board = board();
        assert!(!collides(&board, &piece(PieceKind::I, 3, -2), &Srs));
    }

    #[test]
    fn test_collides_with_stack() {
        let mut board = board();
        board.set(4, 10, Some(PieceKind::L));
        assert!(collides(&board, &piece(PieceKind::O, 3, 9), &Srs));
        assert!(!collides(&board, &piece(PieceKind::O, 5, 9), &Srs));
    }

    #[test]
    fn test_merge_stamps_kind() {
        let mut board = board();
        merge_piece(&mut board, &piece(PieceKind::S, 3, 5), &Srs);
        assert_eq!(board.get(4, 5), Some(Some(PieceKind::S)));
        assert_eq!(board.get(5, 5), Some(Some(PieceKind::S)));
        assert_eq!(board.get(3, 6), Some(Some(PieceKind::S)));
        assert_eq!(board.get(4, 6), Some(Some(PieceKind::S)));
        assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 4);
    }

    #[test]
    fn test_merge_skips_cells_above_grid() {
        let mut board = board();
        merge_piece(&mut board, &piece(PieceKind::I, 3, -1), &Srs);
        // I at North sits on row y+1 = 0; nothing lands outside.
        assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 4);
    }

    #[test]
    fn test_clear_lines_preserves_height_and_order() {
        let mut board = board();
        for x in 0..10 {
            board.set(x, 20, Some(PieceKind::I));
            board.set(x, 21, Some(PieceKind::O));
        }
        board.set(0, 19, Some(PieceKind::T));

        let cleared = board.clear_lines();
        assert_eq!(cleared.as_slice(), &[20, 21]);
        assert_eq!(board.cells().len(), 220);
        // The survivor shifted down by two.
        assert_eq!(board.get(0, 21), Some(Some(PieceKind::T)));
        assert_eq!(board.get(0, 19), Some(None));
    }

    #[test]
    fn test_clear_lines_nothing_full() {
        let mut board = board();
        board.set(0, 21, Some(PieceKind::J));
        assert!(board.clear_lines().is_empty());
        assert_eq!(board.get(0, 21), Some(Some(PieceKind::J)));
    }

    #[test]
    fn test_clear_lines_interleaved_rows() {
        let mut board = board();
        for x in 0..10 {
            board.set(x, 15, Some(PieceKind::T));
            board.set(x, 18, Some(PieceKind::T));
        }
        board.set(1, 14, Some(PieceKind::J));
        board.set(2, 17, Some(PieceKind::L));

        let cleared = board.clear_lines();
        assert_eq!(cleared.as_slice(), &[15, 18]);
        // Marker above both cleared rows drops by two, the one between
        // them drops by one.
        assert_eq!(board.get(1, 16), Some(Some(PieceKind::J)));
        assert_eq!(board.get(2, 18), Some(Some(PieceKind::L)));
    }

    #[test]
    fn test_ghost_on_empty_board() {
        let board = board();
        // O occupies rows y..=y+1, so it rests anchored at 20.
        assert_eq!(ghost_y(&board, &piece(PieceKind::O, 3, 0), &Srs), 20);
    }

    #[test]
    fn test_ghost_lands_on_stack() {
        let mut board = board();
        for x in 0..10 {
            board.set(x, 21, Some(PieceKind::I));
        }
        assert_eq!(ghost_y(&board, &piece(PieceKind::O, 3, 0), &Srs), 19);
    }

    #[test]
    fn test_visible_rows_skips_hidden() {
        let config = EngineConfig::default();
        let mut board = board();
        board.set(0, 1, Some(PieceKind::Z));
        board.set(0, 2, Some(PieceKind::S));
        let first = board.visible_rows(&config).next().unwrap();
        // Row 2 is the first visible row.
        assert_eq!(first[0], Some(PieceKind::S));
        assert_eq!(board.visible_rows(&config).count(), 20);
    }
}
