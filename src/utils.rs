// Screen <-> board coordinate helpers for presentation layers

use crate::board::Square;
use crate::error::{GameError, GameResult};

pub const CELL_SIZE: i32 = 80;
pub const BOARD_ORIGIN_X: i32 = 320;
pub const BOARD_ORIGIN_Y: i32 = 40;

/// Pixel geometry of a drawn board. The cell size is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    origin_x: i32,
    origin_y: i32,
    cell_size: i32,
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            origin_x: BOARD_ORIGIN_X,
            origin_y: BOARD_ORIGIN_Y,
            cell_size: CELL_SIZE,
        }
    }
}

impl ScreenLayout {
    pub fn new(origin_x: i32, origin_y: i32, cell_size: i32) -> GameResult<Self> {
        if cell_size <= 0 {
            return Err(GameError::Layout(format!("cell size must be positive, got {}", cell_size)));
        }
        Ok(Self {
            origin_x,
            origin_y,
            cell_size,
        })
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Cell under a pixel. Uses floor division, so pixels left of or above
    /// the board land on negative cells; check `Square::is_on_board`.
    pub fn cell_at(&self, x: i32, y: i32) -> Square {
        let row = y.saturating_sub(self.origin_y).div_euclid(self.cell_size);
        let col = x.saturating_sub(self.origin_x).div_euclid(self.cell_size);
        Square::new(saturate(row), saturate(col))
    }

    /// Top-left pixel of a cell
    pub fn cell_origin(&self, sq: Square) -> (i32, i32) {
        (
            self.origin_x + sq.col as i32 * self.cell_size,
            self.origin_y + sq.row as i32 * self.cell_size,
        )
    }
}

#[inline]
fn saturate(v: i32) -> i8 {
    v.clamp(i8::MIN as i32, i8::MAX as i32) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_at_edges() {
        let layout = ScreenLayout::default();
        assert_eq!(layout.cell_at(320, 40), Square::new(0, 0));
        assert_eq!(layout.cell_at(399, 119), Square::new(0, 0));
        assert_eq!(layout.cell_at(400, 120), Square::new(1, 1));
        assert_eq!(layout.cell_at(959, 679), Square::new(7, 7));
        assert!(!layout.cell_at(960, 680).is_on_board());
    }

    #[test]
    fn negative_offsets_round_down() {
        let layout = ScreenLayout::default();
        // one pixel left of the board is column -1, not 0
        assert_eq!(layout.cell_at(319, 40), Square::new(0, -1));
        assert_eq!(layout.cell_at(320, 39).row, -1);
        assert!(!layout.cell_at(0, 0).is_on_board());
    }

    #[test]
    fn huge_coordinates_stay_off_board() {
        let layout = ScreenLayout::default();
        assert!(!layout.cell_at(i32::MAX / 2, 100).is_on_board());
    }

    #[test]
    fn cell_origin_inverts_cell_at() {
        let layout = ScreenLayout::new(10, 5, 64).unwrap();
        let sq = Square::new(3, 6);
        let (x, y) = layout.cell_origin(sq);
        assert_eq!(layout.cell_at(x, y), sq);
        assert_eq!(layout.cell_at(x + 63, y + 63), sq);
    }

    #[test]
    fn non_positive_cell_size_is_rejected() {
        for size in [0, -80] {
            assert!(matches!(ScreenLayout::new(320, 40, size), Err(GameError::Layout(_))));
        }
        let layout = ScreenLayout::new(0, 0, 1).unwrap();
        assert_eq!(layout.cell_at(3, 5), Square::new(5, 3));
        assert_eq!(layout.origin(), (0, 0));
        assert_eq!(layout.cell_size(), 1);
    }
}
