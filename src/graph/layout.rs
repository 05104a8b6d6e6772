use serde::{Deserialize, Serialize};

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Row/column placement for newly added nodes.
///
/// Slot `n` lands in row `n / columns` and column `n % columns`. Slots are handed out from
/// the graph's id counter, so deleting a node never moves the others or frees its slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub origin: Position,
    pub columns: u64,
    pub column_gap: f64,
    pub row_gap: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            origin: Position { x: 100.0, y: 100.0 },
            columns: 3,
            column_gap: 300.0,
            row_gap: 150.0,
        }
    }
}

impl GridLayout {
    pub fn position(&self, slot: u64) -> Position {
        let columns = self.columns.max(1);
        let row = slot / columns;
        let col = slot % columns;
        Position {
            x: self.origin.x + col as f64 * self.column_gap,
            y: self.origin.y + row as f64 * self.row_gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_wraps_after_three_columns() {
        let layout = GridLayout::default();
        assert_eq!(layout.position(0), Position { x: 100.0, y: 100.0 });
        assert_eq!(layout.position(2), Position { x: 700.0, y: 100.0 });
        assert_eq!(layout.position(3), Position { x: 100.0, y: 250.0 });
        assert_eq!(layout.position(7), Position { x: 400.0, y: 400.0 });
    }
}
