//! Grid layout - rows of cells, each column as wide as its widest cell.

use tracing::trace;

use crate::engine::{Node, SizeCtx, WidgetBase};
use crate::error::{GuiError, Result};
use crate::types::{Anchor, Point, Rect, point, relative_point, size};

use super::DEFAULT_PADDING;

type Cell = Option<Box<dyn Node>>;

/// A matrix of optional cells. Rows may be jagged; a missing or `None` cell
/// only contributes padding to its row and column.
///
/// Column widths and row heights are computed independently of each other,
/// and each includes the padding before it. The last column and row also
/// carry the trailing padding, so the track sums equal the grid's size.
pub struct GridLayout {
    base: WidgetBase,
    rows: Vec<Vec<Cell>>,
    anchor: Anchor,
    padding: i32,
    offset: Point,
    column_widths: Vec<i32>,
    row_heights: Vec<i32>,
}

impl std::fmt::Debug for GridLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridLayout")
            .field("rect", &self.base.rect)
            .field("rows", &self.rows.len())
            .field("column_widths", &self.column_widths)
            .field("row_heights", &self.row_heights)
            .finish()
    }
}

impl GridLayout {
    /// Build a grid. Fails when no row has a single cell slot.
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self> {
        if rows.iter().all(Vec::is_empty) {
            return Err(GuiError::EmptyGrid);
        }
        Ok(Self {
            base: WidgetBase::new(),
            rows,
            anchor: Anchor::TopLeft,
            padding: DEFAULT_PADDING,
            offset: point(0, 0),
            column_widths: Vec::new(),
            row_heights: Vec::new(),
        })
    }

    /// Where each cell sits inside its track rectangle.
    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn padding(mut self, padding: i32) -> Self {
        self.padding = padding;
        self
    }

    /// Shift applied to every cell after anchoring.
    pub fn offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    pub fn column_widths(&self) -> &[i32] {
        &self.column_widths
    }

    pub fn row_heights(&self) -> &[i32] {
        &self.row_heights
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&dyn Node> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut dyn Node> {
        match self.rows.get_mut(row)?.get_mut(col)? {
            Some(cell) => Some(&mut **cell),
            None => None,
        }
    }

    /// Replace a cell, growing the row as needed. The old cell is released
    /// and returned.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Option<Box<dyn Node>> {
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if col >= cells.len() {
            cells.resize_with(col + 1, || None);
        }
        let mut old = std::mem::replace(&mut cells[col], cell);
        if let Some(old) = old.as_mut() {
            old.delete();
        }
        self.base.request_layout();
        old
    }

    fn cells_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Node>> {
        self.rows.iter_mut().flatten().flatten()
    }
}

impl Node for GridLayout {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        let Some(ctx) = ctx else {
            return;
        };
        self.base.attach(ctx.link);

        let p = self.padding;
        let mut widths = vec![p; self.columns()];
        let mut heights = vec![p; self.rows.len()];
        for (r, row) in self.rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                let Some(cell) = cell else {
                    continue;
                };
                cell.size(Some(ctx));
                let s = cell.rect().size();
                widths[c] = widths[c].max(s.width + p);
                heights[r] = heights[r].max(s.height + p);
            }
        }
        if let Some(last) = widths.last_mut() {
            *last += p;
        }
        if let Some(last) = heights.last_mut() {
            *last += p;
        }

        let width = widths.iter().sum();
        let height = heights.iter().sum();
        self.column_widths = widths;
        self.row_heights = heights;
        self.base.set_size(size(width, height));
        trace!(width, height, columns = self.column_widths.len(), "grid size");
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let p = self.padding;
        let (anchor, offset) = (self.anchor, self.offset);
        let last_row = self.row_heights.len().saturating_sub(1);
        let last_col = self.column_widths.len().saturating_sub(1);

        let mut row_top = y + self.base.rect.height;
        for (r, row) in self.rows.iter_mut().enumerate() {
            let row_height = self.row_heights.get(r).copied().unwrap_or(p);
            let inner_height = row_height - p - if r == last_row { p } else { 0 };
            let mut col_left = x;
            for (c, cell) in row.iter_mut().enumerate() {
                let col_width = self.column_widths.get(c).copied().unwrap_or(p);
                if let Some(cell) = cell {
                    let inner_width = col_width - p - if c == last_col { p } else { 0 };
                    let region = Rect::new(col_left + p, row_top - p - inner_height, inner_width, inner_height);
                    let at = relative_point(&region, anchor, cell.rect().size(), None, offset);
                    cell.layout(at.x, at.y);
                }
                col_left += col_width;
            }
            row_top -= row_height;
        }
    }

    fn delete(&mut self) {
        for cell in self.cells_mut() {
            cell.delete();
        }
    }

    fn teardown(&mut self) {
        for cell in self.cells_mut() {
            cell.teardown();
        }
        self.rows.clear();
    }

    fn children(&self) -> Vec<&dyn Node> {
        self.rows.iter().flatten().flatten().map(|c| &**c as &dyn Node).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        self.cells_mut().map(|c| &mut **c as &mut dyn Node).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Spacer;
    use crate::testing::Harness;

    fn block(width: i32, height: i32) -> Cell {
        Some(Box::new(Spacer::min(width, height)))
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert!(matches!(GridLayout::new(Vec::new()), Err(GuiError::EmptyGrid)));
    }

    #[test]
    fn test_rows_without_cells_rejected() {
        assert!(matches!(GridLayout::new(vec![vec![]]), Err(GuiError::EmptyGrid)));
        assert!(matches!(GridLayout::new(vec![vec![], vec![]]), Err(GuiError::EmptyGrid)));
    }

    #[test]
    fn test_empty_cells_keep_track_sums() {
        let h = Harness::new();
        let mut grid = GridLayout::new(vec![vec![], vec![None]]).unwrap();
        h.place(&mut grid, 0, 0);

        assert_eq!(grid.column_widths(), &[10]);
        assert_eq!(grid.row_heights(), &[5, 10]);
        let rect = grid.rect();
        assert_eq!(grid.column_widths().iter().sum::<i32>(), rect.width);
        assert_eq!(grid.row_heights().iter().sum::<i32>(), rect.height);
    }

    #[test]
    fn test_tracks_sum_to_size() {
        let h = Harness::new();
        let mut grid = GridLayout::new(vec![
            vec![block(10, 20), block(30, 5)],
            vec![None, block(8, 8), block(12, 40)],
        ])
        .unwrap();
        h.place(&mut grid, 0, 0);

        assert_eq!(grid.column_widths(), &[15, 35, 22]);
        assert_eq!(grid.row_heights(), &[25, 50]);
        let rect = grid.rect();
        assert_eq!(grid.column_widths().iter().sum::<i32>(), rect.width);
        assert_eq!(grid.row_heights().iter().sum::<i32>(), rect.height);
    }

    #[test]
    fn test_cells_anchor_top_left_inside_track() {
        let h = Harness::new();
        let mut grid = GridLayout::new(vec![
            vec![block(10, 20), block(30, 5)],
            vec![None, block(8, 8)],
        ])
        .unwrap();
        h.place(&mut grid, 0, 0);

        // height = 25 + 18; row 0 content spans y in [18, 38)
        assert_eq!(grid.get(0, 0).map(|c| c.rect()), Some(Rect::new(5, 18, 10, 20)));
        assert_eq!(grid.get(0, 1).map(|c| c.rect()), Some(Rect::new(20, 33, 30, 5)));
        assert_eq!(grid.get(1, 1).map(|c| c.rect()), Some(Rect::new(20, 5, 8, 8)));
    }

    #[test]
    fn test_cells_stay_inside_tracks() {
        let h = Harness::new();
        let mut grid = GridLayout::new(vec![
            vec![block(4, 4), block(30, 12)],
            vec![block(16, 9), block(2, 2)],
        ])
        .unwrap()
        .anchor(Anchor::Center);
        h.place(&mut grid, 50, 50);

        let mut left = 50;
        for (c, &width) in grid.column_widths().to_vec().iter().enumerate() {
            let mut top = grid.rect().top();
            for (r, &height) in grid.row_heights().to_vec().iter().enumerate() {
                let track = Rect::new(left, top - height, width, height);
                let cell = grid.get(r, c).map(|n| n.rect()).unwrap_or_default();
                assert!(track.contains_rect(&cell), "{cell:?} outside {track:?}");
                top -= height;
            }
            left += width;
        }
    }

    #[test]
    fn test_set_replaces_and_grows() {
        let h = Harness::new();
        let mut grid = GridLayout::new(vec![vec![block(10, 10)]]).unwrap();
        h.place(&mut grid, 0, 0);
        assert!(grid.set(0, 0, None).is_some());
        assert!(grid.set(2, 1, block(5, 5)).is_none());
        assert_eq!((grid.rows(), grid.columns()), (3, 2));
        assert!(h.handle.needs_layout());
    }
}
