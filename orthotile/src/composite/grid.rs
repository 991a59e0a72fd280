//! Regular bucket grids for rectangle requests.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bounds::{GeoBounds, BOUNDS_EPSILON};
use crate::bucket::Bucket;
use crate::coord::EDGE_EPSILON_DEG;
use crate::raster::{blit, scale_image, TileImage};

use super::CompositeError;

/// Most buckets a grid may span along either axis.
///
/// A full circle of the narrowest buckets is 2880 columns.
pub const MAX_GRID_EXTENT: usize = 4096;

/// A rectangular block of equally sized buckets covering a rectangle.
///
/// Cells are stored row by row, starting with the southernmost row; each
/// row runs west to east.
#[derive(Debug, Clone)]
pub struct BucketGrid<B: Bucket> {
    cells: Vec<B>,
    columns: usize,
    rows: usize,
    bounds: GeoBounds,
}

impl<B: Bucket> BucketGrid<B> {
    /// Find the grid of buckets covering `desired`.
    ///
    /// The rectangle is first pulled in by [`EDGE_EPSILON_DEG`] so that edges
    /// lying exactly on bucket borders do not add a row or column. Growth
    /// starts at the bucket holding the south-west corner, runs east until
    /// the first row covers the rectangle's width, then adds rows northward.
    /// A row whose buckets are wider or narrower than the first row's yields
    /// [`CompositeError::UnsupportedSpan`].
    ///
    /// Returns `Ok(None)` for empty bounds.
    pub fn resolve(desired: &GeoBounds) -> Result<Option<Self>, CompositeError> {
        if desired.is_empty() {
            return Ok(None);
        }

        let target = desired.shrunk(EDGE_EPSILON_DEG);
        let origin = B::containing(target.min_lon(), target.min_lat());
        let mut covered = origin.bounds();

        let mut cells = vec![origin.clone()];
        let mut east = origin.clone();
        while !covered.reaches_east_of(&target) {
            if cells.len() >= MAX_GRID_EXTENT {
                return Err(CompositeError::GridTooLarge {
                    axis: "columns",
                    count: cells.len() + 1,
                    max: MAX_GRID_EXTENT,
                });
            }
            east = east.sibling(1, 0);
            covered.absorb(&east.bounds());
            cells.push(east.clone());
        }
        let columns = cells.len();

        let mut rows = 1;
        let mut row_start = origin.clone();
        while !covered.reaches_north_of(&target) {
            if rows >= MAX_GRID_EXTENT {
                return Err(CompositeError::GridTooLarge {
                    axis: "rows",
                    count: rows + 1,
                    max: MAX_GRID_EXTENT,
                });
            }

            let next = row_start.sibling(0, 1);
            if (next.width() - origin.width()).abs() > BOUNDS_EPSILON {
                warn!(
                    expected = origin.width(),
                    found = next.width(),
                    lat = next.center_lat(),
                    area = %desired,
                    "Area crosses a bucket width change, cannot composite"
                );
                return Err(CompositeError::UnsupportedSpan {
                    expected: origin.width(),
                    found: next.width(),
                    lat: next.center_lat(),
                });
            }

            for column in 0..columns {
                let cell = next.sibling(column as i32, 0);
                covered.absorb(&cell.bounds());
                cells.push(cell);
            }
            row_start = next;
            rows += 1;
        }

        debug!(columns, rows, bounds = %covered, "Resolved bucket grid");

        Ok(Some(Self {
            cells,
            columns,
            rows,
            bounds: covered,
        }))
    }

    /// Number of columns (west to east).
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows (south to north).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// All cells, southern row first.
    pub fn cells(&self) -> &[B] {
        &self.cells
    }

    /// The cell at `row` (0 = south) and `column` (0 = west).
    pub fn cell(&self, row: usize, column: usize) -> Option<&B> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }

    /// Union of the bounds of every cell.
    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a resolved grid holds at least one bucket.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Stitch per-cell tiles into one canvas.
    ///
    /// `tiles` runs parallel to [`cells`](Self::cells). The canvas takes its
    /// tile size and pixel format from the first present tile; every other
    /// tile is rescaled to that size. Cells without a tile stay blank.
    /// Returns `Ok(None)` if no tile is present.
    pub fn stitch(&self, tiles: &[Option<Arc<TileImage>>]) -> Result<Option<TileImage>, CompositeError> {
        let Some(first) = tiles.iter().flatten().next() else {
            return Ok(None);
        };

        let tile_width = first.width();
        let tile_height = first.height();
        let mut canvas = TileImage::blank(
            canvas_extent(self.columns, tile_width),
            canvas_extent(self.rows, tile_height),
            first.color_type(),
        )?;

        for (i, tile) in tiles.iter().enumerate().take(self.cells.len()) {
            let Some(tile) = tile else {
                continue;
            };
            let row = i / self.columns;
            let column = i % self.columns;
            let scaled = scale_image(tile, tile_width, tile_height);
            let x = column as i64 * i64::from(tile_width);
            let y = (self.rows - 1 - row) as i64 * i64::from(tile_height);
            blit(&mut canvas, &scaled, x, y);
        }

        Ok(Some(canvas))
    }
}

/// `count × tile` pixels, saturating so oversized grids fail canvas checks.
fn canvas_extent(count: usize, tile: u32) -> u32 {
    let pixels = (count as u64).saturating_mul(u64::from(tile));
    u32::try_from(pixels).unwrap_or(u32::MAX)
}
