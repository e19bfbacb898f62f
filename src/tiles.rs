use std::collections::BTreeSet;

use crate::models::rect::Rect;

/// Inclusive rectangle of tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSpan {
    pub tx0: usize,
    pub ty0: usize,
    pub tx1: usize,
    pub ty1: usize,
}

impl TileSpan {
    pub fn count(&self) -> usize {
        (self.tx1 - self.tx0 + 1) * (self.ty1 - self.ty0 + 1)
    }

    pub fn contains(&self, tx: usize, ty: usize) -> bool {
        tx >= self.tx0 && tx <= self.tx1 && ty >= self.ty0 && ty <= self.ty1
    }

    /// Row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> {
        let s = *self;
        (s.ty0..=s.ty1).flat_map(move |ty| (s.tx0..=s.tx1).map(move |tx| (tx, ty)))
    }
}

/// Tiles of `a`, then the tiles of `b` outside `a`, each exactly once.
///
/// The joined bound of two spans never holds fewer tiles than their union.
pub fn union_tiles(
    a: Option<TileSpan>,
    b: Option<TileSpan>,
) -> impl Iterator<Item = (usize, usize)> {
    let rest = b
        .into_iter()
        .flat_map(|s| s.iter())
        .filter(move |&(tx, ty)| !a.is_some_and(|a| a.contains(tx, ty)));
    a.into_iter().flat_map(|s| s.iter()).chain(rest)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tile {
    /// cached similarity score of the accepted image inside this tile
    pub score: u64,
    /// polygons whose bounding rect intersects this tile, in population order
    pub members: BTreeSet<usize>,
}

/// Fixed-size square partition of the canvas, edge tiles may be smaller.
#[derive(Debug, Clone)]
pub struct TileGrid {
    size: usize,
    width: usize,
    height: usize,
    cols: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize, size: usize) -> TileGrid {
        assert!(size > 0 && width > 0 && height > 0);
        let cols = width.div_ceil(size);
        let rows = height.div_ceil(size);
        TileGrid {
            size,
            width,
            height,
            cols,
            rows,
            tiles: vec![Tile::default(); cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn all(&self) -> TileSpan {
        TileSpan {
            tx0: 0,
            ty0: 0,
            tx1: self.cols - 1,
            ty1: self.rows - 1,
        }
    }

    #[inline]
    fn index(&self, tx: usize, ty: usize) -> usize {
        debug_assert!(tx < self.cols && ty < self.rows);
        ty * self.cols + tx
    }

    pub fn tile(&self, tx: usize, ty: usize) -> &Tile {
        &self.tiles[self.index(tx, ty)]
    }

    pub fn tile_mut(&mut self, tx: usize, ty: usize) -> &mut Tile {
        let i = self.index(tx, ty);
        &mut self.tiles[i]
    }

    /// Pixel rect covered by a tile.
    pub fn tile_rect(&self, tx: usize, ty: usize) -> Rect {
        let x0 = tx * self.size;
        let y0 = ty * self.size;
        Rect::new(
            x0 as i32,
            y0 as i32,
            (x0 + self.size).min(self.width) as i32 - 1,
            (y0 + self.size).min(self.height) as i32 - 1,
        )
    }

    /// Tiles intersecting `r`, `None` if `r` misses the canvas entirely.
    pub fn span_of(&self, r: &Rect) -> Option<TileSpan> {
        if r.x1 < 0 || r.y1 < 0 || r.x0 >= self.width as i32 || r.y0 >= self.height as i32 {
            return None;
        }
        let x0 = r.x0.max(0) as usize;
        let y0 = r.y0.max(0) as usize;
        let x1 = (r.x1 as usize).min(self.width - 1);
        let y1 = (r.y1 as usize).min(self.height - 1);
        Some(TileSpan {
            tx0: x0 / self.size,
            ty0: y0 / self.size,
            tx1: x1 / self.size,
            ty1: y1 / self.size,
        })
    }

    pub fn insert_member(&mut self, polygon: usize, span: &TileSpan) {
        for (tx, ty) in span.iter() {
            self.tile_mut(tx, ty).members.insert(polygon);
        }
    }

    /// Move a polygon's membership from `old` to `new`, touching only the tiles
    /// in one span but not the other.
    pub fn move_member(&mut self, polygon: usize, old: Option<TileSpan>, new: Option<TileSpan>) {
        if old == new {
            return;
        }
        if let Some(old) = old {
            for (tx, ty) in old.iter() {
                if !new.is_some_and(|n| n.contains(tx, ty)) {
                    self.tile_mut(tx, ty).members.remove(&polygon);
                }
            }
        }
        if let Some(new) = new {
            for (tx, ty) in new.iter() {
                if !old.is_some_and(|o| o.contains(tx, ty)) {
                    self.tile_mut(tx, ty).members.insert(polygon);
                }
            }
        }
    }

    pub fn total_score(&self) -> u64 {
        self.tiles.iter().map(|t| t.score).sum()
    }

    pub fn tiles(&self) -> impl Iterator<Item = ((usize, usize), &Tile)> {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| ((i % cols, i / cols), t))
    }
}
