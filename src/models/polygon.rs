use std::cell::OnceCell;
use std::fmt;

use super::{
    edge::{edge_table, Edge},
    point::Point,
    rect::Rect,
};

/// Crossings of the polygon outline with one pixel row.
/// `xs` is sorted and even in length, consecutive pairs are inclusive spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLine {
    pub y: i32,
    pub xs: Vec<i32>,
}

/// Closed outline through an ordered list of vertices.
///
/// The bounding rect is kept up to date by widening on every write; a write
/// that might shrink it needs an explicit [`Polygon::recompute_bounds`].
/// The scanline table is cached until the next vertex write.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Point>,
    bounds: Rect,
    fill_cache: OnceCell<Vec<ScanLine>>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Polygon {
        assert!(!vertices.is_empty(), "polygon needs at least one vertex");
        let mut bounds = Rect::from_point(vertices[0]);
        vertices.iter().for_each(|p| bounds.widen(*p));
        Polygon {
            vertices,
            bounds,
            fill_cache: OnceCell::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn get(&self, i: usize) -> Point {
        self.vertices[i]
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_x(&mut self, i: usize, x: i32) {
        self.fill_cache = OnceCell::new();
        self.vertices[i].x = x;
        self.bounds.widen_x(x);
    }

    pub fn set_y(&mut self, i: usize, y: i32) {
        self.fill_cache = OnceCell::new();
        self.vertices[i].y = y;
        self.bounds.widen_y(y);
    }

    /// Full rescan, needed after writes that moved a vertex off the boundary.
    pub fn recompute_bounds(&mut self) -> Rect {
        let mut r = Rect::from_point(self.vertices[0]);
        self.vertices.iter().for_each(|p| r.widen(*p));
        self.bounds = r;
        r
    }

    /// Per row fill spans, one entry for every y of the bounding rect.
    // based on scanline fill
    // https://www.cs.rit.edu/~icss571/filling/index.html
    pub fn fill_details(&self) -> &[ScanLine] {
        self.fill_cache.get_or_init(|| scan_lines(&self.vertices, self.bounds))
    }
}

fn scan_lines(vertices: &[Point], bounds: Rect) -> Vec<ScanLine> {
    let mut global = edge_table(vertices).into_iter().peekable();
    let mut active: Vec<Edge> = vec![];
    let mut lines: Vec<ScanLine> = Vec::with_capacity(bounds.height() as usize);

    for y in bounds.y0..=bounds.y1 {
        // add new edges if we've reached their height
        while let Some(edge) = global.next_if(|e| e.y_min == y) {
            active.push(edge);
        }

        let mut xs: Vec<i32> = active.iter().map(Edge::pixel_x).collect();
        xs.sort_unstable();
        debug_assert!(xs.len() % 2 == 0, "odd crossing count on row {y}");
        lines.push(ScanLine { y, xs });

        // edges are half open (y_max excluded) except on the last row,
        // otherwise the bottom row of every polygon would stay empty
        active.retain_mut(|edge| {
            if edge.y_max == y + 1 && edge.y_max != bounds.y1 {
                return false;
            }
            edge.step();
            true
        });
    }

    lines
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.vertices.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(vertices: Vec<Point>) -> Self {
        Polygon::new(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(points: &[(i32, i32)]) -> Polygon {
        Polygon::new(points.iter().map(|&p| p.into()).collect())
    }

    fn assert_table_invariants(p: &Polygon) {
        let lines = p.fill_details();
        let b = p.bounds();
        assert_eq!(lines.len() as i32, b.height());
        assert_eq!(lines.first().map(|l| l.y), Some(b.y0));
        assert_eq!(lines.last().map(|l| l.y), Some(b.y1));
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.y, b.y0 + i as i32);
            assert_eq!(line.xs.len() % 2, 0, "row {} {:?}", line.y, line.xs);
        }
    }

    #[test]
    fn triangle_rows() {
        let p = poly(&[(0, 0), (4, 0), (0, 4)]);
        let lines = p.fill_details();
        assert_table_invariants(&p);
        let spans: Vec<Vec<i32>> = lines.iter().map(|l| l.xs.clone()).collect();
        assert_eq!(
            spans,
            vec![vec![0, 4], vec![0, 3], vec![0, 2], vec![0, 1], vec![0, 0]]
        );
    }

    #[test]
    fn square_covers_bottom_row() {
        let p = poly(&[(1, 1), (3, 1), (3, 3), (1, 3)]);
        assert_table_invariants(&p);
        assert!(p.fill_details().iter().all(|l| l.xs == vec![1, 3]));
    }

    #[test]
    fn flat_polygon_has_one_empty_row() {
        let p = poly(&[(1, 2), (5, 2), (3, 2)]);
        assert_table_invariants(&p);
        assert_eq!(p.fill_details(), &[ScanLine { y: 2, xs: vec![] }]);
    }

    #[test]
    fn concave_and_self_intersecting_keep_invariants() {
        assert_table_invariants(&poly(&[(0, 0), (10, 0), (5, 5), (10, 10), (0, 10)]));
        assert_table_invariants(&poly(&[(0, 0), (9, 9), (9, 0), (0, 9)]));
        assert_table_invariants(&poly(&[(3, 0), (6, 7), (0, 4), (8, 2), (1, 9), (5, 5)]));
        assert_table_invariants(&poly(&[(2, 2), (2, 2), (2, 2)]));
    }

    #[test]
    fn writes_invalidate_cache_and_widen() {
        let mut p = poly(&[(0, 0), (4, 0), (0, 4)]);
        assert_eq!(p.fill_details().len(), 5);
        p.set_y(2, 8);
        assert_eq!(p.bounds(), Rect::new(0, 0, 4, 8));
        assert_eq!(p.fill_details().len(), 9);
        p.set_y(2, 2);
        // widening never shrinks on its own
        assert_eq!(p.bounds(), Rect::new(0, 0, 4, 8));
        assert_eq!(p.recompute_bounds(), Rect::new(0, 0, 4, 2));
        assert_table_invariants(&p);
    }
}
