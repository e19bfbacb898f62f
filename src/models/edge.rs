use super::point::Point;

/// Non-horizontal polygon side as stored in the scanline edge table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub y_min: i32,
    pub y_max: i32,
    /// x at the current scanline, starts at the x of the `y_min` end
    pub x: f64,
    pub inverse_slope: f64,
}

impl Edge {
    /// Returns `None` for horizontal sides, they never cross a scanline.
    pub fn new(a: Point, b: Point) -> Option<Edge> {
        if a.y == b.y {
            return None;
        }
        let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
        Some(Edge {
            y_min: lo.y,
            y_max: hi.y,
            x: lo.x as f64,
            inverse_slope: (hi.x - lo.x) as f64 / (hi.y - lo.y) as f64,
        })
    }

    /// Nearest pixel column of the current crossing, halves round up.
    #[inline]
    pub fn pixel_x(&self) -> i32 {
        (self.x + 0.5).floor() as i32
    }

    #[inline]
    pub fn step(&mut self) {
        self.x += self.inverse_slope;
    }
}

/// Returns all sides looping back to the first vertex, horizontal ones dropped.
/// [A, B, C] -> [AB, BC, CA]
pub fn edge_table(points: &[Point]) -> Vec<Edge> {
    let l = points.len();
    let mut edges: Vec<Edge> = (0..l)
        .filter_map(|i| Edge::new(points[i], points[(i + 1) % l]))
        .collect();
    edges.sort_by(|a, b| {
        a.y_min
            .cmp(&b.y_min)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });
    edges
}
