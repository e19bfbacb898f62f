use std::fmt;

use serde::{Deserialize, Serialize};

use super::point::Point;

/// Axis aligned rectangle with inclusive bounds.
/// Invariant: `x1 >= x0` and `y1 >= y0`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Rect {
        assert!(x1 >= x0 && y1 >= y0, "inverted rect {x0},{y0} {x1},{y1}");
        Rect { x0, y0, x1, y1 }
    }

    pub fn from_point(p: Point) -> Rect {
        Rect {
            x0: p.x,
            y0: p.y,
            x1: p.x,
            y1: p.y,
        }
    }

    /// Extend horizontally so `x` is covered.
    pub fn widen_x(&mut self, x: i32) {
        if x < self.x0 {
            self.x0 = x;
        } else if x > self.x1 {
            self.x1 = x;
        }
    }

    pub fn widen_y(&mut self, y: i32) {
        if y < self.y0 {
            self.y0 = y;
        } else if y > self.y1 {
            self.y1 = y;
        }
    }

    pub fn widen(&mut self, p: Point) {
        self.widen_x(p.x);
        self.widen_y(p.y);
    }

    /// Smallest rect containing both.
    pub fn join(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        })
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0 + 1
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Non-negative and not inverted.
    pub fn is_valid(&self) -> bool {
        self.x0 >= 0 && self.y0 >= 0 && self.x1 >= self.x0 && self.y1 >= self.y0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x0: {} y0: {} x1: {} y1: {}", self.x0, self.y0, self.x1, self.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_only_grows() {
        let mut r = Rect::from_point(Point::new(5, 5));
        r.widen(Point::new(2, 9));
        r.widen(Point::new(4, 6));
        assert_eq!(r, Rect::new(2, 5, 5, 9));
    }

    #[test]
    fn touching_edges_intersect() {
        let a = Rect::new(0, 0, 49, 49);
        let b = Rect::new(49, 49, 60, 60);
        let c = Rect::new(50, 0, 60, 10);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.intersection(&b), Some(Rect::new(49, 49, 49, 49)));
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn join_and_area() {
        let a = Rect::new(0, 0, 1, 1);
        let b = Rect::new(3, 4, 3, 4);
        let j = a.join(&b);
        assert_eq!(j, Rect::new(0, 0, 3, 4));
        assert_eq!(j.area(), 20);
        assert!(j.contains(Point::new(2, 2)));
        assert!(!j.contains(Point::new(4, 2)));
    }
}
