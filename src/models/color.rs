use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

pub const WHITE: Color = Color {
    r: 255,
    g: 255,
    b: 255,
};

pub const RED: Color = Color { r: 255, g: 0, b: 0 };

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Paint `brush` over `self` with opacity `alpha` (0..=1).
    pub fn blend(&mut self, brush: &Color, alpha: f32) {
        self.r = Color::blend_channel(self.r, brush.r, alpha);
        self.g = Color::blend_channel(self.g, brush.g, alpha);
        self.b = Color::blend_channel(self.b, brush.b, alpha);
    }

    #[inline]
    pub fn blend_channel(old: u8, brush: u8, alpha: f32) -> u8 {
        ((old as f32 * (1.0 - alpha)) + (brush as f32 * alpha))
            .round()
            .clamp(0.0, 255.0) as u8
    }

    /// Manhattan distance over the three channels, 0..=765.
    #[inline]
    pub fn diff(&self, other: &Color) -> u32 {
        // can't subtract u8 from u8 -> potential underflow
        self.r.abs_diff(other.r) as u32
            + self.g.abs_diff(other.g) as u32
            + self.b.abs_diff(other.b) as u32
    }
}

impl From<&[u8]> for Color {
    fn from(value: &[u8]) -> Self {
        Color {
            r: value[0],
            g: value[1],
            b: value[2],
        }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color { r, g, b }
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_blend_replaces() {
        let mut c = WHITE;
        c.blend(&RED, 1.0);
        assert_eq!(c, RED);
    }

    #[test]
    fn transparent_blend_keeps() {
        let mut c = Color::new(12, 34, 56);
        c.blend(&RED, 0.0);
        assert_eq!(c, Color::new(12, 34, 56));
    }

    #[test]
    fn half_blend_is_linear() {
        let mut c = WHITE;
        c.blend(&BLACK, 0.5);
        // 127.5 rounds up
        assert_eq!(c, Color::new(128, 128, 128));
    }

    #[test]
    fn diff_uses_every_channel() {
        assert_eq!(WHITE.diff(&BLACK), 765);
        assert_eq!(RED.diff(&RED), 0);
        assert_eq!(Color::new(0, 0, 10).diff(&Color::new(0, 0, 0)), 10);
    }
}
