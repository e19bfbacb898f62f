use crate::models::{
    color::Color,
    image::Image,
    polygon::Polygon,
    rect::Rect,
};

/// Software rasterizer over an [`Image`], painting with a brush color and opacity.
/// Everything drawn outside the pixel grid is silently clipped.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: Image,
    brush: Color,
    alpha: f32,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas::from_image(Image::new(width, height))
    }

    pub fn from_image(image: Image) -> Canvas {
        Canvas {
            image,
            brush: Color::default(),
            alpha: 1.0,
        }
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn get(&self, x: usize, y: usize) -> Color {
        self.image.get(x, y)
    }

    pub fn set_color(&mut self, c: Color) {
        self.brush = c;
    }

    /// Values outside `[0, 1]` are ignored.
    pub fn set_alpha(&mut self, a: f32) {
        if (0.0..=1.0).contains(&a) {
            self.alpha = a;
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    pub fn draw_point(&mut self, x: i32, y: i32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let mut c = self.image.get(x as usize, y as usize);
        c.blend(&self.brush, self.alpha);
        self.image.set(x as usize, y as usize, c);
    }

    /// Bresenham, both end points included.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.bresenham(x0, y0, x1, y1, true);
    }

    // like draw_line() but doesn't draw last pixel (for drawing connected lines)
    fn draw_line_open(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.bresenham(x0, y0, x1, y1, false);
    }

    fn bresenham(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, inclusive: bool) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let mut x = x0;
        let mut y = y0;
        loop {
            let last = x == x1 && y == y1;
            if !last || inclusive {
                self.draw_point(x, y);
            }
            if last {
                break;
            }
            let e2 = err * 2;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Outline of `r`, every border pixel painted once.
    pub fn draw_rect(&mut self, r: &Rect) {
        for x in r.x0..=r.x1 {
            self.draw_point(x, r.y0);
        }
        if r.y1 == r.y0 {
            return;
        }
        for x in r.x0..=r.x1 {
            self.draw_point(x, r.y1);
        }
        for y in r.y0 + 1..r.y1 {
            self.draw_point(r.x0, y);
            if r.x1 != r.x0 {
                self.draw_point(r.x1, y);
            }
        }
    }

    /// Closed outline, shared corners are painted once.
    pub fn draw_polygon(&mut self, p: &Polygon) {
        let vertices = p.vertices();
        let l = vertices.len();
        if l == 1 {
            self.draw_point(vertices[0].x, vertices[0].y);
            return;
        }
        for i in 0..l {
            let a = vertices[i];
            let b = vertices[(i + 1) % l];
            self.draw_line_open(a.x, a.y, b.x, b.y);
        }
    }

    /// Blend the brush over `[x0, x1]` of row `y`, clipped to `clip`.
    #[inline]
    fn draw_span(&mut self, y: i32, x0: i32, x1: i32, clip: &Rect) {
        if y < clip.y0 || y > clip.y1 {
            return;
        }
        let x0 = x0.max(clip.x0);
        let x1 = x1.min(clip.x1);
        if x0 > x1 {
            return;
        }
        let (brush, alpha) = (self.brush, self.alpha);
        self.image
            .row_mut(y as usize, x0 as usize, x1 as usize)
            .iter_mut()
            .for_each(|c| c.blend(&brush, alpha));
    }

    pub fn fill_rect(&mut self, r: &Rect) {
        let clip = self.image.rect();
        for y in r.y0..=r.y1 {
            self.draw_span(y, r.x0, r.x1, &clip);
        }
    }

    pub fn fill(&mut self, p: &Polygon) {
        let clip = self.image.rect();
        for line in p.fill_details() {
            for span in line.xs.chunks_exact(2) {
                self.draw_span(line.y, span[0], span[1], &clip);
            }
        }
    }

    /// Fill the part of `p` inside `mask`. Rows outside the mask are never visited.
    pub fn fill_masked(&mut self, p: &Polygon, mask: &Rect) {
        let Some(clip) = mask.intersection(&self.image.rect()) else {
            return;
        };
        let lines = p.fill_details();
        let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
            return;
        };
        let lo = clip.y0.max(first.y);
        let hi = clip.y1.min(last.y);
        if lo > hi {
            return;
        }

        for line in &lines[(lo - first.y) as usize..=(hi - first.y) as usize] {
            debug_assert!(line.y >= clip.y0 && line.y <= clip.y1);
            for span in line.xs.chunks_exact(2) {
                // does the horizontal span intersect the mask at all?
                if span[0] > clip.x1 || span[1] < clip.x0 {
                    continue;
                }
                self.draw_span(line.y, span[0], span[1], &clip);
            }
        }
    }

    /// Overwrite every pixel, no blending.
    pub fn clear(&mut self, c: Color) {
        self.image.pixels_mut().fill(c);
    }

    pub fn clear_rect(&mut self, r: &Rect, c: Color) {
        let Some(clip) = r.intersection(&self.image.rect()) else {
            return;
        };
        for y in clip.y0..=clip.y1 {
            self.image
                .row_mut(y as usize, clip.x0 as usize, clip.x1 as usize)
                .fill(c);
        }
    }

    /// Copy the pixels of `r` into the same place of `dst`.
    pub fn copy_rect_into(&self, dst: &mut Image, r: &Rect) {
        assert_eq!(dst.width(), self.width());
        assert_eq!(dst.height(), self.height());
        let Some(clip) = r.intersection(&self.image.rect()) else {
            return;
        };
        let (x0, x1) = (clip.x0 as usize, clip.x1 as usize);
        for y in clip.y0 as usize..=clip.y1 as usize {
            dst.row_mut(y, x0, x1)
                .copy_from_slice(self.image.row(y, x0, x1));
        }
    }
}
