use image::RgbImage;

use super::{color::Color, rect::Rect};

/// Row-major pixel buffer, `pixels[y * width + x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Image {
    pub fn new(width: usize, height: usize) -> Image {
        Image::filled(width, height, Color::default())
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Image {
        assert!(width > 0 && height > 0, "empty image {width}x{height}");
        Image {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Image {
        assert!(width > 0 && height > 0, "empty image {width}x{height}");
        assert_eq!(pixels.len(), width * height);
        Image {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The whole image as an inclusive rect.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width as i32 - 1, self.height as i32 - 1)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: Color) {
        self.pixels[y * self.width + x] = c;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// One row clipped to `[x0, x1]`.
    #[inline]
    pub fn row(&self, y: usize, x0: usize, x1: usize) -> &[Color] {
        let start = y * self.width;
        &self.pixels[start + x0..=start + x1]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize, x0: usize, x1: usize) -> &mut [Color] {
        let start = y * self.width;
        &mut self.pixels[start + x0..=start + x1]
    }

    pub fn to_rgb(&self) -> RgbImage {
        let raw: Vec<u8> = self.pixels.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
        RgbImage::from_raw(self.width as u32, self.height as u32, raw)
            .expect("buffer length matches dimensions")
    }
}

impl From<&RgbImage> for Image {
    fn from(img: &RgbImage) -> Self {
        let pixels = img.pixels().map(|p| Color::from(p.0)).collect();
        Image::from_pixels(img.width() as usize, img.height() as usize, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::color::{RED, WHITE};

    #[test]
    fn row_major_layout() {
        let mut img = Image::filled(3, 2, WHITE);
        img.set(2, 1, RED);
        assert_eq!(img.pixels()[5], RED);
        assert_eq!(img.row(1, 1, 2), &[WHITE, RED]);
        assert_eq!(img.rect(), Rect::new(0, 0, 2, 1));
    }

    #[test]
    fn rgb_conversion_keeps_pixels() {
        let mut img = Image::filled(4, 3, WHITE);
        img.set(1, 2, Color::new(1, 2, 3));
        let rgb = img.to_rgb();
        assert_eq!(rgb.get_pixel(1, 2).0, [1, 2, 3]);
        assert_eq!(Image::from(&rgb), img);
    }
}
