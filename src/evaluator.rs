use crate::{
    models::{color::Color, image::Image, rect::Rect},
    settings::MAX_CHANNEL_DIFF,
};

// Similarity is kept as an exact integer: a pixel scores MAX_CHANNEL_DIFF - diff,
// i.e. 765 * (1 - (|dR| + |dG| + |dB|) / 765). Integer sums make the accept test
// and the running total exact, so fitness can never drift downwards.

#[inline]
pub fn pixel_score(a: &Color, b: &Color) -> u32 {
    MAX_CHANNEL_DIFF - a.diff(b)
}

/// Per-pixel similarity in `[0, 1]`, 1 meaning an exact match.
pub fn pixel_similarity(a: &Color, b: &Color) -> f64 {
    pixel_score(a, b) as f64 / MAX_CHANNEL_DIFF as f64
}

/// Sum of pixel scores over `r` (inclusive), `r` must lie inside both images.
pub fn rect_score(target: &Image, current: &Image, r: &Rect) -> u64 {
    debug_assert_eq!(target.width(), current.width());
    debug_assert_eq!(target.height(), current.height());
    let (x0, x1) = (r.x0 as usize, r.x1 as usize);
    let mut score = 0u64;
    for y in r.y0 as usize..=r.y1 as usize {
        score += target
            .row(y, x0, x1)
            .iter()
            .zip(current.row(y, x0, x1))
            .map(|(a, b)| pixel_score(a, b) as u64)
            .sum::<u64>();
    }
    score
}

/// Best possible score for `pixels` pixels.
pub fn max_score(pixels: usize) -> u64 {
    pixels as u64 * MAX_CHANNEL_DIFF as u64
}

/// Normalize a score sum over `pixels` pixels to `[0, 1]`.
pub fn fitness(score: u64, pixels: usize) -> f64 {
    score as f64 / max_score(pixels) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::color::{BLACK, RED, WHITE};

    #[test]
    fn similarity_bounds() {
        assert_eq!(pixel_similarity(&RED, &RED), 1.0);
        assert_eq!(pixel_similarity(&WHITE, &BLACK), 0.0);
        assert_eq!(pixel_similarity(&WHITE, &RED), 1.0 / 3.0);
    }

    #[test]
    fn blue_channel_compares_both_images() {
        let a = Color::new(10, 10, 0);
        let b = Color::new(10, 10, 255);
        assert_eq!(pixel_score(&a, &b), MAX_CHANNEL_DIFF - 255);
    }

    #[test]
    fn rect_score_sums_only_the_rect() {
        let target = Image::filled(4, 4, RED);
        let mut current = Image::filled(4, 4, RED);
        current.set(3, 3, WHITE);
        assert_eq!(rect_score(&target, &current, &Rect::new(0, 0, 2, 2)), max_score(9));
        assert_eq!(
            rect_score(&target, &current, &target.rect()),
            max_score(16) - 510
        );
        assert_eq!(fitness(max_score(16), 16), 1.0);
    }
}
