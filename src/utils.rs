#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: usize,
    pub height: usize,
}

/// Largest size with the source aspect ratio that fits inside `max_w x max_h`.
/// Never rounds a side down to zero.
pub fn calculate_aspect_ratio_fit(
    src_width: usize,
    src_height: usize,
    max_w: usize,
    max_h: usize,
) -> ImageDimensions {
    let w = src_width as f64;
    let h = src_height as f64;
    let ratio: f64 = (max_w as f64 / w).min(max_h as f64 / h);
    ImageDimensions {
        width: ((w * ratio).round() as usize).clamp(1, max_w),
        height: ((h * ratio).round() as usize).clamp(1, max_h),
    }
}

/// Zero padded counter used in snapshot file names.
pub fn padded(count: u64, width: usize) -> String {
    format!("{count:0width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_ratio() {
        assert_eq!(
            calculate_aspect_ratio_fit(800, 400, 384, 384),
            ImageDimensions {
                width: 384,
                height: 192
            }
        );
        assert_eq!(
            calculate_aspect_ratio_fit(100, 1000, 384, 384),
            ImageDimensions {
                width: 38,
                height: 384
            }
        );
    }

    #[test]
    fn fit_never_collapses() {
        let d = calculate_aspect_ratio_fit(10_000, 1, 100, 100);
        assert_eq!(d, ImageDimensions { width: 100, height: 1 });
    }

    #[test]
    fn padding() {
        assert_eq!(padded(42, 6), "000042");
        assert_eq!(padded(1_234_567, 6), "1234567");
    }
}
