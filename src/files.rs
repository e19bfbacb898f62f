use std::{fs, path::Path};

use anyhow::{Context, Result};
use image::{imageops::FilterType::Lanczos3, ImageReader};
use tracing::info;

use crate::{
    models::{genome::Genome, image::Image},
    utils::calculate_aspect_ratio_fit,
};

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Decode any format the `image` crate knows, downscaled to fit `max_w x max_h`.
pub fn load_target(path: &Path, max_w: usize, max_h: usize) -> Result<Image> {
    let mut img = ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let (w, h) = (img.width() as usize, img.height() as usize);
    // downscale if source image is too large
    if w > max_w || h > max_h {
        let fit = calculate_aspect_ratio_fit(w, h, max_w, max_h);
        img = img.resize_exact(fit.width as u32, fit.height as u32, Lanczos3);
        info!(from = ?(w, h), to = ?(fit.width, fit.height), "target downscaled");
    }

    Ok(Image::from(&img.to_rgb8()))
}

/// Encoding follows the extension (png, ppm, jpg, ...).
pub fn save_image(img: &Image, path: &Path) -> Result<()> {
    img.to_rgb()
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// `.json` files are read as JSON, anything else as the whitespace text format.
pub fn load_genome(path: &Path) -> Result<Genome> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let genome = if is_json(path) {
        let genome: Genome = serde_json::from_str(&text)
            .with_context(|| format!("invalid genome json in {}", path.display()))?;
        genome.validate()?;
        genome
    } else {
        text.parse::<Genome>()
            .with_context(|| format!("invalid genome in {}", path.display()))?
    };
    Ok(genome)
}

pub fn save_genome(genome: &Genome, path: &Path) -> Result<()> {
    let text = if is_json(path) {
        serde_json::to_string_pretty(genome)?
    } else {
        genome.to_string()
    };
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        color::{Color, RED, WHITE},
        point::Point,
    };

    fn genome() -> Genome {
        let mut g = Genome::new(3, 1);
        g.add(&[Point::new(0, 0), Point::new(5, 1), Point::new(2, 7)], Color::new(1, 2, 3), 0.75);
        g
    }

    #[test]
    fn genome_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["g.dna", "g.json"] {
            let path = dir.path().join(name);
            save_genome(&genome(), &path).unwrap();
            assert_eq!(load_genome(&path).unwrap(), genome());
        }
    }

    #[test]
    fn invalid_json_genome_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut g = genome();
        g.polygons[0].alpha = 2.0;
        fs::write(&path, serde_json::to_string(&g).unwrap()).unwrap();
        assert!(load_genome(&path).is_err());
    }

    #[test]
    fn image_round_trip_and_downscale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.png");
        let mut img = Image::filled(20, 10, WHITE);
        img.set(3, 4, RED);
        save_image(&img, &path).unwrap();
        assert_eq!(load_target(&path, 100, 100).unwrap(), img);

        let small = load_target(&path, 10, 10).unwrap();
        assert_eq!((small.width(), small.height()), (10, 5));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_target(&dir.path().join("nope.png"), 10, 10).unwrap_err();
        assert!(err.to_string().contains("nope.png"));
    }
}
