use polyfit::{
    engine::Engine,
    models::{
        color::{Color, RED},
        genome::Genome,
        image::Image,
        point::Point,
        polygon::Polygon,
    },
    mutator::Mutator,
    settings::EngineConfig,
};

fn noise(w: usize, h: usize) -> Image {
    let pixels = (0..w * h)
        .map(|i| {
            let v = (i * 2654435761) % 251;
            Color::new(v as u8, (v * 7 % 256) as u8, (255 - v) as u8)
        })
        .collect();
    Image::from_pixels(w, h, pixels)
}

fn small_tiles(seed: u64) -> EngineConfig {
    EngineConfig {
        tile_size: 9,
        ..EngineConfig::seeded(seed)
    }
}

#[test]
fn scanline_rows_cover_bounds() {
    let mut mutator = Mutator::new(1, 7, 60, 45, Some(11));
    for _ in 0..500 {
        let polygon: Polygon = mutator.polygon();
        let bounds = polygon.bounds();
        let lines = polygon.fill_details();
        let ys: Vec<i32> = lines.iter().map(|l| l.y).collect();
        let expected: Vec<i32> = (bounds.y0..=bounds.y1).collect();
        assert_eq!(ys, expected, "{polygon}");
        for line in lines {
            assert_eq!(line.xs.len() % 2, 0, "row {} of {polygon}", line.y);
            assert!(line.xs.windows(2).all(|w| w[0] <= w[1]));
            assert!(line.xs.iter().all(|&x| x >= bounds.x0 && x <= bounds.x1));
        }
    }
}

#[test]
fn exported_genome_rebuilds_same_state() {
    let target = noise(40, 30);
    let mut engine = Engine::new(target.clone(), 15, 5, small_tiles(21));
    for _ in 0..2_000 {
        engine.advance_one();
    }

    let text = engine.export_genome().to_string();
    let genome: Genome = text.parse().unwrap();
    let resumed = Engine::from_genome(target, &genome, small_tiles(22));

    assert_eq!(resumed.best_image(), engine.best_image());
    assert_eq!(resumed.fitness(), engine.fitness());
    assert_eq!(resumed.export_genome(), engine.export_genome());
}

#[test]
fn fitness_is_idempotent() {
    let mut engine = Engine::new(noise(20, 20), 5, 4, small_tiles(31));
    for _ in 0..50 {
        engine.advance_one();
        assert_eq!(engine.fitness(), engine.fitness());
    }
}

#[test]
fn membership_holds_over_long_runs() {
    for seed in 0..3 {
        let mut engine = Engine::new(noise(47, 38), 20, 4, small_tiles(seed));
        for _ in 0..1_500 {
            engine.advance_one();
            assert!(engine.check_membership(), "seed {seed} iteration {}", engine.iterations());
        }
    }
}

#[test]
fn fitness_rises_only_on_acceptance() {
    let mut engine = Engine::new(noise(32, 24), 10, 5, small_tiles(41));
    let mut fitness = engine.fitness();
    let mut score = engine.score();
    for _ in 0..3_000 {
        let improvements = engine.improvements();
        let accepted = engine.advance_one();
        assert_eq!(engine.improvements(), improvements + accepted as u64);
        if accepted {
            assert!(engine.score() > score);
            assert!(engine.fitness() > fitness);
        } else {
            assert_eq!(engine.score(), score);
            assert_eq!(engine.fitness(), fitness);
        }
        fitness = engine.fitness();
        score = engine.score();
    }
    assert_eq!(engine.iterations(), 3_000);
}

#[test]
fn until_improvement_accepts_exactly_once() {
    let mut engine = Engine::new(noise(16, 16), 4, 3, small_tiles(51));
    for _ in 0..5 {
        let improvements = engine.improvements();
        let iterations = engine.iterations();
        let taken = engine.advance_until_improvement();
        assert!(taken >= 1);
        assert_eq!(engine.improvements(), improvements + 1);
        assert_eq!(engine.iterations(), iterations + taken);
    }
}

#[test]
fn tiny_red_target_converges() {
    let mut genome = Genome::new(3, 1);
    genome.add(&[Point::new(0, 0), Point::new(4, 0), Point::new(0, 4)], RED, 0.5);
    let mut engine = Engine::from_genome(Image::filled(2, 2, RED), &genome, EngineConfig::seeded(61));
    let start = engine.fitness();
    assert!(start < 0.7);

    for _ in 0..30_000 {
        engine.advance_one();
    }
    assert!(engine.fitness() > 0.99, "fitness {}", engine.fitness());
    assert!(engine.improvements() > 0);
}

#[test]
fn covering_triangle_is_a_perfect_fit() {
    let mut genome = Genome::new(3, 1);
    genome.add(&[Point::new(0, 0), Point::new(20, 0), Point::new(0, 20)], RED, 1.0);
    let engine = Engine::from_genome(Image::filled(10, 10, RED), &genome, EngineConfig::seeded(71));
    assert_eq!(engine.fitness(), 1.0);
    assert_eq!(engine.best_image(), &Image::filled(10, 10, RED));
}

#[test]
fn bounds_stay_on_canvas() {
    let (w, h) = (23, 17);
    let mut engine = Engine::new(noise(w, h), 12, 4, small_tiles(81));
    for _ in 0..2_000 {
        engine.advance_one();
        for p in engine.polygons() {
            let b = p.bounds();
            assert!(b.x0 >= 0 && b.y0 >= 0, "{b}");
            assert!(b.x1 <= w as i32 - 1 && b.y1 <= h as i32 - 1, "{b}");
        }
    }
}
