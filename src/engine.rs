use std::time::Instant;

use tracing::{debug, info, trace};

use crate::{
    canvas::Canvas,
    evaluator::{self, rect_score},
    models::{
        color::Color,
        genome::Genome,
        image::Image,
    },
    mutator::{Candidate, Mutator},
    settings::EngineConfig,
    tiles::{union_tiles, TileGrid, TileSpan},
};

/// Scalar counters an observer can sample between iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub iterations: u64,
    pub improvements: u64,
    pub fitness: f64,
    pub elapsed_seconds: f64,
}

/// Hill climber fitting a fixed population of translucent polygons to a target.
///
/// Every iteration mutates one polygon, redraws only the tiles its bounding
/// rect touched before or after the change, and keeps the mutation only if the
/// summed tile score strictly improved. Committed state (best image, tile
/// scores, fitness, tile membership) only changes inside an accepting
/// iteration, so reading it between calls always sees a consistent snapshot.
pub struct Engine {
    target: Image,
    canvas: Canvas,
    best: Image,
    polygons: Vec<Candidate>,
    tiles: TileGrid,
    mutator: Mutator,
    background: Color,
    score: u64,
    iterations: u64,
    improvements: u64,
    // tiles left drawn with the last rejected mutation, redrawn by the next iteration
    carried: Option<TileSpan>,
    // tiles redrawn by the last iteration with their fresh scores
    scratch: Vec<(usize, usize, u64)>,
    started: Instant,
}

impl Engine {
    /// Fresh run with `polygon_count` random polygons of `vertex_count` vertices.
    pub fn new(target: Image, polygon_count: usize, vertex_count: usize, config: EngineConfig) -> Engine {
        let mut mutator = Mutator::new(
            polygon_count,
            vertex_count,
            target.width(),
            target.height(),
            config.seed,
        );
        let polygons = (0..polygon_count)
            .map(|_| Candidate::random(&mut mutator))
            .collect();
        Engine::build(target, polygons, mutator, config)
    }

    /// Resume from a genome, which must already be validated.
    pub fn from_genome(target: Image, genome: &Genome, config: EngineConfig) -> Engine {
        debug_assert_eq!(genome.validate(), Ok(()));
        let mutator = Mutator::new(
            genome.polygon_count,
            genome.vertex_count,
            target.width(),
            target.height(),
            config.seed,
        );
        let polygons = genome.polygons.iter().map(Candidate::from).collect();
        Engine::build(target, polygons, mutator, config)
    }

    fn build(target: Image, polygons: Vec<Candidate>, mutator: Mutator, config: EngineConfig) -> Engine {
        let (w, h) = (target.width(), target.height());
        let mut tiles = TileGrid::new(w, h, config.tile_size);
        for (i, p) in polygons.iter().enumerate() {
            if let Some(span) = tiles.span_of(&p.bounds()) {
                tiles.insert_member(i, &span);
            }
        }

        let mut engine = Engine {
            canvas: Canvas::from_image(Image::filled(w, h, config.background)),
            best: Image::filled(w, h, config.background),
            target,
            polygons,
            tiles,
            mutator,
            background: config.background,
            score: 0,
            iterations: 0,
            improvements: 0,
            carried: None,
            scratch: vec![],
            started: Instant::now(),
        };

        for (tx, ty) in engine.tiles.all().iter() {
            engine.draw_tile(tx, ty);
            let r = engine.tiles.tile_rect(tx, ty);
            engine.tiles.tile_mut(tx, ty).score = rect_score(&engine.target, engine.canvas.image(), &r);
        }
        engine.best = engine.canvas.image().clone();
        engine.score = engine.tiles.total_score();

        info!(
            width = w,
            height = h,
            polygons = engine.polygons.len(),
            tiles = engine.tiles.cols() * engine.tiles.rows(),
            fitness = engine.fitness(),
            "engine ready"
        );
        engine
    }

    /// Clear a tile to the background and repaint every polygon listed in it.
    fn draw_tile(&mut self, tx: usize, ty: usize) {
        let Engine {
            canvas,
            tiles,
            polygons,
            background,
            ..
        } = self;
        let r = tiles.tile_rect(tx, ty);
        canvas.clear_rect(&r, *background);
        for &i in &tiles.tile(tx, ty).members {
            let p = &polygons[i];
            canvas.set_color(p.color());
            canvas.set_alpha(p.alpha());
            canvas.fill_masked(p.polygon(), &r);
        }
    }

    /// One mutate / evaluate / accept-or-reject cycle. Returns whether the
    /// mutation was kept.
    pub fn advance_one(&mut self) -> bool {
        let index = self.mutator.polygon_index();
        let before = self.polygons[index].bounds();
        let kind = self.polygons[index].mutate(&mut self.mutator);
        let after = self.polygons[index].bounds();
        debug_assert!(kind.moves_vertex() || before == after);

        let old_span = self.tiles.span_of(&before);
        let new_span = self.tiles.span_of(&after);
        let moved = old_span != new_span;
        if moved {
            // provisional, the redraw below needs the new membership
            self.tiles.move_member(index, old_span, new_span);
        }

        let current = self.tiles.span_of(&before.join(&after));
        let carried = self.carried.take();

        let mut fresh = std::mem::take(&mut self.scratch);
        fresh.clear();
        let (mut old_sum, mut new_sum) = (0u64, 0u64);
        for (tx, ty) in union_tiles(current, carried) {
            self.draw_tile(tx, ty);
            let r = self.tiles.tile_rect(tx, ty);
            let score = rect_score(&self.target, self.canvas.image(), &r);
            old_sum += self.tiles.tile(tx, ty).score;
            new_sum += score;
            fresh.push((tx, ty, score));
        }

        let accepted = new_sum > old_sum;
        if accepted {
            self.polygons[index].accept();
            for &(tx, ty, score) in &fresh {
                self.tiles.tile_mut(tx, ty).score = score;
                let r = self.tiles.tile_rect(tx, ty);
                self.canvas.copy_rect_into(&mut self.best, &r);
            }
            self.score = self.score - old_sum + new_sum;
            debug_assert_eq!(self.score, self.tiles.total_score());
            self.improvements += 1;
            debug!(
                iteration = self.iterations + 1,
                improvements = self.improvements,
                polygon = index,
                ?kind,
                fitness = self.fitness(),
                "mutation accepted"
            );
        } else {
            self.polygons[index].undo();
            if moved {
                self.tiles.move_member(index, new_span, old_span);
            }
            trace!(polygon = index, ?kind, "mutation rejected");
            // tiles outside `current` were just redrawn with the committed population
            self.carried = current;
        }

        self.scratch = fresh;
        self.iterations += 1;
        debug_assert!(self.check_membership(), "tile membership out of sync");
        accepted
    }

    /// Repeat [`Engine::advance_one`] until one mutation is accepted.
    /// Returns the number of iterations it took.
    ///
    /// Never returns once the population can no longer be improved.
    pub fn advance_until_improvement(&mut self) -> u64 {
        let start = self.iterations;
        while !self.advance_one() {}
        self.iterations - start
    }

    /// Every tile lists exactly the polygons whose bounding rect intersects it.
    pub fn check_membership(&self) -> bool {
        self.polygons.iter().enumerate().all(|(i, p)| {
            let span = self.tiles.span_of(&p.bounds());
            self.tiles.tiles().all(|((tx, ty), tile)| {
                tile.members.contains(&i) == span.is_some_and(|s| s.contains(tx, ty))
            })
        })
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn improvements(&self) -> u64 {
        self.improvements
    }

    /// Mean per-pixel similarity of the best image, in `[0, 1]`.
    pub fn fitness(&self) -> f64 {
        evaluator::fitness(self.score, self.target.width() * self.target.height())
    }

    /// Summed tile score behind [`Engine::fitness`].
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            iterations: self.iterations,
            improvements: self.improvements,
            fitness: self.fitness(),
            elapsed_seconds: self.elapsed_seconds(),
        }
    }

    /// Render of the last accepted population.
    pub fn best_image(&self) -> &Image {
        &self.best
    }

    /// Working canvas; tiles of a just rejected mutation still show it.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn target(&self) -> &Image {
        &self.target
    }

    pub fn polygons(&self) -> &[Candidate] {
        &self.polygons
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn width(&self) -> usize {
        self.target.width()
    }

    pub fn height(&self) -> usize {
        self.target.height()
    }

    pub fn export_genome(&self) -> Genome {
        let vertex_count = self.polygons.first().map_or(0, |p| p.polygon().len());
        let mut genome = Genome::new(vertex_count, self.polygons.len());
        for p in &self.polygons {
            genome.add(p.polygon().vertices(), p.color(), p.alpha());
        }
        genome
    }

    /// Full-canvas redraw of the current population, independent of the tile cache.
    pub fn render(&self) -> Image {
        let mut canvas = Canvas::from_image(Image::filled(self.width(), self.height(), self.background));
        for p in &self.polygons {
            canvas.set_color(p.color());
            canvas.set_alpha(p.alpha());
            canvas.fill(p.polygon());
        }
        canvas.image().clone()
    }
}
