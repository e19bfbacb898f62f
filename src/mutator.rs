use rand::{
    distributions::{Distribution, Uniform},
    Rng, SeedableRng,
};
use rand_pcg::Pcg32;

use crate::models::{
    color::Color,
    genome::PolygonGene,
    point::Point,
    polygon::Polygon,
    rect::Rect,
};

/// The six single-value edits a polygon can receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    X,
    Y,
    R,
    G,
    B,
    A,
}

impl MutationKind {
    pub const ALL: [MutationKind; 6] = [
        MutationKind::X,
        MutationKind::Y,
        MutationKind::R,
        MutationKind::G,
        MutationKind::B,
        MutationKind::A,
    ];

    pub fn moves_vertex(self) -> bool {
        matches!(self, MutationKind::X | MutationKind::Y)
    }
}

/// What a mutation overwrote, enough to put it back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Delta {
    VertexX { index: usize, previous: i32 },
    VertexY { index: usize, previous: i32 },
    Red(u8),
    Green(u8),
    Blue(u8),
    Alpha(f32),
}

impl Delta {
    pub fn kind(&self) -> MutationKind {
        match self {
            Delta::VertexX { .. } => MutationKind::X,
            Delta::VertexY { .. } => MutationKind::Y,
            Delta::Red(_) => MutationKind::R,
            Delta::Green(_) => MutationKind::G,
            Delta::Blue(_) => MutationKind::B,
            Delta::Alpha(_) => MutationKind::A,
        }
    }
}

/// Random source for one engine: population shape, canvas size and its own PRNG.
#[derive(Debug, Clone)]
pub struct Mutator {
    rng: Pcg32,
    vertex_count: usize,
    kind: Uniform<usize>,
    vertex_x: Uniform<i32>,
    vertex_y: Uniform<i32>,
    polygon_index: Uniform<usize>,
    vertex_index: Uniform<usize>,
}

impl Mutator {
    /// `seed == None` draws the seed from OS entropy.
    pub fn new(
        polygon_count: usize,
        vertex_count: usize,
        width: usize,
        height: usize,
        seed: Option<u64>,
    ) -> Mutator {
        assert!(polygon_count > 0 && vertex_count > 0);
        assert!(width > 0 && height > 0);
        let rng = match seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_entropy(),
        };
        Mutator {
            rng,
            vertex_count,
            kind: Uniform::new(0, MutationKind::ALL.len()),
            vertex_x: Uniform::new(0, width as i32),
            vertex_y: Uniform::new(0, height as i32),
            polygon_index: Uniform::new(0, polygon_count),
            vertex_index: Uniform::new(0, vertex_count),
        }
    }

    pub fn mutation_kind(&mut self) -> MutationKind {
        MutationKind::ALL[self.kind.sample(&mut self.rng)]
    }

    pub fn polygon_index(&mut self) -> usize {
        self.polygon_index.sample(&mut self.rng)
    }

    pub fn vertex_index(&mut self) -> usize {
        self.vertex_index.sample(&mut self.rng)
    }

    pub fn vertex_x(&mut self) -> i32 {
        self.vertex_x.sample(&mut self.rng)
    }

    pub fn vertex_y(&mut self) -> i32 {
        self.vertex_y.sample(&mut self.rng)
    }

    pub fn channel(&mut self) -> u8 {
        self.rng.gen::<u8>()
    }

    pub fn color(&mut self) -> Color {
        Color {
            r: self.channel(),
            g: self.channel(),
            b: self.channel(),
        }
    }

    /// Uniform over `[0, 1]` from a full width integer draw.
    pub fn alpha(&mut self) -> f32 {
        (self.rng.gen::<u32>() as f64 / u32::MAX as f64) as f32
    }

    /// Vertices uniform over the whole canvas.
    pub fn polygon(&mut self) -> Polygon {
        let vertices = (0..self.vertex_count)
            .map(|_| Point {
                x: self.vertex_x(),
                y: self.vertex_y(),
            })
            .collect();
        Polygon::new(vertices)
    }
}

/// A polygon in the population plus room for undoing its last mutation.
#[derive(Debug, Clone)]
pub struct Candidate {
    polygon: Polygon,
    color: Color,
    alpha: f32,
    pending: Option<Delta>,
}

impl Candidate {
    pub fn new(polygon: Polygon, color: Color, alpha: f32) -> Candidate {
        Candidate {
            polygon,
            color,
            alpha,
            pending: None,
        }
    }

    pub fn random(mutator: &mut Mutator) -> Candidate {
        let polygon = mutator.polygon();
        let color = mutator.color();
        let alpha = mutator.alpha();
        Candidate::new(polygon, color, alpha)
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn bounds(&self) -> Rect {
        self.polygon.bounds()
    }

    pub fn pending(&self) -> Option<Delta> {
        self.pending
    }

    /// Apply one random edit. Panics if the previous one was neither accepted nor undone.
    pub fn mutate(&mut self, mutator: &mut Mutator) -> MutationKind {
        assert!(
            self.pending.is_none(),
            "mutate called with an unresolved {:?}",
            self.pending
        );
        let delta = match mutator.mutation_kind() {
            MutationKind::X => {
                let index = mutator.vertex_index();
                let previous = self.polygon.get(index).x;
                self.polygon.set_x(index, mutator.vertex_x());
                self.polygon.recompute_bounds();
                Delta::VertexX { index, previous }
            }
            MutationKind::Y => {
                let index = mutator.vertex_index();
                let previous = self.polygon.get(index).y;
                self.polygon.set_y(index, mutator.vertex_y());
                self.polygon.recompute_bounds();
                Delta::VertexY { index, previous }
            }
            MutationKind::R => {
                let previous = self.color.r;
                self.color.r = mutator.channel();
                Delta::Red(previous)
            }
            MutationKind::G => {
                let previous = self.color.g;
                self.color.g = mutator.channel();
                Delta::Green(previous)
            }
            MutationKind::B => {
                let previous = self.color.b;
                self.color.b = mutator.channel();
                Delta::Blue(previous)
            }
            MutationKind::A => {
                let previous = self.alpha;
                self.alpha = mutator.alpha();
                Delta::Alpha(previous)
            }
        };
        self.pending = Some(delta);
        delta.kind()
    }

    /// Keep the last mutation.
    pub fn accept(&mut self) {
        self.pending = None;
    }

    /// Revert the last mutation. Panics if there is none.
    pub fn undo(&mut self) {
        let delta = self
            .pending
            .take()
            .expect("undo called without a pending mutation");
        match delta {
            Delta::VertexX { index, previous } => {
                self.polygon.set_x(index, previous);
                self.polygon.recompute_bounds();
            }
            Delta::VertexY { index, previous } => {
                self.polygon.set_y(index, previous);
                self.polygon.recompute_bounds();
            }
            Delta::Red(previous) => self.color.r = previous,
            Delta::Green(previous) => self.color.g = previous,
            Delta::Blue(previous) => self.color.b = previous,
            Delta::Alpha(previous) => self.alpha = previous,
        }
    }

    pub fn to_gene(&self) -> PolygonGene {
        PolygonGene {
            color: self.color,
            alpha: self.alpha,
            vertices: self.polygon.vertices().to_vec(),
        }
    }
}

impl From<&PolygonGene> for Candidate {
    fn from(gene: &PolygonGene) -> Self {
        Candidate::new(Polygon::new(gene.vertices.clone()), gene.color, gene.alpha)
    }
}
