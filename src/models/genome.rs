use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{MIN_POLYGON_COUNT, MIN_VERTEX_COUNT};

use super::{color::Color, point::Point};

#[derive(Debug, Error, PartialEq)]
pub enum GenomeError {
    #[error("unexpected end of genome while reading {0}")]
    UnexpectedEnd(&'static str),
    #[error("invalid {what}: {token:?}")]
    InvalidNumber { what: &'static str, token: String },
    #[error("vertex count {0} is below {}", MIN_VERTEX_COUNT)]
    TooFewVertices(usize),
    #[error("polygon count {0} is below {}", MIN_POLYGON_COUNT)]
    TooFewPolygons(usize),
    #[error("polygon {index} has {found} vertices, expected {expected}")]
    VertexCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("genome lists {found} polygons, expected {expected}")]
    PolygonCountMismatch { expected: usize, found: usize },
    #[error("polygon {index} alpha {alpha} is outside [0, 1]")]
    AlphaOutOfRange { index: usize, alpha: f32 },
    #[error("polygon {index} has a negative vertex {point}")]
    NegativeVertex { index: usize, point: Point },
    #[error("trailing data after genome: {0:?}")]
    TrailingData(String),
}

/// One polygon of a genome.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolygonGene {
    pub color: Color,
    pub alpha: f32,
    pub vertices: Vec<Point>,
}

/// Serializable description of a whole polygon population.
///
/// The text form is whitespace separated:
/// `VERTEX_COUNT POLYGON_COUNT R G B A X0 Y0 ... XN YN R G B A X0 Y0 ...`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Genome {
    pub vertex_count: usize,
    pub polygon_count: usize,
    pub polygons: Vec<PolygonGene>,
}

impl Genome {
    pub fn new(vertex_count: usize, polygon_count: usize) -> Genome {
        Genome {
            vertex_count,
            polygon_count,
            polygons: Vec::with_capacity(polygon_count),
        }
    }

    pub fn add(&mut self, vertices: &[Point], color: Color, alpha: f32) {
        self.polygons.push(PolygonGene {
            color,
            alpha,
            vertices: vertices.to_vec(),
        });
    }

    /// Range checks an engine relies on but never repeats itself.
    pub fn validate(&self) -> Result<(), GenomeError> {
        if self.vertex_count < MIN_VERTEX_COUNT {
            return Err(GenomeError::TooFewVertices(self.vertex_count));
        }
        if self.polygon_count < MIN_POLYGON_COUNT {
            return Err(GenomeError::TooFewPolygons(self.polygon_count));
        }
        if self.polygons.len() != self.polygon_count {
            return Err(GenomeError::PolygonCountMismatch {
                expected: self.polygon_count,
                found: self.polygons.len(),
            });
        }
        for (index, gene) in self.polygons.iter().enumerate() {
            if gene.vertices.len() != self.vertex_count {
                return Err(GenomeError::VertexCountMismatch {
                    index,
                    expected: self.vertex_count,
                    found: gene.vertices.len(),
                });
            }
            if !(0.0..=1.0).contains(&gene.alpha) {
                return Err(GenomeError::AlphaOutOfRange {
                    index,
                    alpha: gene.alpha,
                });
            }
            if let Some(&point) = gene.vertices.iter().find(|p| p.x < 0 || p.y < 0) {
                return Err(GenomeError::NegativeVertex { index, point });
            }
        }
        Ok(())
    }
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next<T: FromStr>(&mut self, what: &'static str) -> Result<T, GenomeError> {
        let token = self.inner.next().ok_or(GenomeError::UnexpectedEnd(what))?;
        token.parse().map_err(|_| GenomeError::InvalidNumber {
            what,
            token: token.to_string(),
        })
    }
}

impl FromStr for Genome {
    type Err = GenomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = Tokens {
            inner: s.split_whitespace(),
        };
        let vertex_count: usize = tokens.next("vertex count")?;
        let polygon_count: usize = tokens.next("polygon count")?;
        if vertex_count < MIN_VERTEX_COUNT {
            return Err(GenomeError::TooFewVertices(vertex_count));
        }
        if polygon_count < MIN_POLYGON_COUNT {
            return Err(GenomeError::TooFewPolygons(polygon_count));
        }

        let mut genome = Genome::new(vertex_count, polygon_count);
        for _ in 0..polygon_count {
            let color = Color {
                r: tokens.next("red channel")?,
                g: tokens.next("green channel")?,
                b: tokens.next("blue channel")?,
            };
            let alpha: f32 = tokens.next("alpha")?;
            let vertices = (0..vertex_count)
                .map(|_| {
                    Ok(Point {
                        x: tokens.next("x coordinate")?,
                        y: tokens.next("y coordinate")?,
                    })
                })
                .collect::<Result<Vec<Point>, GenomeError>>()?;
            genome.polygons.push(PolygonGene {
                color,
                alpha,
                vertices,
            });
        }

        if let Some(extra) = tokens.inner.next() {
            return Err(GenomeError::TrailingData(extra.to_string()));
        }
        genome.validate()?;
        Ok(genome)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.vertex_count, self.polygon_count)?;
        for gene in &self.polygons {
            let c = gene.color;
            write!(f, " {} {} {} {}", c.r, c.g, c.b, gene.alpha)?;
            for p in &gene.vertices {
                write!(f, " {} {}", p.x, p.y)?;
            }
        }
        writeln!(f)
    }
}
