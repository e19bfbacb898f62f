pub mod color;
pub mod edge;
pub mod genome;
pub mod image;
pub mod point;
pub mod polygon;
pub mod rect;
