pub mod canvas;
pub mod engine;
pub mod evaluator;
pub mod files;
pub mod models;
pub mod mutator;
pub mod settings;
pub mod snapshot;
pub mod tiles;
pub mod utils;
