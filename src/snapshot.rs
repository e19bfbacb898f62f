use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::Result;
use tracing::info;

use crate::{
    engine::Engine,
    files::{save_genome, save_image},
    settings::{LOG_EVERY_ITERATIONS, SNAPSHOT_PAD},
    utils::padded,
};

/// Which counter drives periodic saves, and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    Iterations(u64),
    Improvements(u64),
}

impl SaveTrigger {
    fn count(&self, engine: &Engine) -> u64 {
        match self {
            SaveTrigger::Iterations(_) => engine.iterations(),
            SaveTrigger::Improvements(_) => engine.improvements(),
        }
    }

    fn every(&self) -> u64 {
        match self {
            SaveTrigger::Iterations(n) | SaveTrigger::Improvements(n) => (*n).max(1),
        }
    }
}

/// Writes `{stem}_{iterations}.png` and `{stem}_{iterations}.dna` as an
/// engine progresses. Nothing is written while the best image is unchanged
/// since the previous snapshot.
pub struct SnapshotSaver {
    stem: PathBuf,
    trigger: SaveTrigger,
    // trigger counter at the last check that was due
    last: u64,
    // improvement count of the last written snapshot
    saved_improvements: u64,
}

impl SnapshotSaver {
    /// `stem` is a path without extension, e.g. `out/portrait`.
    pub fn new(stem: &Path, trigger: SaveTrigger) -> SnapshotSaver {
        SnapshotSaver {
            stem: stem.to_path_buf(),
            trigger,
            last: 0,
            saved_improvements: 0,
        }
    }

    fn path(&self, iterations: u64, ext: &str) -> PathBuf {
        let name = self
            .stem
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.stem
            .with_file_name(format!("{name}_{}.{ext}", padded(iterations, SNAPSHOT_PAD)))
    }

    /// Save if the trigger counter advanced by at least its interval since the
    /// last due check. Returns the image path when something was written.
    pub fn update(&mut self, engine: &Engine) -> Result<Option<PathBuf>> {
        let count = self.trigger.count(engine);
        if count < self.last + self.trigger.every() {
            return Ok(None);
        }
        self.last = count;
        self.save(engine)
    }

    /// Save now unless nothing improved since the last snapshot.
    pub fn save(&mut self, engine: &Engine) -> Result<Option<PathBuf>> {
        let stats = engine.stats();
        if stats.improvements == self.saved_improvements {
            return Ok(None);
        }
        let image_path = self.path(stats.iterations, "png");
        save_image(engine.best_image(), &image_path)?;
        save_genome(&engine.export_genome(), &self.path(stats.iterations, "dna"))?;
        self.saved_improvements = stats.improvements;
        info!(
            path = %image_path.display(),
            iterations = stats.iterations,
            improvements = stats.improvements,
            fitness = stats.fitness,
            "snapshot saved"
        );
        Ok(Some(image_path))
    }
}

/// Drive `engine` until `max_iterations` is reached or `stop` is raised,
/// saving periodically and once more on the way out.
pub fn run(
    engine: &mut Engine,
    saver: &mut SnapshotSaver,
    max_iterations: Option<u64>,
    stop: &AtomicBool,
) -> Result<()> {
    loop {
        if max_iterations.is_some_and(|max| engine.iterations() >= max) {
            break;
        }
        if stop.load(Ordering::SeqCst) {
            info!("interrupted, writing final snapshot");
            break;
        }
        engine.advance_one();
        saver.update(engine)?;

        if engine.iterations() % LOG_EVERY_ITERATIONS == 0 {
            let stats = engine.stats();
            let rate = stats.iterations as f64 / stats.elapsed_seconds.max(1e-9);
            info!(
                iterations = stats.iterations,
                improvements = stats.improvements,
                fitness = stats.fitness,
                rate = rate.round(),
                "progress"
            );
        }
    }

    saver.save(engine)?;
    Ok(())
}
