use log::info;
use strata_chunk::{BlockAccess, Chunk};
use strata_world::GenerationError;

/// Result of a save sweep. `Partial` means the per-call budget ran out and
/// more chunks are still waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Complete,
    Partial,
}

/// Receives percentages while a long save is running.
pub trait ProgressSink {
    fn set_progress(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn set_progress(&mut self, percent: u8) {
        self(percent)
    }
}

/// Logs progress under the `save` target.
pub struct LogProgress {
    label: &'static str,
}

impl LogProgress {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl ProgressSink for LogProgress {
    fn set_progress(&mut self, percent: u8) {
        info!(target: "save", "{}: {}%", self.label, percent);
    }
}

/// A source of chunks. Providers chain: a cache asks its upstream for the
/// chunks it cannot load, and is itself a provider.
pub trait ChunkProvider {
    fn chunk_exists(&self, x: i32, z: i32) -> bool;

    fn provide_chunk(&mut self, x: i32, z: i32) -> Result<Chunk, GenerationError>;

    /// Decorates chunk `(x, z)` by writing through `world`.
    fn populate(&mut self, world: &mut dyn BlockAccess, x: i32, z: i32);

    fn save_chunks(&mut self, force: bool, progress: Option<&mut dyn ProgressSink>)
    -> SaveOutcome;

    fn can_save(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |p: u8| seen.push(p);
            let sink: &mut dyn ProgressSink = &mut sink;
            sink.set_progress(10);
            sink.set_progress(20);
        }
        assert_eq!(seen, vec![10, 20]);
    }
}
