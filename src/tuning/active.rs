//! The tuning system currently in use, shared between threads.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::TuningSystem;

/// Shared slot holding the active [`TuningSystem`].
///
/// Writers replace the whole value; readers get an `Arc` snapshot that stays
/// valid even if the slot is swapped while they hold it. Reads never block.
#[derive(Debug, Clone)]
pub struct ActiveTuning {
    current: Arc<ArcSwap<TuningSystem>>,
}

impl ActiveTuning {
    pub fn new(system: TuningSystem) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(system)),
        }
    }

    /// Snapshot of the active system.
    pub fn load(&self) -> Arc<TuningSystem> {
        self.current.load_full()
    }

    /// Replace the active system, returning the previous one.
    pub fn set(&self, system: TuningSystem) -> Arc<TuningSystem> {
        self.current.swap(Arc::new(system))
    }
}

impl Default for ActiveTuning {
    fn default() -> Self {
        Self::new(TuningSystem::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Key, NoteNumber};

    #[test]
    fn swap_is_visible_to_clones() {
        let active = ActiveTuning::default();
        let reader = active.clone();

        let before = reader.load();
        let previous = active.set(TuningSystem::pythagorean(Key::C));

        assert_eq!(*previous, TuningSystem::equal_temperament());
        assert_eq!(reader.load().name(), "Pythagorean");
        // Old snapshots are untouched by the swap.
        assert_eq!(before.to_frequency(NoteNumber::A4), 440.0);
    }
}
