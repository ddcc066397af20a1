//! Lazily built strategy instances, one per kind.

use crate::layout::{LayoutManager, StrategyFactory};
use crate::model::StrategyKind;
use std::fmt;

/// Holds at most one strategy per kind and remembers which one is active.
///
/// Instances are built on first activation and kept for the lifetime of the
/// set, so switching back and forth reuses them.
pub struct StrategySet {
    slots: [Option<Box<dyn LayoutManager>>; 2],
    active: Option<StrategyKind>,
    factory: Box<dyn StrategyFactory>,
}

impl StrategySet {
    /// Empty set building strategies with `factory`.
    pub fn new(factory: Box<dyn StrategyFactory>) -> Self {
        Self {
            slots: [None, None],
            active: None,
            factory,
        }
    }

    /// Mark `kind` active, building it if needed.
    pub fn activate(&mut self, kind: StrategyKind) -> &mut dyn LayoutManager {
        self.active = Some(kind);
        let factory = &mut self.factory;
        let slot = self.slots[kind.slot()].get_or_insert_with(|| factory.create(kind));
        slot.as_mut()
    }

    /// Forget the active strategy. The instance stays built.
    pub fn deactivate(&mut self) -> Option<StrategyKind> {
        self.active.take()
    }

    /// Kind of the active strategy.
    pub fn active_kind(&self) -> Option<StrategyKind> {
        self.active
    }

    /// The active strategy.
    pub fn active(&self) -> Option<&dyn LayoutManager> {
        self.get(self.active?)
    }

    /// The active strategy, mutably.
    pub fn active_mut(&mut self) -> Option<&mut dyn LayoutManager> {
        let kind = self.active?;
        match self.slots[kind.slot()].as_mut() {
            Some(slot) => {
                let layout: &mut dyn LayoutManager = slot.as_mut();
                Some(layout)
            }
            None => None,
        }
    }

    /// The instance for `kind`, if it has been built.
    pub fn get(&self, kind: StrategyKind) -> Option<&dyn LayoutManager> {
        match self.slots[kind.slot()].as_ref() {
            Some(slot) => {
                let layout: &dyn LayoutManager = slot.as_ref();
                Some(layout)
            }
            None => None,
        }
    }

    /// Number of instances built so far.
    pub fn built(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl fmt::Debug for StrategySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategySet")
            .field("active", &self.active)
            .field("built", &self.built())
            .finish_non_exhaustive()
    }
}
