//! Component and resource definitions for hosting allomancers in Bevy
//!
//! The engine itself works on plain values; these are the ECS shapes a host
//! stores world objects in, and that the systems read and write.

use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::HashSet;

use super::events::Status;
use super::world::ItemKind;

/// Current tick number, advanced once per update.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationTick(pub u64);

/// World velocity in units per tick.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity(pub Vec2);

/// A movable creature that pushes and pulls can act on.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct Mobile {
    /// Worn item deciding whether this counts as metal
    pub armor: Option<ItemKind>,
    /// Worth that can be torn loose as coins
    pub value: u32,
}

/// A stack of loose items lying in the world.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DroppedItem {
    pub kind: ItemKind,
    pub count: u32,
}

/// Statuses imposed by other burners, with ticks remaining.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct ActiveStatuses {
    entries: SmallVec<[(Status, u32); 4]>,
}

impl ActiveStatuses {
    /// Apply a status, keeping the longer of the old and new durations.
    pub fn apply(&mut self, status: Status, ticks: u32) {
        match self.entries.iter_mut().find(|(s, _)| *s == status) {
            Some((_, remaining)) => *remaining = (*remaining).max(ticks),
            None if ticks > 0 => self.entries.push((status, ticks)),
            None => {}
        }
    }

    pub fn remove(&mut self, status: Status) {
        self.entries.retain(|(s, _)| *s != status);
    }

    pub fn has(&self, status: Status) -> bool {
        self.entries.iter().any(|(s, _)| *s == status)
    }

    pub fn remaining(&self, status: Status) -> Option<u32> {
        self.entries.iter().find(|(s, _)| *s == status).map(|(_, t)| *t)
    }

    /// Count every status down one tick, dropping expired ones.
    pub fn tick(&mut self) {
        self.entries.retain(|(_, remaining)| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tiles anchored on by any burner this tick. Several burners may anchor on
/// the same cell; inserting is idempotent.
#[derive(Resource, Clone, Debug, Default)]
pub struct AnchorMarkers {
    cells: HashSet<IVec2>,
}

impl AnchorMarkers {
    /// Mark a cell. Returns false if it was already marked.
    pub fn insert(&mut self, cell: IVec2) -> bool {
        self.cells.insert(cell)
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Marked cells ordered by row, then column.
    pub fn sorted(&self) -> Vec<IVec2> {
        let mut cells: Vec<IVec2> = self.cells.iter().copied().collect();
        cells.sort_by_key(|cell| (cell.y, cell.x));
        cells
    }
}
