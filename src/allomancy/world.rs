//! Read-only view of the world the engine targets into
//!
//! The engine never owns world objects. Hosts describe them through
//! [`WorldView`], and classify which of them count as metal through a
//! [`MaterialTable`] (or any other `is_metallic` implementation).

use bevy::math::{IVec2, Vec2};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Host-assigned identity of a world object.
pub type WorldObjectId = u64;

/// Item type id from the host's item tables.
pub type ItemKind = u32;

/// Tile type id from the host's tile tables.
pub type TileKind = u32;

/// A creature or other agent that can be moved.
#[derive(Clone, Debug, PartialEq)]
pub struct MobileEntity {
    pub id: WorldObjectId,
    pub position: Vec2,
    /// Item worn or carried that decides whether the entity counts as metal
    pub armor: Option<ItemKind>,
    /// Intrinsic worth that can be partly pulled or pushed out of it
    pub value: u32,
    /// Burning any metal (visible to Bronze)
    pub burning: bool,
    /// Burning Copper (hidden from Bronze)
    pub concealed: bool,
}

/// A loose item lying in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnableItem {
    pub id: WorldObjectId,
    pub position: Vec2,
    pub kind: ItemKind,
}

/// Something a push or pull can lock onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetCandidate {
    Mobile {
        id: WorldObjectId,
        position: Vec2,
        armor: Option<ItemKind>,
    },
    Item {
        id: WorldObjectId,
        position: Vec2,
        kind: ItemKind,
    },
    Cell {
        cell: IVec2,
        position: Vec2,
        kind: TileKind,
    },
}

impl TargetCandidate {
    /// World position; cells report their center.
    pub fn position(&self) -> Vec2 {
        match self {
            TargetCandidate::Mobile { position, .. }
            | TargetCandidate::Item { position, .. }
            | TargetCandidate::Cell { position, .. } => *position,
        }
    }

    /// Identity of movable candidates. Cells have none.
    pub fn id(&self) -> Option<WorldObjectId> {
        match self {
            TargetCandidate::Mobile { id, .. } | TargetCandidate::Item { id, .. } => Some(*id),
            TargetCandidate::Cell { .. } => None,
        }
    }
}

/// What the engine is allowed to see of the world during one tick.
pub trait WorldView {
    fn mobiles(&self) -> &[MobileEntity];
    fn items(&self) -> &[OwnableItem];
    /// Edge length of one tile cell in world units.
    fn cell_size(&self) -> f32;
    fn tile_at(&self, cell: IVec2) -> Option<TileKind>;
    /// Material classification supplied by the host.
    fn is_metallic(&self, candidate: &TargetCandidate) -> bool;
}

/// Which item and tile kinds count as metal.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialTable {
    #[serde(default)]
    pub metallic_items: HashSet<ItemKind>,
    #[serde(default)]
    pub metallic_tiles: HashSet<TileKind>,
}

impl MaterialTable {
    pub fn classify(&self, candidate: &TargetCandidate) -> bool {
        match candidate {
            TargetCandidate::Mobile { armor, .. } => {
                armor.is_some_and(|kind| self.metallic_items.contains(&kind))
            }
            TargetCandidate::Item { kind, .. } => self.metallic_items.contains(kind),
            TargetCandidate::Cell { kind, .. } => self.metallic_tiles.contains(kind),
        }
    }
}

/// Sparse grid of solid tiles.
#[derive(Resource, Clone, Debug)]
pub struct TileMap {
    cell_size: f32,
    tiles: HashMap<IVec2, TileKind>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl TileMap {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            tiles: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn insert(&mut self, cell: IVec2, kind: TileKind) {
        self.tiles.insert(cell, kind);
    }

    pub fn get(&self, cell: IVec2) -> Option<TileKind> {
        self.tiles.get(&cell).copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Cell containing a world position.
    pub fn cell_of(&self, position: Vec2) -> IVec2 {
        cell_of(position, self.cell_size)
    }
}

/// Cell containing `position` on a grid of `cell_size` units.
pub fn cell_of(position: Vec2, cell_size: f32) -> IVec2 {
    if cell_size <= 0.0 {
        return IVec2::ZERO;
    }
    (position / cell_size).floor().as_ivec2()
}

/// World position of a cell's center.
pub fn cell_center(cell: IVec2, cell_size: f32) -> Vec2 {
    (cell.as_vec2() + Vec2::splat(0.5)) * cell_size
}

/// A world copied out of the host at the start of a tick.
#[derive(Clone, Debug)]
pub struct WorldSnapshot<'a> {
    pub mobiles: Vec<MobileEntity>,
    pub items: Vec<OwnableItem>,
    pub tiles: &'a TileMap,
    pub materials: &'a MaterialTable,
}

impl<'a> WorldSnapshot<'a> {
    pub fn new(tiles: &'a TileMap, materials: &'a MaterialTable) -> Self {
        Self {
            mobiles: Vec::new(),
            items: Vec::new(),
            tiles,
            materials,
        }
    }
}

impl WorldView for WorldSnapshot<'_> {
    fn mobiles(&self) -> &[MobileEntity] {
        &self.mobiles
    }

    fn items(&self) -> &[OwnableItem] {
        &self.items
    }

    fn cell_size(&self) -> f32 {
        self.tiles.cell_size()
    }

    fn tile_at(&self, cell: IVec2) -> Option<TileKind> {
        self.tiles.get(cell)
    }

    fn is_metallic(&self, candidate: &TargetCandidate) -> bool {
        self.materials.classify(candidate)
    }
}
