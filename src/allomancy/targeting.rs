//! Push/pull target selection
//!
//! Range is gated on the burner's position, but the winner is whichever
//! surviving candidate sits closest to the aim point. Aiming therefore picks
//! *which* in-range object is affected, independent of which one is
//! physically nearest. Ties keep the first candidate seen.

use bevy::math::{IVec2, Vec2};

use super::constants::TILE_SCAN_MARGIN;
use super::world::{cell_center, cell_of, TargetCandidate, WorldObjectId, WorldView};

/// Pick the candidate nearest `aim_point` among those strictly within
/// `radius` of `origin` that pass `classify`.
pub fn select_nearest<I, F>(
    origin: Vec2,
    aim_point: Vec2,
    radius: f32,
    candidates: I,
    mut classify: F,
) -> Option<TargetCandidate>
where
    I: IntoIterator<Item = TargetCandidate>,
    F: FnMut(&TargetCandidate) -> bool,
{
    let radius_sq = radius * radius;
    let mut best: Option<(f32, TargetCandidate)> = None;

    for candidate in candidates {
        let position = candidate.position();
        if position.distance_squared(origin) >= radius_sq {
            continue;
        }
        if !classify(&candidate) {
            continue;
        }

        let aim_distance_sq = position.distance_squared(aim_point);
        match best {
            Some((best_sq, _)) if best_sq <= aim_distance_sq => {}
            _ => best = Some((aim_distance_sq, candidate)),
        }
    }

    best.map(|(_, candidate)| candidate)
}

/// Half-width, in cells, of the square scanned around the burner's cell.
pub fn tile_scan_extent(radius: f32, cell_size: f32) -> i32 {
    if cell_size <= 0.0 || radius <= 0.0 {
        return 0;
    }
    // Float-to-int casts saturate, the margin must too
    ((radius / cell_size).ceil() as i32).saturating_add(TILE_SCAN_MARGIN)
}

/// Every occupied cell in the scan square around `origin`, as candidates at
/// cell centers.
pub fn tile_candidates(
    world: &dyn WorldView,
    origin: Vec2,
    radius: f32,
) -> impl Iterator<Item = TargetCandidate> + '_ {
    let cell_size = world.cell_size();
    let center = cell_of(origin, cell_size);
    let extent = if cell_size > 0.0 {
        tile_scan_extent(radius, cell_size)
    } else {
        -1
    };

    (-extent..=extent).flat_map(move |dx| {
        (-extent..=extent).filter_map(move |dy| {
            let cell = center + IVec2::new(dx, dy);
            world.tile_at(cell).map(|kind| TargetCandidate::Cell {
                cell,
                position: cell_center(cell, cell_size),
                kind,
            })
        })
    })
}

/// All three candidate domains in scan order: mobiles, items, then tiles.
pub fn world_candidates(
    world: &dyn WorldView,
    origin: Vec2,
    radius: f32,
) -> impl Iterator<Item = TargetCandidate> + '_ {
    let mobiles = world.mobiles().iter().map(|mobile| TargetCandidate::Mobile {
        id: mobile.id,
        position: mobile.position,
        armor: mobile.armor,
    });
    let items = world.items().iter().map(|item| TargetCandidate::Item {
        id: item.id,
        position: item.position,
        kind: item.kind,
    });

    mobiles.chain(items).chain(tile_candidates(world, origin, radius))
}

/// The metal target a push or pull would lock onto this tick.
///
/// `exclude` keeps the burner from targeting itself when it is also listed
/// among the world's mobiles.
pub fn select_metal_target(
    world: &dyn WorldView,
    origin: Vec2,
    aim_point: Vec2,
    radius: f32,
    exclude: Option<WorldObjectId>,
) -> Option<TargetCandidate> {
    select_nearest(
        origin,
        aim_point,
        radius,
        world_candidates(world, origin, radius),
        |candidate| {
            let is_self = exclude.is_some() && candidate.id() == exclude;
            !is_self && world.is_metallic(candidate)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allomancy::world::{MaterialTable, MobileEntity, OwnableItem, TileMap, WorldSnapshot};

    fn item(id: WorldObjectId, x: f32, y: f32) -> TargetCandidate {
        TargetCandidate::Item { id, position: Vec2::new(x, y), kind: 1 }
    }

    #[test]
    fn test_aim_point_breaks_ties() {
        let picked = select_nearest(
            Vec2::ZERO,
            Vec2::new(300.0, 0.0),
            400.0,
            [item(1, 100.0, 0.0), item(2, 350.0, 0.0)],
            |_| true,
        );
        assert_eq!(picked, Some(item(2, 350.0, 0.0)));
    }

    #[test]
    fn test_radius_is_exclusive() {
        let picked = select_nearest(Vec2::ZERO, Vec2::ZERO, 100.0, [item(1, 100.0, 0.0)], |_| true);
        assert_eq!(picked, None);
    }

    #[test]
    fn test_first_wins_on_equal_aim_distance() {
        let picked = select_nearest(
            Vec2::ZERO,
            Vec2::ZERO,
            100.0,
            [item(1, 10.0, 0.0), item(2, -10.0, 0.0), item(3, 0.0, 10.0)],
            |_| true,
        );
        assert_eq!(picked.and_then(|c| c.id()), Some(1));
    }

    #[test]
    fn test_candidate_on_origin_wins() {
        let picked = select_nearest(
            Vec2::ZERO,
            Vec2::ZERO,
            50.0,
            [item(1, 5.0, 0.0), item(2, 0.0, 0.0)],
            |_| true,
        );
        assert_eq!(picked.and_then(|c| c.id()), Some(2));
    }

    #[test]
    fn test_classify_filters() {
        let picked = select_nearest(
            Vec2::ZERO,
            Vec2::ZERO,
            100.0,
            [item(1, 1.0, 0.0), item(2, 50.0, 0.0)],
            |c| c.id() == Some(2),
        );
        assert_eq!(picked.and_then(|c| c.id()), Some(2));
    }

    #[test]
    fn test_scan_extent() {
        assert_eq!(tile_scan_extent(400.0, 16.0), 27);
        assert_eq!(tile_scan_extent(16.0, 16.0), 3);
        assert_eq!(tile_scan_extent(10.0, 0.0), 0);
        assert_eq!(tile_scan_extent(f32::INFINITY, 16.0), i32::MAX);
        assert_eq!(tile_scan_extent(f32::NAN, 16.0), TILE_SCAN_MARGIN);
    }

    #[test]
    fn test_tile_candidates_cover_square() {
        let mut tiles = TileMap::new(16.0);
        tiles.insert(IVec2::new(3, 0), 9);
        tiles.insert(IVec2::new(-3, -3), 9);
        tiles.insert(IVec2::new(4, 0), 9); // outside a radius-16 scan
        let materials = MaterialTable::default();
        let world = WorldSnapshot::new(&tiles, &materials);

        let cells: Vec<IVec2> = tile_candidates(&world, Vec2::new(8.0, 8.0), 16.0)
            .filter_map(|c| match c {
                TargetCandidate::Cell { cell, .. } => Some(cell),
                _ => None,
            })
            .collect();
        assert_eq!(cells, vec![IVec2::new(-3, -3), IVec2::new(3, 0)]);
    }

    #[test]
    fn test_metal_target_spans_domains_and_skips_self() {
        let mut tiles = TileMap::new(16.0);
        tiles.insert(IVec2::new(5, 0), 9);
        let mut materials = MaterialTable::default();
        materials.metallic_items.insert(1);
        materials.metallic_tiles.insert(9);

        let mut world = WorldSnapshot::new(&tiles, &materials);
        world.mobiles.push(MobileEntity {
            id: 10,
            position: Vec2::new(0.0, 0.0),
            armor: Some(1),
            value: 0,
            burning: true,
            concealed: false,
        });
        world.items.push(OwnableItem { id: 20, position: Vec2::new(-40.0, 0.0), kind: 2 });

        // Agent 10 aims at the tile: the wooden item is ignored, itself skipped
        let picked = select_metal_target(&world, Vec2::ZERO, Vec2::new(100.0, 8.0), 200.0, Some(10));
        assert!(matches!(picked, Some(TargetCandidate::Cell { cell, .. }) if cell == IVec2::new(5, 0)));

        // Without the exclusion the armored mobile at the origin is selectable
        let picked = select_metal_target(&world, Vec2::ZERO, Vec2::ZERO, 200.0, None);
        assert_eq!(picked.and_then(|c| c.id()), Some(10));
    }
}
