//! Allomancy systems
//!
//! Glue between the pure burn engine and a Bevy world. Each tick the
//! allomancers advance against a snapshot of the world, then their effects
//! are applied in phases.
//!
//! Both the headless runner and any graphical host use the same system
//! registration via [`add_core_allomancy_systems`].

use bevy::prelude::*;
use std::collections::HashMap;

use super::burning::Allomancer;
use super::components::{
    ActiveStatuses, AnchorMarkers, DroppedItem, Mobile, SimulationTick, Velocity,
};
use super::constants::{REST_SPEED, VELOCITY_RETENTION};
use super::events::BurnEffectsEvent;
use super::input::InputSignals;
use super::log::BurnLog;
use super::metals::Metal;
use super::world::{MaterialTable, MobileEntity, OwnableItem, TileMap, WorldObjectId, WorldSnapshot};

/// System sets for the allomancy tick, run in order.
///
/// - `Input`: whatever drives [`InputSignals`] (keys, scripts, AI)
/// - `Burn`: allomancers advance and emit their effects
/// - `Resolve`: effects are applied to the world
/// - `Motion`: velocities integrate and the tick counter advances
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AllomancySet {
    Input,
    Burn,
    Resolve,
    Motion,
}

/// Configure the ordering of the allomancy system sets.
pub fn configure_allomancy_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            AllomancySet::Input,
            AllomancySet::Burn,
            AllomancySet::Resolve,
            AllomancySet::Motion,
        )
            .chain(),
    );
}

/// Adds core allomancy systems to the app.
///
/// # Arguments
/// * `app` - The Bevy App to add systems to
/// * `run_condition` - A run condition (e.g., `in_state(GameState::Playing)`)
///
/// # Example
/// ```ignore
/// // Always run (headless)
/// add_core_allomancy_systems(&mut app, || true);
/// ```
pub fn add_core_allomancy_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_systems(
        Update,
        (clear_anchor_markers, advance_allomancers)
            .chain()
            .in_set(AllomancySet::Burn)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        (
            apply_impulses,
            spawn_extracted_items,
            tick_statuses,
            apply_statuses,
            merge_anchor_markers,
            record_burn_log,
        )
            .chain()
            .in_set(AllomancySet::Resolve)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        (integrate_velocity, advance_tick)
            .chain()
            .in_set(AllomancySet::Motion)
            .run_if(run_condition),
    );
}

/// World id of an entity, as seen by the engine.
pub fn world_id(entity: Entity) -> WorldObjectId {
    entity.to_bits()
}

/// Entity behind a world id, if the id came from [`world_id`].
pub fn entity_of(id: WorldObjectId) -> Option<Entity> {
    Entity::try_from_bits(id).ok()
}

/// Anchor markers only live for the tick they were placed in.
pub fn clear_anchor_markers(mut anchors: ResMut<AnchorMarkers>) {
    anchors.clear();
}

/// Advance every allomancer one tick against a snapshot of the world.
///
/// Allomancers are listed among the mobiles so burners can target each
/// other; an allomancer burning copper is flagged as concealed.
pub fn advance_allomancers(
    tiles: Res<TileMap>,
    materials: Res<MaterialTable>,
    mut allomancers: Query<(Entity, &mut Allomancer, &InputSignals, &Transform)>,
    mobiles: Query<(Entity, &Mobile, &Transform), Without<Allomancer>>,
    items: Query<(Entity, &DroppedItem, &Transform)>,
    mut effects_events: EventWriter<BurnEffectsEvent>,
) {
    let mut world = WorldSnapshot::new(&tiles, &materials);

    for (entity, allomancer, _, transform) in allomancers.iter() {
        world.mobiles.push(MobileEntity {
            id: world_id(entity),
            position: transform.translation.truncate(),
            armor: None,
            value: 0,
            burning: allomancer.state().any_burning(),
            concealed: allomancer.is_burning(Metal::Copper),
        });
    }
    for (entity, mobile, transform) in mobiles.iter() {
        world.mobiles.push(MobileEntity {
            id: world_id(entity),
            position: transform.translation.truncate(),
            armor: mobile.armor,
            value: mobile.value,
            burning: false,
            concealed: false,
        });
    }
    for (entity, item, transform) in items.iter() {
        world.items.push(OwnableItem {
            id: world_id(entity),
            position: transform.translation.truncate(),
            kind: item.kind,
        });
    }

    for (entity, mut allomancer, input, transform) in allomancers.iter_mut() {
        allomancer.world_id = Some(world_id(entity));
        allomancer.position = transform.translation.truncate();

        let effects = allomancer.advance(input, &world);
        if effects.is_empty() {
            continue;
        }
        effects_events.send(BurnEffectsEvent {
            agent: entity,
            agent_name: allomancer.name.clone(),
            effects,
        });
    }
}

/// Add pushes and pulls to the velocities of the burner and its targets.
pub fn apply_impulses(
    mut effects_events: EventReader<BurnEffectsEvent>,
    mut velocities: Query<&mut Velocity>,
) {
    for event in effects_events.read() {
        let effects = &event.effects;
        if effects.agent_velocity != Vec2::ZERO {
            if let Ok(mut velocity) = velocities.get_mut(event.agent) {
                velocity.0 += effects.agent_velocity;
            }
        }

        for impulse in &effects.impulses {
            let Some(target) = entity_of(impulse.target.id()) else {
                continue;
            };
            if let Ok(mut velocity) = velocities.get_mut(target) {
                velocity.0 += impulse.delta;
            }
        }
    }
}

/// Spawn coins torn out of mobiles, taking their worth from the source.
pub fn spawn_extracted_items(
    mut commands: Commands,
    mut effects_events: EventReader<BurnEffectsEvent>,
    mut mobiles: Query<&mut Mobile>,
) {
    for event in effects_events.read() {
        for spawn in &event.effects.spawns {
            if let Some(source) = entity_of(spawn.source) {
                if let Ok(mut mobile) = mobiles.get_mut(source) {
                    mobile.value = mobile.value.saturating_sub(spawn.count);
                }
            }

            commands.spawn((
                Transform::from_translation(spawn.position.extend(0.0)),
                Velocity(spawn.velocity),
                DroppedItem {
                    kind: spawn.kind,
                    count: spawn.count,
                },
            ));
        }
    }
}

/// Count active statuses down before this tick's applications land.
pub fn tick_statuses(mut statuses: Query<&mut ActiveStatuses>) {
    for mut active in statuses.iter_mut() {
        active.tick();
    }
}

/// Apply and lift statuses requested this tick.
///
/// Entities without [`ActiveStatuses`] get one built from every burner's
/// requests together, so two first statuses in one tick both land.
pub fn apply_statuses(
    mut commands: Commands,
    mut effects_events: EventReader<BurnEffectsEvent>,
    mut statuses: Query<&mut ActiveStatuses>,
) {
    let mut fresh: HashMap<Entity, ActiveStatuses> = HashMap::new();

    for event in effects_events.read() {
        for application in &event.effects.statuses {
            let Some(target) = entity_of(application.target) else {
                continue;
            };
            match statuses.get_mut(target) {
                Ok(mut active) => active.apply(application.status, application.ticks),
                Err(_) => fresh
                    .entry(target)
                    .or_default()
                    .apply(application.status, application.ticks),
            }
        }

        for removal in &event.effects.status_removals {
            let Some(target) = entity_of(removal.target) else {
                continue;
            };
            if let Ok(mut active) = statuses.get_mut(target) {
                active.remove(removal.status);
            } else if let Some(active) = fresh.get_mut(&target) {
                active.remove(removal.status);
            }
        }
    }

    for (target, active) in fresh {
        if let Some(mut entity) = commands.get_entity(target) {
            entity.insert(active);
        }
    }
}

/// Merge every burner's anchors into the shared marker set.
pub fn merge_anchor_markers(
    mut effects_events: EventReader<BurnEffectsEvent>,
    mut anchors: ResMut<AnchorMarkers>,
) {
    for event in effects_events.read() {
        for cell in &event.effects.anchors {
            anchors.insert(*cell);
        }
    }
}

pub fn record_burn_log(
    mut effects_events: EventReader<BurnEffectsEvent>,
    tick: Res<SimulationTick>,
    mut burn_log: ResMut<BurnLog>,
) {
    for event in effects_events.read() {
        burn_log.record_effects(tick.0, &event.agent_name, &event.effects);
    }
}

/// Move everything with a velocity, then bleed speed off.
pub fn integrate_velocity(mut movers: Query<(&mut Transform, &mut Velocity)>) {
    for (mut transform, mut velocity) in movers.iter_mut() {
        if velocity.0 == Vec2::ZERO {
            continue;
        }
        transform.translation += velocity.0.extend(0.0);
        velocity.0 *= VELOCITY_RETENTION;
        if velocity.0.length() < REST_SPEED {
            velocity.0 = Vec2::ZERO;
        }
    }
}

pub fn advance_tick(mut tick: ResMut<SimulationTick>) {
    tick.0 += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allomancy::events::{Status, StatusApplication, TickEffects};

    #[test]
    fn test_world_id_round_trips_entity() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        assert_eq!(entity_of(world_id(entity)), Some(entity));
    }

    fn status_event(agent: Entity, target: Entity, status: Status) -> BurnEffectsEvent {
        let mut effects = TickEffects::default();
        effects.statuses.push(StatusApplication {
            target: world_id(target),
            status,
            ticks: 120,
        });
        BurnEffectsEvent {
            agent,
            agent_name: "Burner".to_string(),
            effects,
        }
    }

    #[test]
    fn test_first_statuses_from_two_burners_both_land() {
        let mut app = App::new();
        app.add_event::<BurnEffectsEvent>();
        app.add_systems(Update, apply_statuses);

        let kelsier = app.world_mut().spawn_empty().id();
        let breeze = app.world_mut().spawn_empty().id();
        let target = app.world_mut().spawn(Transform::default()).id();

        app.world_mut().send_event(status_event(kelsier, target, Status::Enraged));
        app.world_mut().send_event(status_event(breeze, target, Status::Soothed));
        app.update();

        let active = app.world().get::<ActiveStatuses>(target).unwrap();
        assert!(active.has(Status::Enraged));
        assert!(active.has(Status::Soothed));
        assert_eq!(active.remaining(Status::Soothed), Some(120));
    }

    #[test]
    fn test_integrate_velocity_moves_and_settles() {
        let mut app = App::new();
        app.add_systems(Update, integrate_velocity);
        let mover = app
            .world_mut()
            .spawn((Transform::default(), Velocity(Vec2::new(1.0, 0.0))))
            .id();

        app.update();
        let transform = app.world().get::<Transform>(mover).unwrap();
        assert_eq!(transform.translation.x, 1.0);
        let velocity = app.world().get::<Velocity>(mover).unwrap();
        assert!((velocity.0.x - VELOCITY_RETENTION).abs() < 1e-6);

        for _ in 0..100 {
            app.update();
        }
        assert_eq!(app.world().get::<Velocity>(mover).unwrap().0, Vec2::ZERO);
    }
}
