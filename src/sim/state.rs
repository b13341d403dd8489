//! Game map state and its collaborators
//!
//! The map owns every entity of the session. The player and the HUD are
//! separate values the host passes in, so nothing here is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::dynamite::Dynamite;
use super::entity::Entity;
use super::hook::{Carried, Hook, HookStatus};
use super::items::{GroundItem, ItemKind, SurpriseReward};
use super::movable::Movable;
use super::registry::{EntityId, Registry};
use crate::consts::*;

/// Score and inventory of the person playing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub score: i64,
    pub dynamites: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            score: 0,
            dynamites: STARTING_DYNAMITES,
        }
    }

    pub fn add_score(&mut self, delta: i64) {
        self.score += delta;
    }
}

/// Values shown on screen; written by the map, never validated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub level: u32,
    /// Seconds left in the current level
    pub time: i64,
}

/// Things that happened during a frame or a player action.
/// Spawn/removal events are emitted in the same call that changes the registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    EntitySpawned(EntityId),
    EntityRemoved(EntityId),
    HookLaunched,
    ItemGrabbed { id: EntityId, kind: ItemKind },
    ItemDelivered { kind: ItemKind, score: i64 },
    SurpriseOpened(SurpriseReward),
    DynamiteThrown,
    ItemDestroyed { id: EntityId, kind: ItemKind },
    LevelCompleted { level: u32 },
    GameOver { level: u32, score: i64 },
}

/// Hook as seen by a renderer
#[derive(Debug, Clone, Serialize)]
pub struct HookView {
    pub position: Vec2,
    pub angle: f32,
    pub status: HookStatus,
    pub carrying: Option<Carried>,
}

/// Serializable picture of the map for renderers
#[derive(Debug, Clone, Serialize)]
pub struct MapSnapshot {
    pub level: u32,
    pub time: i64,
    pub is_game_over: bool,
    pub floor: Entity,
    pub hook: Option<HookView>,
    pub dynamite: Option<Vec2>,
    pub items: Vec<GroundItem>,
}

/// The gold digger map: one per game session
#[derive(Debug, Clone)]
pub struct GameMap {
    /// Run seed
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Map bounds, centred on the origin
    pub entity: Entity,
    pub floor: Entity,
    /// Current level (0-based), only ever increases
    pub level: u32,
    /// Seconds granted for the current level
    pub scheduled_time: i64,
    /// Seconds left, recomputed every clock tick
    pub time: i64,
    /// Host timestamp (ms) at which the current level started
    pub level_start_ms: f64,
    pub is_game_over: bool,
    /// Hook and dynamite, updated every frame in registration order
    pub movables: Registry<Movable>,
    /// Gold, rocks and sacks of the current level
    pub ground_items: Registry<GroundItem>,
    hook_id: EntityId,
    dynamite_id: Option<EntityId>,
    next_id: u32,
    events: Vec<GameEvent>,
}

impl GameMap {
    /// Create the map, its hook and the first level
    pub fn new(seed: u64, now_ms: f64) -> Self {
        let mut map = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            entity: Entity::new(Vec2::ZERO, MAP_SIZE),
            floor: Entity::new(Vec2::new(0.0, FLOOR_HEIGHT), Vec2::new(MAP_SIZE.x, 1.0)),
            level: 0,
            scheduled_time: 0,
            time: 0,
            level_start_ms: now_ms,
            is_game_over: false,
            movables: Registry::new(),
            ground_items: Registry::new(),
            hook_id: EntityId(0),
            dynamite_id: None,
            next_id: 1,
            events: Vec::new(),
        };

        map.hook_id = map.register_movable(Movable::Hook(Hook::new()));
        map.initialize_level();
        map.calculate_current_level_time(now_ms);

        log::info!(
            "Map created with seed {}: {} items, {}s on the clock",
            seed,
            map.ground_items.len(),
            map.time
        );
        map
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn hook_id(&self) -> EntityId {
        self.hook_id
    }

    pub fn dynamite_id(&self) -> Option<EntityId> {
        self.dynamite_id
    }

    pub fn hook(&self) -> Option<&Hook> {
        self.movables.get(self.hook_id).and_then(Movable::as_hook)
    }

    pub fn hook_mut(&mut self) -> Option<&mut Hook> {
        self.movables.get_mut(self.hook_id).and_then(Movable::as_hook_mut)
    }

    pub fn dynamite(&self) -> Option<&Dynamite> {
        self.dynamite_id
            .and_then(|id| self.movables.get(id))
            .and_then(Movable::as_dynamite)
    }

    /// Add a movable to the per-frame registry
    pub fn register_movable(&mut self, movable: Movable) -> EntityId {
        let id = self.next_entity_id();
        self.movables.insert(id, movable);
        self.events.push(GameEvent::EntitySpawned(id));
        id
    }

    /// Remove a movable from the per-frame registry
    pub fn unregister_movable(&mut self, id: EntityId) -> Option<Movable> {
        let movable = self.movables.remove(id)?;
        if self.dynamite_id == Some(id) {
            self.dynamite_id = None;
        }
        self.events.push(GameEvent::EntityRemoved(id));
        Some(movable)
    }

    /// Send the hook down along its current aim
    pub fn launch_hook(&mut self) -> bool {
        if self.is_game_over {
            return false;
        }
        let launched = self.hook_mut().is_some_and(Hook::launch);
        if launched {
            self.events.push(GameEvent::HookLaunched);
        }
        launched
    }

    /// Throw a stick of dynamite along the hook's aim.
    /// Needs a spare stick, no stick already flying and a hook that isn't reeling in.
    pub fn throw_dynamite(&mut self, player: &mut Player) -> bool {
        if self.is_game_over || player.dynamites == 0 || self.dynamite_id.is_some() {
            return false;
        }
        let Some(direction) = self
            .hook()
            .filter(|hook| hook.status != HookStatus::Pulling)
            .map(Hook::direction)
        else {
            return false;
        };

        let id = self.register_movable(Movable::Dynamite(Dynamite::thrown(HOOK_ORIGIN, direction)));
        self.dynamite_id = Some(id);
        player.dynamites -= 1;
        self.events.push(GameEvent::DynamiteThrown);
        log::debug!("Dynamite {:?} thrown, {} left", id, player.dynamites);
        true
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand every queued event to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            level: self.level,
            time: self.time,
            is_game_over: self.is_game_over,
            floor: self.floor,
            hook: self.hook().map(|hook| HookView {
                position: hook.position(),
                angle: hook.angle,
                status: hook.status,
                carrying: hook.carrying,
            }),
            dynamite: self.dynamite().map(|d| d.body.entity.position),
            items: self.ground_items.iter().map(|(_, item)| item.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map() {
        let map = GameMap::new(12345, 0.0);
        assert_eq!(map.level, 0);
        assert!(!map.is_game_over);
        assert_eq!(map.movables.len(), 1);
        let hook = map.hook().expect("hook should be registered");
        assert_eq!(hook.status, HookStatus::Idle);
        assert_eq!(hook.position(), HOOK_ORIGIN);
        assert!(map.dynamite().is_none());
        assert!(!map.ground_items.is_empty());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let map = GameMap::new(1, 0.0);
        let mut ids = map.ground_items.ids();
        ids.extend(map.movables.ids());
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_spawn_events_match_registries() {
        let mut map = GameMap::new(2, 0.0);
        let spawned = map
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EntitySpawned(_)))
            .count();
        assert_eq!(spawned, map.ground_items.len() + map.movables.len());
        assert!(map.drain_events().is_empty());
    }

    #[test]
    fn test_launch_hook() {
        let mut map = GameMap::new(3, 0.0);
        map.drain_events();
        assert!(map.launch_hook());
        assert!(!map.launch_hook());
        assert_eq!(map.drain_events(), vec![GameEvent::HookLaunched]);
        assert_eq!(map.hook().map(|h| h.status), Some(HookStatus::Extending));
    }

    #[test]
    fn test_throw_dynamite_consumes_a_stick() {
        let mut map = GameMap::new(4, 0.0);
        let mut player = Player::new();
        assert_eq!(player.dynamites, STARTING_DYNAMITES);

        assert!(map.throw_dynamite(&mut player));
        assert_eq!(player.dynamites, STARTING_DYNAMITES - 1);
        assert!(map.dynamite().is_some());
        assert_eq!(map.movables.len(), 2);

        // Only one stick in the air at a time
        player.dynamites = 5;
        assert!(!map.throw_dynamite(&mut player));
        assert_eq!(player.dynamites, 5);
    }

    #[test]
    fn test_throw_dynamite_without_sticks() {
        let mut map = GameMap::new(5, 0.0);
        let mut player = Player {
            score: 0,
            dynamites: 0,
        };
        assert!(!map.throw_dynamite(&mut player));
        assert!(map.dynamite().is_none());
    }

    #[test]
    fn test_unregister_movable_clears_dynamite_slot() {
        let mut map = GameMap::new(6, 0.0);
        let mut player = Player::new();
        map.throw_dynamite(&mut player);
        let id = map.dynamite_id().unwrap();
        map.drain_events();

        assert!(map.unregister_movable(id).is_some());
        assert!(map.dynamite_id().is_none());
        assert_eq!(map.drain_events(), vec![GameEvent::EntityRemoved(id)]);
        assert!(map.unregister_movable(id).is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let map = GameMap::new(7, 0.0);
        let snapshot = map.snapshot();
        assert_eq!(snapshot.items.len(), map.ground_items.len());
        assert!(snapshot.hook.is_some());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["level"], 0);
        assert_eq!(json["hook"]["status"], "Idle");
        assert!(json["items"].as_array().is_some_and(|items| !items.is_empty()));
    }
}
