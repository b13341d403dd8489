//! Level progression and procedural item placement

use glam::Vec2;

use super::entity::Entity;
use super::items::{GroundItem, ItemKind, ItemType};
use super::registry::EntityId;
use super::state::{GameEvent, GameMap, Hud};
use crate::consts::*;
use crate::error::Result;
use crate::random_unit;

/// Score the player must have reached to leave `level`
pub fn minimum_score(level: u32) -> i64 {
    (0..=level as i64)
        .map(|l| BASE_SCORE_FOR_NEXT_LEVEL + 2 * l)
        .sum()
}

/// Gold score buried in `level`; never below the minimum score
pub fn total_gold_score(level: u32) -> i64 {
    minimum_score(level) + 2 * level as i64
}

pub fn number_of_rocks(level: u32) -> u32 {
    BASE_NUMBER_OF_ROCKS + 3 * level
}

pub fn number_of_surprises(level: u32) -> u32 {
    MAX_NUMBER_OF_SURPRISES.min(level)
}

/// Seconds on the clock for `level`
pub fn level_time(level: u32) -> i64 {
    BASE_TIME + minimum_score(level) - 2 * level as i64
}

impl GameMap {
    pub fn calculate_minimum_score(&self) -> i64 {
        minimum_score(self.level)
    }

    pub fn calculate_total_gold_score(&self) -> i64 {
        total_gold_score(self.level)
    }

    pub fn calculate_number_of_rocks(&self) -> u32 {
        number_of_rocks(self.level)
    }

    pub fn calculate_number_of_surprises(&self) -> u32 {
        number_of_surprises(self.level)
    }

    /// Sum of the score of all gold still in the ground
    pub fn current_gold_score_in_map(&self) -> i64 {
        self.ground_items.iter().map(|(_, item)| item.kind.score()).sum()
    }

    /// Populate the level: gold until the budget is met (the last nugget may
    /// overshoot it), then a fixed number of rocks and sacks
    pub fn initialize_level(&mut self) {
        let target = self.calculate_total_gold_score();
        while self.current_gold_score_in_map() < target {
            self.generate_item(ItemType::Gold);
        }

        for _ in 0..self.calculate_number_of_rocks() {
            self.generate_item(ItemType::Rock);
        }

        for _ in 0..self.calculate_number_of_surprises() {
            self.generate_item(ItemType::Surprise);
        }

        log::info!(
            "Level {} ready: {} gold score (target {}), {} items",
            self.level,
            self.current_gold_score_in_map(),
            target,
            self.ground_items.len()
        );
    }

    /// Advance to the next level, replacing every ground item
    pub fn next_level(&mut self, hud: &mut Hud, now_ms: f64) {
        let completed = self.level;
        self.level += 1;
        hud.level = self.level;
        self.push_event(GameEvent::LevelCompleted { level: completed });
        log::info!("Level {} completed, starting level {}", completed, self.level);

        self.clear_ground_items();
        self.initialize_level();
        self.calculate_current_level_time(now_ms);
        hud.time = self.time;
    }

    /// Restart the clock for the current level
    pub fn calculate_current_level_time(&mut self, now_ms: f64) {
        self.level_start_ms = now_ms;
        self.scheduled_time = level_time(self.level);
        self.time = self.scheduled_time;
    }

    /// Place a new item of `item_type`, avoiding overlaps when possible
    pub fn generate_item(&mut self, item_type: ItemType) -> EntityId {
        let kind = ItemKind::roll(item_type, &mut self.rng);
        let mut entity = Entity::new(Vec2::ZERO, kind.size());
        let attempts = self.place_without_overlap(&mut entity);

        let id = self.next_entity_id();
        self.ground_items
            .insert(id, GroundItem::new(id, kind, entity.position));
        self.push_event(GameEvent::EntitySpawned(id));

        log::debug!(
            "Placed {:?} {:?} at {:?} after {} attempt(s)",
            item_type,
            id,
            entity.position,
            attempts
        );
        id
    }

    /// Same as `generate_item`, for item types coming in as text
    pub fn generate_item_named(&mut self, item_type: &str) -> Result<EntityId> {
        let item_type = item_type.parse::<ItemType>()?;
        Ok(self.generate_item(item_type))
    }

    /// Move `entity` to random spots until it overlaps no ground item.
    /// The last attempt is kept even if it overlaps. Returns the attempts made.
    pub(crate) fn place_without_overlap(&mut self, entity: &mut Entity) -> u32 {
        let mut attempts = 0;
        loop {
            entity.position = self.random_item_position();
            attempts += 1;

            let overlapping = self
                .ground_items
                .iter()
                .any(|(_, item)| item.entity.overlaps(entity));
            if !overlapping {
                break;
            }
            if attempts >= MAX_PLACEMENT_ATTEMPTS {
                log::warn!(
                    "No free spot after {} attempts, accepting overlap at {:?}",
                    attempts,
                    entity.position
                );
                break;
            }
        }
        attempts
    }

    /// Uniform spot below the floor, away from the side walls
    fn random_item_position(&mut self) -> Vec2 {
        let unit = random_unit(&mut self.rng);
        let x = unit.x * (MAP_SIZE.x / 2.0 - ITEM_MARGIN_X);
        let y = unit.y * ((MAP_SIZE.y + FLOOR_HEIGHT) / 2.0 - 200.0) - (FLOOR_HEIGHT / 2.0 - 50.0);
        Vec2::new(x, y)
    }

    fn clear_ground_items(&mut self) {
        for (id, _) in self.ground_items.drain() {
            self.push_event(GameEvent::EntityRemoved(id));
        }
    }
}
