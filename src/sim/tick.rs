//! Per-frame map update
//!
//! The host calls `GameMap::frame` once per animation tick. Everything runs
//! synchronously: clock, end conditions, physics, then collisions.

use super::entity::{Entity, verify_for_collision};
use super::hook::{Carried, HookStatus};
use super::items::{ItemFate, ItemKind, SurpriseReward};
use super::movable::Movable;
use super::state::{GameEvent, GameMap, Hud, Player};

impl GameMap {
    /// Advance the map by one frame
    pub fn frame(&mut self, player: &mut Player, hud: &mut Hud, now_ms: f64) {
        self.clock_tick(player, hud, now_ms);
        if self.is_game_over {
            return;
        }

        for (_, carried) in self.movables.run_all_frame_updates() {
            self.deliver(carried, player);
        }
        self.retire_stray_dynamite();

        let Some(hook_status) = self.hook().map(|hook| hook.status) else {
            log::error!("Hook {:?} missing from the movable registry", self.hook_id());
            return;
        };
        // Reeling in is invulnerable
        if hook_status == HookStatus::Pulling {
            return;
        }

        self.check_collisions();
        self.sweep_collided();

        let hook_out = self
            .hook()
            .is_some_and(|hook| self.is_entity_out_of_bounds(&hook.body.entity));
        if hook_out {
            if let Some(hook) = self.hook_mut() {
                hook.pull_back();
            }
        }
    }

    /// Recompute the seconds left from the level start, then check end conditions
    pub fn clock_tick(&mut self, player: &Player, hud: &mut Hud, now_ms: f64) {
        let elapsed_secs = ((now_ms - self.level_start_ms) / 1000.0).floor() as i64;
        self.time = self.scheduled_time - elapsed_secs;
        hud.time = self.time;
        self.verify_if_level_is_over(player, hud, now_ms);
    }

    /// Advance when the score threshold is met; end the game when time runs out
    pub fn verify_if_level_is_over(&mut self, player: &Player, hud: &mut Hud, now_ms: f64) {
        if !self.is_game_over && player.score >= self.calculate_minimum_score() {
            self.next_level(hud, now_ms);
        }

        if self.time <= 0 && !self.is_game_over {
            self.is_game_over = true;
            self.game_over(player);
        }
    }

    fn game_over(&mut self, player: &Player) {
        log::info!(
            "Time is up: game over on level {} with {} points",
            self.level,
            player.score
        );
        self.push_event(GameEvent::GameOver {
            level: self.level,
            score: player.score,
        });
    }

    /// True when the entity's centre is on or past the map edge
    pub fn is_entity_out_of_bounds(&self, entity: &Entity) -> bool {
        let half = self.entity.size / 2.0;
        let position = entity.position;
        position.x >= half.x || position.x <= -half.x || position.y >= half.y || position.y <= -half.y
    }

    /// Credit whatever the hook brought to the surface
    fn deliver(&mut self, carried: Carried, player: &mut Player) {
        let score = match carried.kind {
            ItemKind::Gold { value } => value as i64,
            ItemKind::Rock => 0,
            ItemKind::Surprise => {
                let reward = SurpriseReward::roll(&mut self.rng);
                self.push_event(GameEvent::SurpriseOpened(reward));
                match reward {
                    SurpriseReward::Score(score) => score as i64,
                    SurpriseReward::Dynamite => {
                        player.dynamites += 1;
                        0
                    }
                }
            }
        };

        player.add_score(score);
        self.push_event(GameEvent::ItemDelivered {
            kind: carried.kind,
            score,
        });
        log::debug!("Delivered {:?} for {} points", carried.kind, score);
    }

    /// Dynamite that left the map without hitting anything fizzles out
    fn retire_stray_dynamite(&mut self) {
        let Some(id) = self.dynamite_id() else {
            return;
        };
        let stray = self
            .dynamite()
            .is_some_and(|dynamite| self.is_entity_out_of_bounds(&dynamite.body.entity));
        if stray {
            log::debug!("Dynamite {:?} left the map", id);
            self.unregister_movable(id);
        }
    }

    /// Hook and dynamite against every ground item
    fn check_collisions(&mut self) {
        let hook_id = self.hook_id();
        let (hook, dynamite) = match self.dynamite_id() {
            Some(dynamite_id) => self.movables.get2_mut(hook_id, dynamite_id),
            None => (self.movables.get_mut(hook_id), None),
        };
        let Some(hook) = hook.and_then(Movable::as_hook_mut) else {
            return;
        };
        let mut dynamite = dynamite.and_then(Movable::as_dynamite_mut);

        for (_, item) in self.ground_items.iter_mut() {
            verify_for_collision(&mut *hook, &mut *item);
            if let Some(dynamite) = dynamite.as_deref_mut() {
                verify_for_collision(dynamite, &mut *item);
            }
        }
    }

    /// Remove grabbed and destroyed items, and dynamite that went off
    fn sweep_collided(&mut self) {
        for (id, item) in self.ground_items.extract_if(|item| item.fate.is_some()) {
            let event = match item.fate {
                Some(ItemFate::Grabbed) => GameEvent::ItemGrabbed { id, kind: item.kind },
                Some(ItemFate::Destroyed) => GameEvent::ItemDestroyed { id, kind: item.kind },
                None => continue,
            };
            self.push_event(event);
            self.push_event(GameEvent::EntityRemoved(id));
        }

        let exploded = self.dynamite().is_some_and(|dynamite| dynamite.exploded);
        if let (true, Some(id)) = (exploded, self.dynamite_id()) {
            self.unregister_movable(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::consts::*;
    use crate::sim::items::GroundItem;
    use crate::sim::level::{level_time, minimum_score};
    use crate::sim::registry::EntityId;

    /// Map with no ground items and the hook aiming straight down
    fn empty_map(seed: u64) -> GameMap {
        let mut map = GameMap::new(seed, 0.0);
        map.ground_items.drain();
        map.hook_mut().unwrap().angle = 0.0;
        map.drain_events();
        map
    }

    fn place(map: &mut GameMap, kind: ItemKind, position: Vec2) -> EntityId {
        let id = map.next_entity_id();
        map.ground_items.insert(id, GroundItem::new(id, kind, position));
        id
    }

    fn run_until(
        map: &mut GameMap,
        player: &mut Player,
        hud: &mut Hud,
        max_frames: usize,
        mut done: impl FnMut(&GameMap, &Player) -> bool,
    ) -> bool {
        for _ in 0..max_frames {
            map.frame(player, hud, 0.0);
            if done(map, player) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_clock_tick_counts_whole_seconds() {
        let mut map = GameMap::new(1, 1000.0);
        let player = Player::new();
        let mut hud = Hud::default();

        map.clock_tick(&player, &mut hud, 1999.0);
        assert_eq!(map.time, level_time(0));
        map.clock_tick(&player, &mut hud, 3500.0);
        assert_eq!(map.time, level_time(0) - 2);
        assert_eq!(hud.time, map.time);
        assert_eq!(map.scheduled_time, level_time(0));
    }

    #[test]
    fn test_reaching_minimum_score_advances_on_next_tick() {
        let mut map = GameMap::new(2, 0.0);
        let mut player = Player::new();
        let mut hud = Hud::default();
        let old_ids = map.ground_items.ids();

        player.score = minimum_score(0) - 1;
        map.clock_tick(&player, &mut hud, 100.0);
        assert_eq!(map.level, 0);

        player.score = minimum_score(0);
        map.clock_tick(&player, &mut hud, 200.0);
        assert_eq!(map.level, 1);
        assert_eq!(hud.level, 1);
        assert!(old_ids.iter().all(|id| !map.ground_items.contains(*id)));
        assert!(!map.ground_items.is_empty());
        assert_eq!(map.time, level_time(1));
    }

    #[test]
    fn test_score_is_cumulative_across_levels() {
        let mut map = GameMap::new(3, 0.0);
        let mut player = Player::new();
        let mut hud = Hud::default();

        player.score = minimum_score(0);
        map.clock_tick(&player, &mut hud, 0.0);
        assert_eq!(map.level, 1);

        // Same score is not enough for level 1
        map.clock_tick(&player, &mut hud, 0.0);
        assert_eq!(map.level, 1);

        player.score = minimum_score(1);
        map.clock_tick(&player, &mut hud, 0.0);
        assert_eq!(map.level, 2);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut map = GameMap::new(4, 0.0);
        let mut player = Player::new();
        let mut hud = Hud::default();
        map.drain_events();

        let deadline_ms = level_time(0) as f64 * 1000.0;
        map.frame(&mut player, &mut hud, deadline_ms - 1.0);
        assert!(!map.is_game_over);

        map.frame(&mut player, &mut hud, deadline_ms);
        assert!(map.is_game_over);
        assert_eq!(hud.time, 0);
        map.frame(&mut player, &mut hud, deadline_ms + 5000.0);

        let game_overs = map
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_game_over_freezes_the_map() {
        let mut map = GameMap::new(5, 0.0);
        let mut player = Player::new();
        let mut hud = Hud::default();

        map.frame(&mut player, &mut hud, 60_000.0);
        assert!(map.is_game_over);
        let angle = map.hook().unwrap().angle;
        map.frame(&mut player, &mut hud, 61_000.0);
        assert_eq!(map.hook().unwrap().angle, angle);
        assert!(!map.launch_hook());

        // Late score no longer advances the level
        player.score = minimum_score(0);
        map.frame(&mut player, &mut hud, 62_000.0);
        assert_eq!(map.level, 0);
    }

    #[test]
    fn test_out_of_bounds_is_boundary_inclusive() {
        let map = GameMap::new(6, 0.0);
        let half = MAP_SIZE / 2.0;
        let at = |x: f32, y: f32| Entity::square(Vec2::new(x, y), 1.0);

        assert!(map.is_entity_out_of_bounds(&at(half.x, 0.0)));
        assert!(map.is_entity_out_of_bounds(&at(-half.x, 0.0)));
        assert!(map.is_entity_out_of_bounds(&at(0.0, half.y)));
        assert!(map.is_entity_out_of_bounds(&at(0.0, -half.y)));
        assert!(!map.is_entity_out_of_bounds(&at(half.x - 0.01, 0.0)));
        assert!(!map.is_entity_out_of_bounds(&at(0.0, -half.y + 0.01)));
        assert!(!map.is_entity_out_of_bounds(&at(0.0, 0.0)));
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_matches_definition(x in -300.0f32..300.0, y in -300.0f32..300.0) {
            let map = GameMap::new(7, 0.0);
            let entity = Entity::square(Vec2::new(x, y), 5.0);
            let expected = x.abs() >= MAP_SIZE.x / 2.0 || y.abs() >= MAP_SIZE.y / 2.0;
            prop_assert_eq!(map.is_entity_out_of_bounds(&entity), expected);
        }
    }

    #[test]
    fn test_hook_grabs_and_delivers_gold() {
        let mut map = empty_map(8);
        let mut player = Player::new();
        let mut hud = Hud::default();
        let gold = place(&mut map, ItemKind::Gold { value: 2 }, Vec2::new(0.0, 0.0));

        assert!(map.launch_hook());
        assert!(run_until(&mut map, &mut player, &mut hud, 100, |map, _| {
            !map.ground_items.contains(gold)
        }));
        let hook = map.hook().unwrap();
        assert_eq!(hook.status, HookStatus::Pulling);
        assert_eq!(hook.carrying.map(|c| c.id), Some(gold));

        assert!(run_until(&mut map, &mut player, &mut hud, 200, |_, player| {
            player.score > 0
        }));
        assert_eq!(player.score, 2);
        assert_eq!(map.hook().unwrap().status, HookStatus::Idle);

        let events = map.drain_events();
        assert!(events.contains(&GameEvent::ItemGrabbed {
            id: gold,
            kind: ItemKind::Gold { value: 2 }
        }));
        assert!(events.contains(&GameEvent::EntityRemoved(gold)));
        assert!(events.contains(&GameEvent::ItemDelivered {
            kind: ItemKind::Gold { value: 2 },
            score: 2
        }));
    }

    #[test]
    fn test_rock_is_worth_nothing() {
        let mut map = empty_map(9);
        let mut player = Player::new();
        let mut hud = Hud::default();
        let rock = place(&mut map, ItemKind::Rock, Vec2::new(0.0, 0.0));

        map.launch_hook();
        assert!(run_until(&mut map, &mut player, &mut hud, 100, |map, _| {
            !map.ground_items.contains(rock)
        }));
        assert!(run_until(&mut map, &mut player, &mut hud, 500, |map, _| {
            map.hook().is_some_and(|h| h.status == HookStatus::Idle)
        }));
        assert_eq!(player.score, 0);
    }

    #[test]
    fn test_pulling_hook_skips_collisions() {
        let mut map = empty_map(10);
        let mut player = Player::new();
        let mut hud = Hud::default();

        map.launch_hook();
        for _ in 0..10 {
            map.frame(&mut player, &mut hud, 0.0);
        }
        let hook = map.hook_mut().unwrap();
        assert!(hook.pull_back());
        let position = hook.position();

        let gold = place(&mut map, ItemKind::Gold { value: 3 }, position);
        map.frame(&mut player, &mut hud, 0.0);

        let item = map.ground_items.get(gold).expect("item should still be buried");
        assert!(item.is_available());
        assert!(map.hook().unwrap().carrying.is_none());
    }

    #[test]
    fn test_hook_only_takes_one_item() {
        let mut map = empty_map(11);
        let mut player = Player::new();
        let mut hud = Hud::default();
        let first = place(&mut map, ItemKind::Gold { value: 1 }, Vec2::new(0.0, 0.0));
        let second = place(&mut map, ItemKind::Gold { value: 1 }, Vec2::new(5.0, 0.0));

        map.launch_hook();
        assert!(run_until(&mut map, &mut player, &mut hud, 100, |map, _| {
            map.ground_items.len() < 2
        }));
        assert!(!map.ground_items.contains(first));
        assert!(map.ground_items.contains(second));
        assert!(map.ground_items.get(second).unwrap().is_available());
    }

    #[test]
    fn test_hook_pulled_back_at_map_edge() {
        let mut map = empty_map(12);
        let mut player = Player::new();
        let mut hud = Hud::default();

        map.launch_hook();
        assert!(run_until(&mut map, &mut player, &mut hud, 200, |map, _| {
            map.hook().is_some_and(|h| h.status == HookStatus::Pulling)
        }));
        assert!(map.hook().unwrap().position().y >= MAP_SIZE.y / 2.0);

        assert!(run_until(&mut map, &mut player, &mut hud, 200, |map, _| {
            map.hook().is_some_and(|h| h.status == HookStatus::Idle)
        }));
        assert_eq!(player.score, 0);
    }

    #[test]
    fn test_dynamite_destroys_item() {
        let mut map = empty_map(13);
        let mut player = Player::new();
        let mut hud = Hud::default();
        let rock = place(&mut map, ItemKind::Rock, Vec2::new(0.0, 0.0));

        assert!(map.throw_dynamite(&mut player));
        let dynamite_id = map.dynamite_id().unwrap();
        assert!(run_until(&mut map, &mut player, &mut hud, 100, |map, _| {
            !map.ground_items.contains(rock)
        }));

        assert!(map.dynamite_id().is_none());
        assert!(!map.movables.contains(dynamite_id));
        assert_eq!(player.score, 0);

        let events = map.drain_events();
        assert!(events.contains(&GameEvent::ItemDestroyed {
            id: rock,
            kind: ItemKind::Rock
        }));
        assert!(events.contains(&GameEvent::EntityRemoved(dynamite_id)));
    }

    #[test]
    fn test_dynamite_only_destroys_one_item() {
        let mut map = empty_map(14);
        let mut player = Player::new();
        let mut hud = Hud::default();
        place(&mut map, ItemKind::Rock, Vec2::new(0.0, 0.0));
        place(&mut map, ItemKind::Rock, Vec2::new(5.0, 0.0));

        map.throw_dynamite(&mut player);
        assert!(run_until(&mut map, &mut player, &mut hud, 100, |map, _| {
            map.dynamite_id().is_none()
        }));
        assert_eq!(map.ground_items.len(), 1);
    }

    #[test]
    fn test_stray_dynamite_leaves_the_map() {
        let mut map = empty_map(15);
        let mut player = Player::new();
        let mut hud = Hud::default();

        map.throw_dynamite(&mut player);
        assert!(run_until(&mut map, &mut player, &mut hud, 200, |map, _| {
            map.dynamite_id().is_none()
        }));
        assert_eq!(map.movables.len(), 1);

        // A new stick can be thrown once the old one is gone
        player.dynamites = 1;
        assert!(map.throw_dynamite(&mut player));
    }

    #[test]
    fn test_surprise_reward_is_applied() {
        let mut map = empty_map(16);
        let mut player = Player::new();
        let mut hud = Hud::default();
        place(&mut map, ItemKind::Surprise, Vec2::new(0.0, 0.0));

        map.launch_hook();
        assert!(run_until(&mut map, &mut player, &mut hud, 300, |map, _| {
            map.ground_items.is_empty()
                && map.hook().is_some_and(|h| h.status == HookStatus::Idle)
        }));

        let events = map.drain_events();
        let reward = events.iter().find_map(|e| match e {
            GameEvent::SurpriseOpened(reward) => Some(*reward),
            _ => None,
        });
        match reward {
            Some(SurpriseReward::Score(score)) => assert_eq!(player.score, score as i64),
            Some(SurpriseReward::Dynamite) => {
                assert_eq!(player.dynamites, STARTING_DYNAMITES + 1);
                assert_eq!(player.score, 0);
            }
            None => panic!("sack was never opened"),
        }
    }

    #[test]
    fn test_determinism() {
        // Two maps with the same seed produce the same levels
        let map1 = GameMap::new(99999, 0.0);
        let map2 = GameMap::new(99999, 0.0);

        let items = |map: &GameMap| -> Vec<(ItemKind, Vec2)> {
            map.ground_items
                .iter()
                .map(|(_, item)| (item.kind, item.entity.position))
                .collect()
        };
        assert_eq!(items(&map1), items(&map2));
    }
}
