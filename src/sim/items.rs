//! Ground items: gold nuggets, rocks and surprise sacks

use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Collidable, Collider, Entity};
use super::registry::EntityId;
use crate::consts::*;
use crate::error::GameError;

/// Item types the level generator knows how to place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Rock,
    Gold,
    Surprise,
}

impl FromStr for ItemType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(ItemType::Rock),
            "gold" => Ok(ItemType::Gold),
            "surprise" => Ok(ItemType::Surprise),
            other => Err(GameError::InvalidItemType(other.to_string())),
        }
    }
}

/// What an item is, plus item-specific data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Gold { value: u32 },
    Rock,
    Surprise,
}

impl ItemKind {
    /// Roll a concrete kind for a freshly generated item
    pub fn roll(item_type: ItemType, rng: &mut impl Rng) -> Self {
        match item_type {
            ItemType::Rock => ItemKind::Rock,
            ItemType::Gold => ItemKind::Gold {
                value: rng.random_range(1..=MAX_GOLD_VALUE),
            },
            ItemType::Surprise => ItemKind::Surprise,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            ItemKind::Gold { .. } => ItemType::Gold,
            ItemKind::Rock => ItemType::Rock,
            ItemKind::Surprise => ItemType::Surprise,
        }
    }

    /// Score counted towards the level's gold budget
    pub fn score(&self) -> i64 {
        match self {
            ItemKind::Gold { value } => *value as i64,
            ItemKind::Rock | ItemKind::Surprise => 0,
        }
    }

    /// Divides the hook's pull speed
    pub fn weight(&self) -> u32 {
        match self {
            ItemKind::Gold { value } => (*value).max(1),
            ItemKind::Rock => ROCK_WEIGHT,
            ItemKind::Surprise => 1,
        }
    }

    pub fn size(&self) -> Vec2 {
        match self {
            ItemKind::Gold { value } => {
                Vec2::splat(GOLD_BASE_SIZE + GOLD_SIZE_STEP * *value as f32)
            }
            ItemKind::Rock => Vec2::splat(ROCK_SIZE),
            ItemKind::Surprise => Vec2::splat(SURPRISE_SIZE),
        }
    }
}

/// Reward inside a surprise sack, rolled when it reaches the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurpriseReward {
    Score(u32),
    Dynamite,
}

impl SurpriseReward {
    pub fn roll(rng: &mut impl Rng) -> Self {
        if rng.random_bool(SURPRISE_SCORE_CHANCE) {
            SurpriseReward::Score(rng.random_range(1..=MAX_SURPRISE_SCORE))
        } else {
            SurpriseReward::Dynamite
        }
    }
}

/// Why an item left the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemFate {
    /// Caught by the hook, on its way to the surface
    Grabbed,
    /// Blown up by dynamite
    Destroyed,
}

/// An item buried in the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundItem {
    pub id: EntityId,
    pub entity: Entity,
    pub kind: ItemKind,
    /// Set during the collision pass; the map sweeps fated items afterwards
    #[serde(skip)]
    pub fate: Option<ItemFate>,
}

impl GroundItem {
    pub fn new(id: EntityId, kind: ItemKind, position: Vec2) -> Self {
        Self {
            id,
            entity: Entity::new(position, kind.size()),
            kind,
            fate: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.fate.is_none()
    }
}

impl Collidable for GroundItem {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn collider(&self) -> Collider {
        Collider::Ground {
            id: self.id,
            kind: self.kind,
            available: self.is_available(),
        }
    }

    fn collided(&mut self, other: &Collider) {
        if !self.is_available() {
            return;
        }
        match other {
            Collider::Hook { grabbing: true } => self.fate = Some(ItemFate::Grabbed),
            Collider::Dynamite { live: true } => self.fate = Some(ItemFate::Destroyed),
            _ => {}
        }
    }
}
