//! Positioned rectangles and the collision contract
//!
//! Every game object embeds an `Entity`. Collision is a plain AABB test;
//! reactions are dispatched through the `Collider` tagged union.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::items::ItemKind;
use super::registry::EntityId;

/// An axis-aligned rectangle centred on `position`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Vec2,
    pub size: Vec2,
}

impl Entity {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Square entity of side `side`
    pub fn square(position: Vec2, side: f32) -> Self {
        Self::new(position, Vec2::splat(side))
    }

    /// Top-left corner (y grows downward)
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.position - self.size / 2.0
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    /// True iff the bounding boxes intersect on both axes.
    /// Touching edges do not count.
    pub fn overlaps(&self, other: &Entity) -> bool {
        let delta = (self.position - other.position).abs();
        let reach = (self.size + other.size) / 2.0;
        delta.x < reach.x && delta.y < reach.y
    }
}

/// Snapshot of what an entity looks like to whatever it collides with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// The hook; `grabbing` when it can still take an item
    Hook { grabbing: bool },
    /// Thrown dynamite; `live` until it has blown something up
    Dynamite { live: bool },
    /// Gold, rock or sack lying in the ground
    Ground {
        id: EntityId,
        kind: ItemKind,
        available: bool,
    },
}

/// Something that occupies space and reacts to being touched
pub trait Collidable {
    fn entity(&self) -> &Entity;

    /// Current reactive state, taken before any reaction runs
    fn collider(&self) -> Collider;

    /// React to `other`. Must not depend on `other`'s reaction.
    fn collided(&mut self, other: &Collider);
}

/// Run both reactions if `a` and `b` overlap. Returns whether they did.
pub fn verify_for_collision<A, B>(a: &mut A, b: &mut B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    if !a.entity().overlaps(b.entity()) {
        return false;
    }

    let a_snapshot = a.collider();
    let b_snapshot = b.collider();
    a.collided(&b_snapshot);
    b.collided(&a_snapshot);
    true
}
