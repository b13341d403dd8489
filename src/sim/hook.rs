//! The player's grappling hook
//!
//! Swings while idle, travels along its aim when launched and is reeled back
//! in, slower when dragging something heavy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Collidable, Collider, Entity};
use super::items::ItemKind;
use super::movable::Body;
use super::registry::EntityId;
use crate::aim_direction;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookStatus {
    /// Swinging at the origin, ready to launch
    Idle,
    /// Travelling away from the origin
    Extending,
    /// Being reeled back; ignores collisions
    Pulling,
}

/// An item hanging from the hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carried {
    pub id: EntityId,
    pub kind: ItemKind,
}

#[derive(Debug, Clone)]
pub struct Hook {
    pub body: Body,
    pub status: HookStatus,
    /// Radians away from straight down
    pub angle: f32,
    swing_direction: f32,
    pub carrying: Option<Carried>,
}

impl Default for Hook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook {
    pub fn new() -> Self {
        Self {
            body: Body::at_rest(Entity::square(HOOK_ORIGIN, HOOK_SIZE)),
            status: HookStatus::Idle,
            angle: 0.0,
            swing_direction: 1.0,
            carrying: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.entity.position
    }

    /// Current aim as a unit vector
    pub fn direction(&self) -> Vec2 {
        aim_direction(self.angle)
    }

    /// Start extending along the current aim. Only an idle hook can launch.
    pub fn launch(&mut self) -> bool {
        if self.status != HookStatus::Idle {
            return false;
        }
        self.status = HookStatus::Extending;
        self.body.velocity = self.direction() * HOOK_SPEED;
        true
    }

    /// Reel the hook back towards the origin. Only an extending hook can be pulled.
    pub fn pull_back(&mut self) -> bool {
        if self.status != HookStatus::Extending {
            return false;
        }
        self.status = HookStatus::Pulling;

        let weight = self.carrying.map(|c| c.kind.weight()).unwrap_or(1).max(1);
        let speed = HOOK_SPEED / weight as f32;
        let mut toward_origin = (HOOK_ORIGIN - self.position()).normalize_or_zero();
        if toward_origin == Vec2::ZERO {
            toward_origin = -self.direction();
        }
        self.body.velocity = toward_origin * speed;
        true
    }

    /// Advance one frame. Returns the carried item when the hook gets home.
    pub fn frame_update(&mut self) -> Option<Carried> {
        match self.status {
            HookStatus::Idle => {
                self.swing();
                None
            }
            HookStatus::Extending => {
                self.body.integrate();
                None
            }
            HookStatus::Pulling => {
                self.body.integrate();
                if self.position().y > HOOK_ORIGIN.y {
                    return None;
                }
                self.body.entity.position = HOOK_ORIGIN;
                self.body.stop();
                self.status = HookStatus::Idle;
                self.carrying.take()
            }
        }
    }

    fn swing(&mut self) {
        self.angle += self.swing_direction * HOOK_SWING_SPEED;
        if self.angle >= HOOK_MAX_ANGLE {
            self.angle = HOOK_MAX_ANGLE;
            self.swing_direction = -1.0;
        } else if self.angle <= -HOOK_MAX_ANGLE {
            self.angle = -HOOK_MAX_ANGLE;
            self.swing_direction = 1.0;
        }
    }

    fn is_grabbing(&self) -> bool {
        self.status == HookStatus::Extending && self.carrying.is_none()
    }
}

impl Collidable for Hook {
    fn entity(&self) -> &Entity {
        &self.body.entity
    }

    fn collider(&self) -> Collider {
        Collider::Hook {
            grabbing: self.is_grabbing(),
        }
    }

    fn collided(&mut self, other: &Collider) {
        if !self.is_grabbing() {
            return;
        }
        if let Collider::Ground {
            id,
            kind,
            available: true,
        } = *other
        {
            self.carrying = Some(Carried { id, kind });
            self.pull_back();
        }
    }
}
