//! Moving entities and their per-frame physics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::dynamite::Dynamite;
use super::entity::Entity;
use super::hook::{Carried, Hook};
use super::registry::{EntityId, Registry};

/// Physics state shared by everything that moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub entity: Entity,
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

impl Body {
    pub fn at_rest(entity: Entity) -> Self {
        Self {
            entity,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
        }
    }

    /// One frame of explicit Euler integration
    #[inline]
    pub fn integrate(&mut self) {
        self.velocity += self.acceleration;
        self.entity.position += self.velocity;
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }
}

/// Every kind of entity the movable registry drives
#[derive(Debug, Clone)]
pub enum Movable {
    Hook(Hook),
    Dynamite(Dynamite),
}

impl Movable {
    pub fn body(&self) -> &Body {
        match self {
            Movable::Hook(hook) => &hook.body,
            Movable::Dynamite(dynamite) => &dynamite.body,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.body().entity
    }

    /// Advance one frame. Returns whatever a hook brought back to the surface.
    pub fn frame_update(&mut self) -> Option<Carried> {
        match self {
            Movable::Hook(hook) => hook.frame_update(),
            Movable::Dynamite(dynamite) => {
                dynamite.frame_update();
                None
            }
        }
    }

    pub fn as_hook(&self) -> Option<&Hook> {
        match self {
            Movable::Hook(hook) => Some(hook),
            _ => None,
        }
    }

    pub fn as_hook_mut(&mut self) -> Option<&mut Hook> {
        match self {
            Movable::Hook(hook) => Some(hook),
            _ => None,
        }
    }

    pub fn as_dynamite(&self) -> Option<&Dynamite> {
        match self {
            Movable::Dynamite(dynamite) => Some(dynamite),
            _ => None,
        }
    }

    pub fn as_dynamite_mut(&mut self) -> Option<&mut Dynamite> {
        match self {
            Movable::Dynamite(dynamite) => Some(dynamite),
            _ => None,
        }
    }
}

impl Registry<Movable> {
    /// Run every live movable's frame update in registration order.
    /// Returns the deliveries, tagged with the hook that made them.
    pub fn run_all_frame_updates(&mut self) -> Vec<(EntityId, Carried)> {
        let mut delivered = Vec::new();
        for (id, movable) in self.iter_mut() {
            if let Some(carried) = movable.frame_update() {
                delivered.push((id, carried));
            }
        }
        delivered
    }
}
