//! Thrown dynamite stick

use glam::Vec2;

use super::entity::{Collidable, Collider, Entity};
use super::movable::Body;
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Dynamite {
    pub body: Body,
    /// Blew something up this frame, the map removes it after the collision pass
    pub exploded: bool,
}

impl Dynamite {
    /// A stick flying from `origin` along `direction`
    pub fn thrown(origin: Vec2, direction: Vec2) -> Self {
        let mut body = Body::at_rest(Entity::square(origin, DYNAMITE_SIZE));
        body.velocity = direction.normalize_or_zero() * DYNAMITE_SPEED;
        Self {
            body,
            exploded: false,
        }
    }

    pub fn frame_update(&mut self) {
        if !self.exploded {
            self.body.integrate();
        }
    }
}

impl Collidable for Dynamite {
    fn entity(&self) -> &Entity {
        &self.body.entity
    }

    fn collider(&self) -> Collider {
        Collider::Dynamite {
            live: !self.exploded,
        }
    }

    fn collided(&mut self, other: &Collider) {
        if let Collider::Ground {
            available: true, ..
        } = other
        {
            self.exploded = true;
            self.body.stop();
        }
    }
}
