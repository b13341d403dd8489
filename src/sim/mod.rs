//! Gold digger simulation
//!
//! All gameplay logic lives here, with no rendering or platform dependencies:
//! - Seeded RNG only
//! - Stable iteration order (registration order)
//! - Time comes from the host as a millisecond timestamp

pub mod dynamite;
pub mod entity;
pub mod hook;
pub mod items;
pub mod level;
pub mod movable;
pub mod registry;
pub mod state;
pub mod tick;

pub use dynamite::Dynamite;
pub use entity::{Collidable, Collider, Entity, verify_for_collision};
pub use hook::{Carried, Hook, HookStatus};
pub use items::{GroundItem, ItemFate, ItemKind, ItemType, SurpriseReward};
pub use level::{
    level_time, minimum_score, number_of_rocks, number_of_surprises, total_gold_score,
};
pub use movable::{Body, Movable};
pub use registry::{EntityId, Registry};
pub use state::{GameEvent, GameMap, HookView, Hud, MapSnapshot, Player};
