//! Collision Layer
//!
//! Everything that knows about gameplay entities. Geometry stays in `core`.
//!
//! ## Module Structure
//!
//! - `entry`: Player, hazard, power-up and projectile records
//! - `shape`: World-space resolution and per-pair dispatch
//! - `world`: Registries and the per-frame collision pass
//! - `registrar`: Deferred registration for use inside delegates
//! - `report`: Per-pass counters
//! - `config`: Pass configuration
//! - `error`: Construction and configuration errors

pub mod entry;
pub mod shape;
pub mod world;
pub mod registrar;
pub mod report;
pub mod config;
pub mod error;

// Re-export key types
pub use entry::{
    HazardEntry, HazardInfo, HazardShape, PlayerEntry, PlayerShape, PowerupEntry,
    ProjectileEntry, ShapeKind, MAX_HAZARD_VERTICES, MAX_PLAYER_VERTICES,
};
pub use world::CollisionWorld;
pub use registrar::Registrar;
pub use report::PassReport;
pub use config::CollisionConfig;
pub use error::CollisionError;
