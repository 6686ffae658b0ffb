//! # Space Collision
//!
//! Narrow-phase collision engine for a 2D arcade shooter.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SPACE COLLISION                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Pure geometry                             │
//! │  ├── vec2.rs     - 2D f32 vector                             │
//! │  └── geometry.rs - Circle / capsule / polygon tests          │
//! │                                                              │
//! │  scene/          - Spatial collaborator                      │
//! │  ├── mod.rs      - SceneNode trait                           │
//! │  └── node.rs     - Reference transform hierarchy             │
//! │                                                              │
//! │  game/           - Gameplay collision                        │
//! │  ├── entry.rs    - Player / hazard / power-up / projectile   │
//! │  ├── shape.rs    - World-space resolution and dispatch       │
//! │  ├── world.rs    - Registries and per-frame pass             │
//! │  ├── registrar.rs- Deferred registration                     │
//! │  ├── report.rs   - Pass counters                             │
//! │  ├── config.rs   - Pass configuration                        │
//! │  └── error.rs    - Construction errors                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Contract
//!
//! Call [`CollisionWorld::update`] once per frame after entities have moved.
//! Results are delivered through delegates on the entries:
//! - player hit by a hazard
//! - projectile touching a hazard (the player decides whether it is consumed)
//! - power-up collected (at most once)
//!
//! Entries whose scene entity has been detached are pruned lazily during
//! the pass. The engine is single-threaded.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod scene;
pub mod game;

// Re-export commonly used types
pub use crate::core::vec2::Vec2;
pub use scene::{NodeRef, SceneNode, Transform, TransformNode, WeakNodeRef};
pub use game::{
    CollisionConfig, CollisionError, CollisionWorld, HazardEntry, HazardInfo, PassReport,
    PlayerEntry, PowerupEntry, ProjectileEntry, Registrar, ShapeKind,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate the pass is tuned for (Hz)
pub const FRAME_RATE: u32 = 60;
