//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame timing is supplied by the caller
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod cooldown;
pub mod entity;
pub mod kernel;
pub mod mesh;
pub mod particles;
pub mod pool;
pub mod scene;
pub mod state;
pub mod tick;

pub use collision::PointerSweep;
pub use cooldown::{Cooldown, Spawner};
pub use entity::{Category, Entity, Kinematics, PolyStyle, Role, Style, TargetColor};
pub use kernel::Transform;
pub use mesh::{Face, Mesh, MeshError, MeshSet};
pub use particles::{Spark, Sparks, Trail, TrailPoint};
pub use pool::{EntityPool, PoolKey, SparkPool};
pub use scene::{Scene, ScenePolygon, ShadowPolygon};
pub use state::{GameEvent, GameMode, GamePhase, GameState, Pointer};
pub use tick::{TickInput, tick};
