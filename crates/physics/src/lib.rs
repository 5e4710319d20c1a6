#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Box Physics Engine
//!
//! A small rigid-body engine for stacks of oriented boxes, with a sphere
//! octree for broad-phase culling.
//!
//! ## Key Components
//!
//! -   **Boxes:** [`OrientedBox`] keeps a pose (position, axis-angle rotation,
//!     per-axis scale), its derived transform and corners, and linear
//!     velocity and acceleration. See the [`body`] module.
//! -   **Collision:** the [`collision`] module finds the points where edges
//!     of one box cross faces of another and collects them in a
//!     [`ContactReport`]. Boxes respond by stepping out along the dominant
//!     face normal and turning toward the contact.
//! -   **Broad Phase:** [`SphereIndex`] in the [`octree`] module stores
//!     bounding spheres in a fixed-depth octree and reports candidate pairs.
//! -   **Simulation:** [`simulate`] advances a slice of boxes, and
//!     [`PhysicsSim`] wraps it with parameters, counters and the optional
//!     broad phase.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{OrientedBox, PhysicsSim, Vec3};
//!
//! let mut sim = PhysicsSim::new();
//! sim.add_box(OrientedBox::new(Vec3::ZERO, Vec3::ONE, Vec3::new(4.0, 1.0, 4.0), Vec3::Z, 0.0, false));
//!
//! let mut falling = OrientedBox::default();
//! falling.set_position(Vec3::new(0.0, 2.0, 0.0));
//! falling.set_velocity(Vec3::new(0.0, -0.01, 0.0));
//! sim.add_box(falling);
//!
//! sim.run(10)?;
//! assert_eq!(sim.ticks(), 50);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod body;
pub mod collision;
pub mod error;
pub mod octree;
pub mod simulation;
pub mod transform;
pub mod types;

pub use body::OrientedBox;
pub use collision::{ContactPoint, ContactReport, Side, SideNormals};
pub use error::PhysicsError;
pub use octree::{NodeId, OctreeNode, SphereIndex, MAX_TREE_DEPTH};
pub use simulation::{simulate, BroadPhaseConfig, PhysicsSim, SimDebugInfo, SimParams};
pub use types::{Aabb, AxisAngle, Mat4, Sphere, Vec3};
