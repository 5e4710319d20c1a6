//! # Simulation Core
//!
//! The tick loop that integrates every box and then resolves contacts pair by
//! pair, plus the [`PhysicsSim`] container that runs it frame by frame with
//! an optional octree broad phase in front of the narrow phase.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::body::OrientedBox;
use crate::error::PhysicsError;
use crate::octree::{validate_tree_params, SphereIndex};
use crate::types::Vec3;

/// Substeps per frame used when nothing else is configured.
pub const DEFAULT_SUBSTEPS: u32 = 5;

/// Advance `boxes` by `substeps` ticks, testing every pair.
///
/// Each tick integrates all boxes, static ones included, then walks the
/// pairs `(b, p)` with `b < p` in order. Corrections are applied in place, so
/// later pairs see the boxes already moved by earlier ones.
pub fn simulate(boxes: &mut [OrientedBox], substeps: u32) {
    for _ in 0..substeps {
        integrate_all(boxes);
        resolve_all(boxes, |_, _| true);
    }
}

fn integrate_all(boxes: &mut [OrientedBox]) {
    for body in boxes.iter_mut() {
        body.integrate();
    }
}

fn resolve_all(boxes: &mut [OrientedBox], may_touch: impl Fn(usize, usize) -> bool) {
    let count = boxes.len();
    for first in 0..count {
        for second in first + 1..count {
            resolve_pair(boxes, first, second, may_touch(first, second));
        }
    }
}

/// Collision handling for one ordered pair.
///
/// A pair ruled out by the broad phase behaves as if the narrow phase found
/// no contacts.
fn resolve_pair(boxes: &mut [OrientedBox], first: usize, second: usize, may_touch: bool) {
    let (head, tail) = boxes.split_at_mut(second);
    let a = &mut head[first];
    let b = &mut tail[0];

    let hits = if may_touch {
        a.collide(b).len()
    } else {
        a.clear_contacts();
        0
    };

    if hits == 0 {
        a.apply_last_reaction();
        return;
    }

    trace!(first, second, contacts = hits, "box pair in contact");
    if a.is_dynamic() {
        a.respond_to_contacts();
    }
    if b.is_dynamic() {
        if b.collide(a).is_empty() {
            b.apply_last_reaction();
        } else {
            b.respond_to_contacts();
        }
    }
}

/// Octree settings for the optional broad phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BroadPhaseConfig {
    pub depth: u32,
    /// Half-size of the tree's root cell.
    pub size: Vec3,
    pub origin: Vec3,
    /// Added to each box's bounding radius before registration.
    pub margin: f32,
}

impl Default for BroadPhaseConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            size: Vec3::splat(100.0),
            origin: Vec3::ZERO,
            margin: 0.25,
        }
    }
}

/// Simulation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    pub substeps: u32,
    pub broad_phase: Option<BroadPhaseConfig>,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            substeps: DEFAULT_SUBSTEPS,
            broad_phase: None,
        }
    }
}

/// Snapshot of simulation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimDebugInfo {
    pub num_boxes: usize,
    pub num_dynamic: usize,
    pub ticks: u64,
    /// Contact points across the boxes' current reports.
    pub contact_points: usize,
    /// Pairs the broad phase passed to the narrow phase on the last tick.
    pub candidate_pairs: usize,
}

/// Main simulation container
#[derive(Debug, Clone, Default)]
pub struct PhysicsSim {
    pub boxes: Vec<OrientedBox>,
    pub params: SimParams,
    index: SphereIndex,
    ticks: u64,
    candidate_pairs: usize,
}

impl PhysicsSim {
    /// Create an empty simulation with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_params(params: SimParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Add a box and return its index.
    pub fn add_box(&mut self, body: OrientedBox) -> usize {
        self.boxes.push(body);
        self.boxes.len() - 1
    }

    /// Replace every box, keeping the parameters.
    pub fn reset_from(&mut self, boxes: Vec<OrientedBox>) {
        debug!(boxes = boxes.len(), "resetting simulation");
        self.boxes = boxes;
        self.index.clear_spheres();
        self.ticks = 0;
        self.candidate_pairs = 0;
    }

    /// Ticks run since creation or the last reset.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The octree from the last broad-phase tick.
    #[must_use]
    pub fn broad_phase(&self) -> &SphereIndex {
        &self.index
    }

    /// Run one frame of `params.substeps` ticks.
    ///
    /// # Errors
    ///
    /// Returns the octree build error for an invalid broad-phase
    /// configuration. Nothing moves in that case.
    pub fn step(&mut self) -> Result<(), PhysicsError> {
        match self.params.broad_phase {
            None => {
                simulate(&mut self.boxes, self.params.substeps);
                self.candidate_pairs = self.boxes.len() * self.boxes.len().saturating_sub(1) / 2;
            }
            Some(config) => {
                validate_tree_params(config.depth, config.size)?;
                for _ in 0..self.params.substeps {
                    self.tick_with_broad_phase(&config)?;
                }
            }
        }
        self.ticks += u64::from(self.params.substeps);
        debug!(ticks = self.ticks, boxes = self.boxes.len(), "frame complete");
        Ok(())
    }

    /// Run `frames` calls to [`step`](Self::step).
    ///
    /// # Errors
    ///
    /// Stops at the first failing frame.
    pub fn run(&mut self, frames: usize) -> Result<(), PhysicsError> {
        for _ in 0..frames {
            self.step()?;
        }
        Ok(())
    }

    fn tick_with_broad_phase(&mut self, config: &BroadPhaseConfig) -> Result<(), PhysicsError> {
        integrate_all(&mut self.boxes);

        self.index.clear_spheres();
        for body in &self.boxes {
            let sphere = body.bounding_sphere(config.margin);
            self.index.add_sphere(sphere.position, sphere.radius);
        }
        self.index.build_tree(config.depth, config.size, config.origin)?;

        let candidates: HashSet<(usize, usize)> =
            self.index.potential_pairs().into_iter().collect();
        self.candidate_pairs = candidates.len();

        resolve_all(&mut self.boxes, |a, b| candidates.contains(&(a, b)));
        Ok(())
    }

    /// Get debug information
    #[must_use]
    pub fn debug_info(&self) -> SimDebugInfo {
        SimDebugInfo {
            num_boxes: self.boxes.len(),
            num_dynamic: self.boxes.iter().filter(|b| b.is_dynamic()).count(),
            ticks: self.ticks,
            contact_points: self.boxes.iter().map(|b| b.contacts().len()).sum(),
            candidate_pairs: self.candidate_pairs,
        }
    }
}
