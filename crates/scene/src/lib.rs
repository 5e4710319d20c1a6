#![deny(clippy::all, clippy::pedantic)]
//! JSON scene descriptions for the box simulation.
//!
//! A [`Scene`] lists boxes by id with their pose and motion, plus the
//! simulation parameters. Scenes are parsed with `str::parse`, loaded from
//! disk with [`Scene::load`], and turned into a ready-to-run
//! [`PhysicsSim`] with [`Scene::into_sim`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};
use physics::octree::validate_tree_params;
use physics::{BroadPhaseConfig, OrientedBox, PhysicsSim, SimParams, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Boxes in the default scene, ground included.
pub const DEFAULT_STACK: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub simulation: SimulationDef,
    pub boxes: Vec<BoxDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationDef {
    #[serde(default = "default_substeps")]
    pub substeps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broad_phase: Option<BroadPhaseDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadPhaseDef {
    #[serde(default = "default_depth")]
    pub depth: u32,
    #[serde(default = "default_tree_size")]
    pub size: [f32; 3],
    #[serde(default = "zero_vec")]
    pub origin: [f32; 3],
    #[serde(default = "default_margin")]
    pub margin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDef {
    pub id: String,
    pub pos: [f32; 3],
    #[serde(default = "one_vec")]
    pub size: [f32; 3],
    #[serde(default = "one_vec")]
    pub scale: [f32; 3],
    #[serde(default = "z_axis")]
    pub axis: [f32; 3],
    /// Rotation about `axis` in degrees.
    #[serde(default)]
    pub angle: f32,
    #[serde(default = "yes")]
    pub dynamic: bool,
    #[serde(default = "zero_vec")]
    pub vel: [f32; 3],
    #[serde(default = "zero_vec")]
    pub accel: [f32; 3],
}

fn default_substeps() -> u32 {
    physics::simulation::DEFAULT_SUBSTEPS
}

fn default_depth() -> u32 {
    BroadPhaseConfig::default().depth
}

fn default_tree_size() -> [f32; 3] {
    BroadPhaseConfig::default().size.to_array()
}

fn default_margin() -> f32 {
    BroadPhaseConfig::default().margin
}

fn zero_vec() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn one_vec() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn z_axis() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}

fn yes() -> bool {
    true
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            substeps: default_substeps(),
            broad_phase: None,
        }
    }
}

impl Default for BroadPhaseDef {
    fn default() -> Self {
        BroadPhaseConfig::default().into()
    }
}

impl From<BroadPhaseConfig> for BroadPhaseDef {
    fn from(config: BroadPhaseConfig) -> Self {
        Self {
            depth: config.depth,
            size: config.size.to_array(),
            origin: config.origin.to_array(),
            margin: config.margin,
        }
    }
}

impl From<&BroadPhaseDef> for BroadPhaseConfig {
    fn from(def: &BroadPhaseDef) -> Self {
        Self {
            depth: def.depth,
            size: Vec3::from(def.size),
            origin: Vec3::from(def.origin),
            margin: def.margin,
        }
    }
}

impl BroadPhaseDef {
    /// Check the octree settings without building a tree.
    ///
    /// # Errors
    ///
    /// Fails on a depth or size the octree rejects, a non-finite origin, or a
    /// negative or non-finite margin.
    pub fn validate(&self) -> Result<()> {
        validate_tree_params(self.depth, Vec3::from(self.size)).context("invalid broad_phase")?;
        ensure!(
            Vec3::from(self.origin).is_finite(),
            "broad_phase origin must be finite, got {:?}",
            self.origin
        );
        ensure!(
            self.margin.is_finite() && self.margin >= 0.0,
            "broad_phase margin must be finite and non-negative, got {}",
            self.margin
        );
        Ok(())
    }
}

impl BoxDef {
    /// A dynamic unit box at `pos`.
    #[must_use]
    pub fn new(id: impl Into<String>, pos: [f32; 3]) -> Self {
        Self {
            id: id.into(),
            pos,
            size: one_vec(),
            scale: one_vec(),
            axis: z_axis(),
            angle: 0.0,
            dynamic: true,
            vel: zero_vec(),
            accel: zero_vec(),
        }
    }

    #[must_use]
    pub fn to_box(&self) -> OrientedBox {
        let mut body = OrientedBox::new(
            Vec3::from(self.pos),
            Vec3::from(self.size),
            Vec3::from(self.scale),
            Vec3::from(self.axis),
            self.angle,
            self.dynamic,
        );
        body.set_velocity(Vec3::from(self.vel));
        body.set_acceleration(Vec3::from(self.accel));
        body
    }
}

impl Scene {
    /// The falling stack: `count - 1` dynamic unit boxes staggered above a
    /// static ground slab, which comes last.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stacked(count: usize) -> Self {
        let base = Vec3::Y;
        let mut boxes: Vec<BoxDef> = (0..count.saturating_sub(1))
            .map(|i| {
                let offset = Vec3::new((i % 2) as f32 * 0.5, 1.0 + i as f32 * 1.25, 0.0);
                let mut def = BoxDef::new(format!("box{i}"), (base + offset).to_array());
                def.vel = [0.0, -0.01, 0.0];
                def
            })
            .collect();

        let mut ground = BoxDef::new("ground", [0.0, 0.0, 0.0]);
        ground.scale = [4.0, 1.0, 4.0];
        ground.dynamic = false;
        boxes.push(ground);

        Self {
            simulation: SimulationDef::default(),
            boxes,
        }
    }

    /// Read and validate a scene file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not valid scene JSON, or does
    /// not pass [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        let scene: Scene = json
            .parse()
            .with_context(|| format!("failed to load scene {}", path.display()))?;
        debug!(path = %path.display(), boxes = scene.boxes.len(), "loaded scene");
        Ok(scene)
    }

    /// Check ids and numeric ranges.
    ///
    /// # Errors
    ///
    /// Rejects duplicate ids, sizes or scales that are not finite and
    /// positive, non-finite positions and motion, zero substeps, and broad
    /// phase settings the octree would refuse.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.simulation.substeps > 0, "substeps must be at least 1");
        if let Some(broad) = &self.simulation.broad_phase {
            broad.validate()?;
        }

        let mut seen = HashSet::new();
        for def in &self.boxes {
            if !seen.insert(def.id.as_str()) {
                bail!("duplicate box id {:?}", def.id);
            }
            ensure!(
                positive(def.size),
                "box {:?}: size must be finite and positive, got {:?}",
                def.id,
                def.size
            );
            ensure!(
                positive(def.scale),
                "box {:?}: scale must be finite and positive, got {:?}",
                def.id,
                def.scale
            );
            for (name, value) in [("pos", def.pos), ("axis", def.axis), ("vel", def.vel), ("accel", def.accel)] {
                ensure!(
                    Vec3::from(value).is_finite(),
                    "box {:?}: {name} must be finite, got {:?}",
                    def.id,
                    value
                );
            }
            ensure!(def.angle.is_finite(), "box {:?}: angle must be finite", def.id);
        }
        Ok(())
    }

    #[must_use]
    pub fn params(&self) -> SimParams {
        SimParams {
            substeps: self.simulation.substeps,
            broad_phase: self.simulation.broad_phase.as_ref().map(BroadPhaseConfig::from),
        }
    }

    /// Boxes in scene order.
    #[must_use]
    pub fn to_boxes(&self) -> Vec<OrientedBox> {
        self.boxes.iter().map(BoxDef::to_box).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.boxes.iter().map(|def| def.id.as_str())
    }

    /// Build a simulation whose box indices follow scene order.
    ///
    /// # Errors
    ///
    /// Fails when the scene does not pass [`validate`](Self::validate).
    pub fn into_sim(self) -> Result<PhysicsSim> {
        self.validate()?;
        let mut sim = PhysicsSim::with_params(self.params());
        sim.reset_from(self.to_boxes());
        Ok(sim)
    }

    /// Pretty-printed JSON form.
    ///
    /// # Errors
    ///
    /// Only fails if serialization itself fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn positive(v: [f32; 3]) -> bool {
    v.iter().all(|c| c.is_finite() && *c > 0.0)
}

impl Default for Scene {
    fn default() -> Self {
        Self::stacked(DEFAULT_STACK)
    }
}

impl FromStr for Scene {
    type Err = anyhow::Error;

    fn from_str(json: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(json).context("invalid scene JSON")?;
        scene.validate()?;
        Ok(scene)
    }
}
