use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use physics::{AxisAngle, BroadPhaseConfig, OrientedBox, PhysicsSim, Vec3};
use scene::Scene;
use tracing::{debug, error, info, warn};

use crate::watcher;
use crate::Args;

/// What a finished run looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub ticks: u64,
    pub reloads: usize,
    pub ids: Vec<String>,
    pub positions: Vec<Vec3>,
    pub rotations: Vec<AxisAngle>,
}

impl RunSummary {
    /// Log the final pose of every box.
    pub fn log(&self) {
        info!(
            frames = self.frames,
            ticks = self.ticks,
            reloads = self.reloads,
            "simulation finished"
        );
        for ((id, position), rotation) in self.ids.iter().zip(&self.positions).zip(&self.rotations) {
            info!(
                "{id}: position {position:?}, axis {:?}, angle {:.2}",
                rotation.axis, rotation.degrees
            );
        }
    }
}

/// Load the scene named by `--scene`, or the built-in stack, and apply the
/// command-line overrides.
pub fn load_scene(args: &Args) -> Result<Scene> {
    let mut scene = match &args.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::default(),
    };

    if let Some(substeps) = args.substeps {
        scene.simulation.substeps = substeps;
    }
    if args.broad_phase && scene.simulation.broad_phase.is_none() {
        scene.simulation.broad_phase = Some(BroadPhaseConfig::default().into());
    }
    scene.validate()?;
    Ok(scene)
}

/// Run the simulation described by `args` to completion.
pub fn run(args: &Args) -> Result<RunSummary> {
    let scene = load_scene(args)?;
    let mut ids: Vec<String> = scene.ids().map(str::to_owned).collect();
    let mut sim = scene.into_sim()?;

    let watcher = match (&args.scene, args.watch) {
        (Some(path), true) => Some(watcher::start(path)?),
        (None, true) => {
            warn!("--watch needs --scene, ignoring");
            None
        }
        _ => None,
    };

    info!(
        boxes = sim.boxes.len(),
        substeps = sim.params.substeps,
        broad_phase = sim.params.broad_phase.is_some(),
        frames = args.frames,
        "starting simulation"
    );

    let mut reloads = 0;
    for frame in 0..args.frames {
        if watcher.as_ref().is_some_and(watcher::SceneWatcher::changed)
            && reload(args, &mut sim, &mut ids)
        {
            reloads += 1;
            info!(frame, boxes = sim.boxes.len(), "scene reloaded");
        }

        sim.step()
            .with_context(|| format!("simulation step failed at frame {frame}"))?;

        if args.log_every > 0 && (frame + 1) % args.log_every == 0 {
            log_progress(&sim, &ids, frame + 1);
        }
        if args.frame_ms > 0 {
            thread::sleep(Duration::from_millis(args.frame_ms));
        }
    }

    Ok(RunSummary {
        frames: args.frames,
        ticks: sim.ticks(),
        reloads,
        ids,
        positions: sim.boxes.iter().map(OrientedBox::position).collect(),
        rotations: sim.boxes.iter().map(OrientedBox::rotation).collect(),
    })
}

/// Swap in the scene file's current contents. On failure the running
/// scene is kept and `false` returned.
fn reload(args: &Args, sim: &mut PhysicsSim, ids: &mut Vec<String>) -> bool {
    match load_scene(args) {
        Ok(scene) => {
            *ids = scene.ids().map(str::to_owned).collect();
            sim.params = scene.params();
            sim.reset_from(scene.to_boxes());
            true
        }
        Err(e) => {
            error!("keeping previous scene, reload failed: {e:#}");
            false
        }
    }
}

fn log_progress(sim: &PhysicsSim, ids: &[String], frame: usize) {
    let info = sim.debug_info();
    info!(
        frame,
        ticks = info.ticks,
        contacts = info.contact_points,
        candidate_pairs = info.candidate_pairs,
        "simulation progress"
    );
    for (id, body) in ids.iter().zip(&sim.boxes).filter(|(_, b)| b.is_dynamic()) {
        debug!(id = %id, position = ?body.position(), velocity = ?body.velocity(), "box state");
    }
}
