use physics::{
    simulate, BroadPhaseConfig, ContactPoint, ContactReport, OrientedBox, PhysicsSim, Side,
    SimParams, Vec3,
};

fn ground() -> OrientedBox {
    OrientedBox::new(Vec3::ZERO, Vec3::ONE, Vec3::new(4.0, 1.0, 4.0), Vec3::Z, 0.0, false)
}

fn falling_box(position: Vec3) -> OrientedBox {
    let mut body = OrientedBox::new(position, Vec3::ONE, Vec3::ONE, Vec3::Z, 0.0, true);
    body.set_velocity(Vec3::new(0.0, -0.01, 0.0));
    body
}

#[test]
fn falling_box_comes_to_rest_on_ground() {
    let mut boxes = vec![falling_box(Vec3::new(0.0, 3.0, 0.0)), ground()];
    let ground_before = boxes[1].clone();

    // Enough ticks to fall two units and settle.
    simulate(&mut boxes, 300);

    let window = 100;
    let start = boxes[0].position();
    for _ in 0..window {
        simulate(&mut boxes, 1);
        let p = boxes[0].position();
        assert!(p.is_finite());
        assert!(p.y > 0.9 && p.y < 1.5, "box left the ground: {p:?}");
        assert!(p.x.abs() < 1e-3 && p.z.abs() < 1e-3, "box drifted sideways: {p:?}");
    }

    #[allow(clippy::cast_precision_loss)]
    let mean_displacement = (boxes[0].position() - start).length() / window as f32;
    assert!(mean_displacement < 0.002, "still moving: {mean_displacement}");

    assert_eq!(boxes[1].position(), ground_before.position());
    assert_eq!(boxes[1].rotation(), ground_before.rotation());
    assert_eq!(boxes[1].world_corners(), ground_before.world_corners());
}

#[test]
fn static_boxes_still_integrate() {
    let mut drifting = ground();
    drifting.set_velocity(Vec3::new(0.1, 0.0, 0.0));
    let mut boxes = vec![drifting];

    simulate(&mut boxes, 10);

    assert!((boxes[0].position().x - 1.0).abs() < 1e-5);
}

#[test]
fn sim_counts_ticks_per_frame() {
    let mut sim = PhysicsSim::new();
    sim.add_box(ground());
    sim.add_box(falling_box(Vec3::new(0.0, 2.0, 0.0)));

    sim.run(4).expect("exhaustive stepping cannot fail");

    let info = sim.debug_info();
    assert_eq!(info.ticks, 20);
    assert_eq!(info.num_boxes, 2);
    assert_eq!(info.num_dynamic, 1);
}

fn scene() -> Vec<OrientedBox> {
    vec![
        ground(),
        falling_box(Vec3::new(0.0, 1.2, 0.0)),
        falling_box(Vec3::new(50.0, 0.0, 50.0)),
    ]
}

#[test]
fn broad_phase_matches_exhaustive_loop() -> anyhow::Result<()> {
    let mut exhaustive = PhysicsSim::new();
    exhaustive.reset_from(scene());

    let mut culled = PhysicsSim::with_params(SimParams {
        substeps: 5,
        broad_phase: Some(BroadPhaseConfig::default()),
    });
    culled.reset_from(scene());

    for _ in 0..20 {
        exhaustive.step()?;
        culled.step()?;
    }

    for (a, b) in exhaustive.boxes.iter().zip(&culled.boxes) {
        assert_eq!(a.position(), b.position());
        assert_eq!(a.rotation(), b.rotation());
    }
    assert_eq!(culled.debug_info().candidate_pairs, 1);
    assert_eq!(culled.broad_phase().spheres().len(), 3);
    Ok(())
}

#[test]
fn invalid_broad_phase_leaves_boxes_untouched() {
    let mut sim = PhysicsSim::with_params(SimParams {
        substeps: 5,
        broad_phase: Some(BroadPhaseConfig {
            depth: 12,
            ..BroadPhaseConfig::default()
        }),
    });
    sim.reset_from(scene());

    assert!(sim.step().is_err());
    assert_eq!(sim.boxes[1].position(), Vec3::new(0.0, 1.2, 0.0));
    assert_eq!(sim.ticks(), 0);
}

/// A box moving down at unit speed that has already reacted to a contact on
/// its +x side, so it remembers a 4.5 degree turn about z.
fn spinning_box(position: Vec3) -> OrientedBox {
    let mut body = falling_box(position);
    body.set_velocity(Vec3::new(0.0, -1.0, 0.0));

    let mut report = ContactReport::new();
    report.push(ContactPoint::new(
        Side::Partner,
        3,
        position + Vec3::X,
        [Vec3::ZERO; 4],
        Vec3::X,
    ));
    body.reaction(&report);
    body
}

#[test]
fn only_outer_box_of_a_quiet_pair_keeps_spinning() {
    let mut boxes = vec![
        spinning_box(Vec3::new(-20.0, 0.0, 0.0)),
        spinning_box(Vec3::ZERO),
        spinning_box(Vec3::new(20.0, 0.0, 0.0)),
    ];
    let turn = boxes[0].last_reaction().degrees.abs();
    assert!(turn > 1.0);
    assert!(boxes.iter().all(|b| (b.rotation().degrees - turn).abs() < 1e-3));

    simulate(&mut boxes, 1);

    // Pairs (0,1) and (0,2) spin box 0 twice, (1,2) spins box 1 once and
    // box 2 is never the outer box.
    let degrees: Vec<f32> = boxes.iter().map(|b| b.rotation().degrees).collect();
    assert!((degrees[0] - 3.0 * turn).abs() < 1e-2, "{degrees:?}");
    assert!((degrees[1] - 2.0 * turn).abs() < 1e-2, "{degrees:?}");
    assert!((degrees[2] - turn).abs() < 1e-3, "{degrees:?}");
    assert!(boxes.iter().all(|b| b.contacts().is_empty()));
}

#[test]
fn inner_box_is_tested_only_after_outer_box_hits() {
    let mut resting = falling_box(Vec3::new(0.0, 0.95, 0.0));
    resting.set_velocity(Vec3::new(0.0, -0.01, 0.0));
    let mut boxes = vec![spinning_box(Vec3::new(-20.0, 0.0, 0.0)), ground(), resting];
    let turn = boxes[0].last_reaction().degrees.abs();

    simulate(&mut boxes, 1);

    // The far box meets nobody and decays on both of its pairs.
    assert!(boxes[0].contacts().is_empty());
    assert!((boxes[0].rotation().degrees - 3.0 * turn).abs() < 1e-2);

    // The ground found the resting box, so the resting box ran its own test
    // and stepped out along the ground's top face.
    assert!(!boxes[1].contacts().is_empty());
    assert!(!boxes[2].contacts().is_empty());
    assert_eq!(boxes[1].position(), Vec3::ZERO);
    let y = boxes[2].position().y;
    assert!((y - 0.96).abs() < 1e-4, "resting box at {y}");
}
