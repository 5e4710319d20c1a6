use physics::{ContactReport, OrientedBox, Side, Vec3};

fn ground() -> OrientedBox {
    OrientedBox::new(Vec3::ZERO, Vec3::ONE, Vec3::new(4.0, 1.0, 4.0), Vec3::Z, 0.0, false)
}

fn unit_box_at(position: Vec3) -> OrientedBox {
    OrientedBox::new(position, Vec3::ONE, Vec3::ONE, Vec3::Z, 0.0, true)
}

#[test]
fn far_apart_boxes_have_no_contacts() {
    let a = unit_box_at(Vec3::ZERO);
    let b = unit_box_at(Vec3::new(10.0, 0.0, 0.0));

    let mut report = ContactReport::new();
    assert_eq!(a.collide_into(&mut report, &b), 0);
    assert!(report.is_empty());
}

#[test]
fn collision_overwrites_previous_report() {
    let mut body = unit_box_at(Vec3::new(0.0, 0.9, 0.0));
    assert!(!body.collide(&ground()).is_empty());

    body.set_position(Vec3::new(0.0, 20.0, 0.0));
    assert!(body.collide(&ground()).is_empty());
}

#[test]
fn resting_box_touches_ground_top_face() {
    // Bottom face at y = 0.4, ground top face at y = 0.5.
    let mut body = unit_box_at(Vec3::new(0.0, 0.9, 0.0));
    let ground = ground();

    let report = body.collide(&ground);
    let on_top_face = report
        .iter()
        .filter(|c| c.side() == Side::Partner && c.face_index() == 4)
        .count();
    assert!(on_top_face >= 4, "only {on_top_face} contacts on the top face");

    let normals = report.dominant_face_normals();
    assert!((normals.partner - Vec3::Y).length() < 1e-5, "{:?}", normals.partner);

    // The four vertical edges cross the top face at the box's footprint.
    let corner = Vec3::new(0.5, 0.5, 0.5);
    assert!(report
        .iter()
        .any(|c| (c.point() - corner).length() < 1e-4));
}

#[test]
fn fix_penetration_lifts_resting_box() {
    let mut body = unit_box_at(Vec3::new(0.0, 0.9, 0.0));
    body.collide(&ground());
    body.respond_to_contacts();

    assert!((body.position().y - 0.92).abs() < 1e-5);
    assert!(body.position().x.abs() < 1e-6);
    assert!(body.position().z.abs() < 1e-6);
}

#[test]
fn reversed_test_reports_own_faces() {
    let body = unit_box_at(Vec3::new(0.0, 0.9, 0.0));
    let ground = ground();

    let mut report = ContactReport::new();
    ground.collide_into(&mut report, &body);

    let own_top = report
        .iter()
        .filter(|c| c.side() == Side::Own && c.face_index() == 4)
        .count();
    assert!(own_top >= 4);
    assert!((report.dominant_face_normals().own - Vec3::Y).length() < 1e-5);
}

#[test]
fn tilted_box_contacts_are_finite() {
    let tilted = OrientedBox::new(
        Vec3::new(0.0, 1.1, 0.0),
        Vec3::ONE,
        Vec3::ONE,
        Vec3::Z,
        45.0,
        true,
    );

    let mut report = ContactReport::new();
    let found = tilted.collide_into(&mut report, &ground());

    assert!(found > 0);
    for contact in report.iter() {
        assert!(contact.point().is_finite());
        assert!(contact.face_normal().is_finite());
    }
}
