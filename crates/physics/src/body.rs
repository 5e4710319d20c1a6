//! # Oriented Boxes
//!
//! [`OrientedBox`] carries the pose of one box together with the geometry
//! derived from it, and implements the contact response: a small positional
//! push out of penetration plus a damped rotation toward the contact.

use std::mem;

use crate::collision::{detect_box_box_contacts, geometry, ContactReport};
use crate::transform::{build_transform, compose_axis_angle};
use crate::types::{AxisAngle, Mat4, Sphere, Vec3};

/// Distance a box is pushed along the contact normal per correction.
pub const PENETRATION_STEP: f32 = 0.02;
/// Fraction of the contact swing angle applied as rotation, with the sign
/// turning the box toward the contact.
pub const REACTION_DAMPING: f32 = -0.05;

/// A box with position, axis-angle rotation, per-axis scale and linear motion.
///
/// `transform`, `local_corners` and `world_corners` are derived from the
/// pose. Every pose setter rebuilds all of them at once, so
/// `world_corners[i] == transform * local_corners[i]` holds after any call.
#[derive(Debug, Clone)]
pub struct OrientedBox {
    position: Vec3,
    scale: Vec3,
    rotation: AxisAngle,
    size: Vec3,
    transform: Mat4,
    local_corners: [Vec3; 8],
    world_corners: [Vec3; 8],
    velocity: Vec3,
    acceleration: Vec3,
    dynamic: bool,
    bounding_radius: f32,
    last_reaction: AxisAngle,
    contacts: ContactReport,
}

impl OrientedBox {
    /// Create a box of full extents `size`, scaled by `scale` and rotated
    /// `degrees` about `axis`.
    #[must_use]
    pub fn new(
        position: Vec3,
        size: Vec3,
        scale: Vec3,
        axis: Vec3,
        degrees: f32,
        dynamic: bool,
    ) -> Self {
        let mut body = Self {
            position,
            scale,
            rotation: AxisAngle::new(axis, degrees),
            size,
            transform: Mat4::IDENTITY,
            local_corners: geometry::local_corners(size),
            world_corners: [Vec3::ZERO; 8],
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            dynamic,
            bounding_radius: 0.0,
            last_reaction: AxisAngle::IDENTITY,
            contacts: ContactReport::new(),
        };
        body.set_transform(position, scale, axis, degrees);
        body
    }

    /// Recompute the transform, corners and bounding radius from a full pose.
    pub fn set_transform(&mut self, position: Vec3, scale: Vec3, axis: Vec3, degrees: f32) {
        self.position = position;
        self.scale = scale;
        self.rotation = AxisAngle::new(axis, degrees);
        self.transform = build_transform(position, scale, axis, degrees);
        self.world_corners = self
            .local_corners
            .map(|corner| self.transform.transform_point3(corner));
        self.bounding_radius = 0.5 * (self.size * scale).length();
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.set_transform(position, self.scale, self.rotation.axis, self.rotation.degrees);
    }

    pub fn set_rotation(&mut self, axis: Vec3, degrees: f32) {
        self.set_transform(self.position, self.scale, axis, degrees);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.set_transform(self.position, scale, self.rotation.axis, self.rotation.degrees);
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vec3) {
        self.acceleration = acceleration;
    }

    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> AxisAngle {
        self.rotation
    }

    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Unscaled full extents.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[must_use]
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    #[must_use]
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    #[must_use]
    pub fn local_corners(&self) -> &[Vec3; 8] {
        &self.local_corners
    }

    #[must_use]
    pub fn world_corners(&self) -> &[Vec3; 8] {
        &self.world_corners
    }

    /// Half the diagonal of the scaled box.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    /// Bounding sphere grown by `margin`, for broad-phase registration.
    #[must_use]
    pub fn bounding_sphere(&self, margin: f32) -> Sphere {
        Sphere::new(self.position, self.bounding_radius + margin)
    }

    /// The last rotation increment applied by [`reaction`](Self::reaction).
    #[must_use]
    pub fn last_reaction(&self) -> AxisAngle {
        self.last_reaction
    }

    /// Contacts from the most recent [`collide`](Self::collide).
    #[must_use]
    pub fn contacts(&self) -> &ContactReport {
        &self.contacts
    }

    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }

    /// Test against `other`, writing the contacts into a caller-owned report.
    pub fn collide_into(&self, report: &mut ContactReport, other: &OrientedBox) -> usize {
        detect_box_box_contacts(self, other, report)
    }

    /// Test against `other` and keep the result as this box's contact report.
    pub fn collide(&mut self, other: &OrientedBox) -> &ContactReport {
        let mut report = mem::take(&mut self.contacts);
        detect_box_box_contacts(self, other, &mut report);
        self.contacts = report;
        &self.contacts
    }

    /// Advance one tick: `velocity += acceleration`, then move by `velocity`.
    pub fn integrate(&mut self) {
        self.velocity += self.acceleration;
        self.set_position(self.position + self.velocity);
    }

    /// Push the box a fixed step out of penetration.
    ///
    /// The direction is the partner's dominant face normal, or the negated
    /// own dominant normal when no partner face was hit.
    pub fn fix_penetration(&mut self, report: &ContactReport) {
        let normals = report.dominant_face_normals();
        let direction = if normals.partner.length() > 0.0 {
            normals.partner
        } else {
            -normals.own
        };
        let step = direction.normalize_or_zero() * PENETRATION_STEP;
        self.set_position(self.position + step);
    }

    /// Rotate toward the mean contact point by a damped fraction of the
    /// angle between the contact direction and the velocity.
    ///
    /// A box at rest has no heading and is left alone.
    pub fn reaction(&mut self, report: &ContactReport) {
        let Some(contact) = report.average_point() else {
            return;
        };
        let Some(heading) = self.velocity.try_normalize() else {
            return;
        };

        let contact_direction = (contact - self.position).normalize_or_zero();
        let axis = contact_direction.cross(heading).normalize_or_zero();
        let swing = contact_direction.dot(heading).clamp(-1.0, 1.0).acos();

        let increment = AxisAngle::new(axis, (swing * REACTION_DAMPING).to_degrees());
        let combined = compose_axis_angle(increment, self.rotation);
        self.last_reaction = increment;
        self.set_rotation(combined.axis, combined.degrees);
    }

    /// Keep spinning by the last reaction, scaled by the current speed.
    pub fn apply_last_reaction(&mut self) {
        let degrees = self.last_reaction.degrees * self.velocity.length();
        if degrees.abs() < f32::EPSILON {
            return;
        }
        let step = AxisAngle::new(self.last_reaction.axis, degrees);
        let combined = compose_axis_angle(step, self.rotation);
        self.set_rotation(combined.axis, combined.degrees);
    }

    /// Run [`fix_penetration`](Self::fix_penetration) then
    /// [`reaction`](Self::reaction) on the stored contact report.
    pub fn respond_to_contacts(&mut self) {
        let report = mem::take(&mut self.contacts);
        self.fix_penetration(&report);
        self.reaction(&report);
        self.contacts = report;
    }
}

impl Default for OrientedBox {
    /// A dynamic unit cube at the origin.
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ONE, Vec3::ONE, Vec3::Z, 0.0, true)
    }
}
