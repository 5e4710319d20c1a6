//! Shared math and proxy types.

pub use glam::{Mat4, Vec3};

/// Rotation expressed as an axis and an angle in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AxisAngle {
    pub axis: Vec3,
    pub degrees: f32,
}

impl AxisAngle {
    pub const IDENTITY: Self = Self {
        axis: Vec3::Z,
        degrees: 0.0,
    };

    #[must_use]
    pub const fn new(axis: Vec3, degrees: f32) -> Self {
        Self { axis, degrees }
    }
}

impl Default for AxisAngle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Axis-aligned box given by its lower and upper corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub lower: Vec3,
    pub upper: Vec3,
}

impl Aabb {
    #[must_use]
    pub const fn new(lower: Vec3, upper: Vec3) -> Self {
        Self { lower, upper }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.lower + self.upper) * 0.5
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.lower.x
            && p.x <= self.upper.x
            && p.y >= self.lower.y
            && p.y <= self.upper.y
            && p.z >= self.lower.z
            && p.z <= self.upper.z
    }

    /// True when the boxes intersect or touch.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.lower.x <= other.upper.x
            && self.upper.x >= other.lower.x
            && self.lower.y <= other.upper.y
            && self.upper.y >= other.lower.y
            && self.lower.z <= other.upper.z
            && self.upper.z >= other.lower.z
    }

    /// The eight corners, lower corner first.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (l, u) = (self.lower, self.upper);
        [
            Vec3::new(l.x, l.y, l.z),
            Vec3::new(u.x, l.y, l.z),
            Vec3::new(l.x, u.y, l.z),
            Vec3::new(u.x, u.y, l.z),
            Vec3::new(l.x, l.y, u.z),
            Vec3::new(u.x, l.y, u.z),
            Vec3::new(l.x, u.y, u.z),
            Vec3::new(u.x, u.y, u.z),
        ]
    }
}

/// Broad-phase proxy registered with a [`crate::SphereIndex`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Sphere {
    pub position: Vec3,
    pub radius: f32,
}

impl Sphere {
    #[must_use]
    pub const fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }

    /// Box spanning `position ± radius` on every axis.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::new(self.position - r, self.position + r)
    }
}
