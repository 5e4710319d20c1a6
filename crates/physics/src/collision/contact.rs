//! Contact points and the per-box contact report

use tracing::warn;

use super::geometry::FACE_COUNT;
use crate::types::Vec3;

/// Maximum number of contact points a single report holds.
pub const CONTACT_CAPACITY: usize = 50;

/// Which box owns the face a contact point was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// A face of the box that owns the report.
    Own,
    /// A face of the collision partner.
    Partner,
}

impl Side {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Own => 0,
            Side::Partner => 1,
        }
    }
}

/// A point where an edge of one box crosses a face of the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    side: Side,
    face_index: usize,
    point: Vec3,
    face_vertices: [Vec3; 4],
    face_normal: Vec3,
}

impl ContactPoint {
    #[must_use]
    pub const fn new(
        side: Side,
        face_index: usize,
        point: Vec3,
        face_vertices: [Vec3; 4],
        face_normal: Vec3,
    ) -> Self {
        Self {
            side,
            face_index,
            point,
            face_vertices,
            face_normal,
        }
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn face_index(&self) -> usize {
        self.face_index
    }

    #[must_use]
    pub const fn point(&self) -> Vec3 {
        self.point
    }

    #[must_use]
    pub const fn face_vertices(&self) -> &[Vec3; 4] {
        &self.face_vertices
    }

    #[must_use]
    pub const fn face_normal(&self) -> Vec3 {
        self.face_normal
    }
}

/// Face normals gathered per side of a contact report.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SideNormals {
    pub own: Vec3,
    pub partner: Vec3,
}

/// Contact points found for one box against one partner.
///
/// Holds at most [`CONTACT_CAPACITY`] points and is overwritten by every
/// collision test.
#[derive(Debug, Clone, Default)]
pub struct ContactReport {
    points: Vec<ContactPoint>,
}

impl ContactReport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(CONTACT_CAPACITY),
        }
    }

    /// Append a point. Returns `false` and drops the point once the report is full.
    pub fn push(&mut self, point: ContactPoint) -> bool {
        if self.points.len() >= CONTACT_CAPACITY {
            warn!(capacity = CONTACT_CAPACITY, "contact report full, dropping point");
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[ContactPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactPoint> {
        self.points.iter()
    }

    /// Mean of all contact points, `None` for an empty report.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_point(&self) -> Option<Vec3> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vec3 = self.points.iter().map(ContactPoint::point).sum();
        Some(sum / self.points.len() as f32)
    }

    /// Un-normalized sum of face normals for each side.
    #[must_use]
    pub fn average_normals(&self) -> SideNormals {
        let mut normals = SideNormals::default();
        for contact in &self.points {
            match contact.side {
                Side::Own => normals.own += contact.face_normal,
                Side::Partner => normals.partner += contact.face_normal,
            }
        }
        normals
    }

    /// Per side, the normal of the face holding strictly the most contacts.
    ///
    /// A side whose top two faces tie falls back to the summed normal from
    /// [`average_normals`](Self::average_normals). Resting stacks pick up
    /// stray contacts on side faces, and summing those tilts the correction
    /// sideways.
    #[must_use]
    pub fn dominant_face_normals(&self) -> SideNormals {
        let summed = self.average_normals();
        SideNormals {
            own: self.dominant_normal(Side::Own).unwrap_or(summed.own),
            partner: self.dominant_normal(Side::Partner).unwrap_or(summed.partner),
        }
    }

    fn dominant_normal(&self, side: Side) -> Option<Vec3> {
        let mut counts = [0_usize; FACE_COUNT];
        let mut normals = [None; FACE_COUNT];
        for contact in self.points.iter().filter(|c| c.side == side) {
            if let Some(count) = counts.get_mut(contact.face_index) {
                *count += 1;
                normals[contact.face_index].get_or_insert(contact.face_normal);
            }
        }

        let (best, best_count) = counts
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|&(_, count)| count)?;
        let runner_up = counts
            .iter()
            .copied()
            .enumerate()
            .filter(|&(face, _)| face != best)
            .map(|(_, count)| count)
            .max()
            .unwrap_or(0);

        if best_count > runner_up {
            normals[best]
        } else {
            None
        }
    }
}
