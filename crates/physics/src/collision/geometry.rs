//! Box topology: corner layout, edge and face tables

use crate::types::Vec3;

pub const CORNER_COUNT: usize = 8;
pub const EDGE_COUNT: usize = 12;
pub const FACE_COUNT: usize = 6;

/// Corner index pairs forming the twelve box edges.
pub const BOX_EDGES: [[usize; 2]; EDGE_COUNT] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 4],
    [4, 5],
    [5, 6],
    [6, 7],
    [0, 5],
    [1, 6],
    [2, 7],
    [0, 3],
    [7, 4],
];

/// Corner indices of each face, wound so [`face_normal`] points outward.
/// Order: -z, +z, -x, +x, +y, -y.
pub const BOX_FACES: [[usize; 4]; FACE_COUNT] = [
    [0, 1, 2, 3],
    [4, 7, 6, 5],
    [5, 6, 1, 0],
    [3, 2, 7, 4],
    [1, 6, 7, 2],
    [5, 0, 3, 4],
];

/// Object-space corners of a box with the given full extents, centered on the origin.
#[must_use]
pub fn local_corners(size: Vec3) -> [Vec3; CORNER_COUNT] {
    let h = size * 0.5;
    [
        Vec3::new(-h.x, -h.y, -h.z),
        Vec3::new(-h.x, h.y, -h.z),
        Vec3::new(h.x, h.y, -h.z),
        Vec3::new(h.x, -h.y, -h.z),
        Vec3::new(h.x, -h.y, h.z),
        Vec3::new(-h.x, -h.y, h.z),
        Vec3::new(-h.x, h.y, h.z),
        Vec3::new(h.x, h.y, h.z),
    ]
}

/// Outward unit normal of a face: `normalize((v2 - v1) x (v0 - v1))`.
#[must_use]
pub fn face_normal(face: &[Vec3; 4]) -> Vec3 {
    (face[2] - face[1])
        .cross(face[0] - face[1])
        .normalize_or_zero()
}

/// World-space edges, faces and face normals of one box.
#[derive(Debug, Clone, Copy)]
pub struct BoxGeometry {
    pub edges: [[Vec3; 2]; EDGE_COUNT],
    pub faces: [[Vec3; 4]; FACE_COUNT],
    pub normals: [Vec3; FACE_COUNT],
}

impl BoxGeometry {
    #[must_use]
    pub fn from_corners(corners: &[Vec3; CORNER_COUNT]) -> Self {
        let edges = BOX_EDGES.map(|[a, b]| [corners[a], corners[b]]);
        let faces = BOX_FACES.map(|indices| indices.map(|i| corners[i]));
        let normals = faces.map(|face| face_normal(&face));
        Self {
            edges,
            faces,
            normals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_box_normals_point_outward() {
        let geometry = BoxGeometry::from_corners(&local_corners(Vec3::ONE));

        assert_eq!(
            geometry.normals,
            [Vec3::NEG_Z, Vec3::Z, Vec3::NEG_X, Vec3::X, Vec3::Y, Vec3::NEG_Y]
        );
    }

    #[test]
    fn every_edge_has_unit_length_on_unit_box() {
        let geometry = BoxGeometry::from_corners(&local_corners(Vec3::ONE));

        for [a, b] in geometry.edges {
            assert!((a.distance(b) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn each_face_sits_on_its_normal_plane() {
        let size = Vec3::new(2.0, 4.0, 6.0);
        let geometry = BoxGeometry::from_corners(&local_corners(size));

        for (face, normal) in geometry.faces.iter().zip(geometry.normals) {
            let offset = (size * 0.5).dot(normal.abs());
            for vertex in face {
                assert!((vertex.dot(normal) - offset).abs() < 1e-5);
            }
        }
    }
}
