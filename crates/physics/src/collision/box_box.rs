//! Box-box collision detection by edge/face crossings

use tracing::trace;

use super::contact::{ContactPoint, ContactReport, Side};
use super::geometry::{BoxGeometry, EDGE_COUNT, FACE_COUNT};
use super::intersect::segment_quad;
use crate::body::OrientedBox;

/// Crossings recorded per edge and direction before the edge stops scanning faces.
const CONTACTS_PER_EDGE: usize = 2;

/// Fill `report` with every point where an edge of one box crosses a face of
/// the other, and return the number of points found.
///
/// Edges of `this` crossing faces of `other` are recorded as
/// [`Side::Partner`] with the partner's face normal, the reverse direction as
/// [`Side::Own`]. Boxes whose bounding spheres are apart return 0 before any
/// geometry is built.
pub fn detect_box_box_contacts(
    this: &OrientedBox,
    other: &OrientedBox,
    report: &mut ContactReport,
) -> usize {
    report.clear();

    let distance = this.position().distance(other.position());
    if distance > this.bounding_radius() + other.bounding_radius() {
        return 0;
    }

    let own = BoxGeometry::from_corners(this.world_corners());
    let partner = BoxGeometry::from_corners(other.world_corners());

    'edges: for edge in 0..EDGE_COUNT {
        let mut this_edge_hits = 0;
        let mut other_edge_hits = 0;

        for face in 0..FACE_COUNT {
            if this_edge_hits < CONTACTS_PER_EDGE {
                if let Some(point) = segment_quad(&own.edges[edge], &partner.faces[face]) {
                    this_edge_hits += 1;
                    let contact = ContactPoint::new(
                        Side::Partner,
                        face,
                        point,
                        partner.faces[face],
                        partner.normals[face],
                    );
                    if !report.push(contact) {
                        break 'edges;
                    }
                }
            }

            if other_edge_hits < CONTACTS_PER_EDGE {
                if let Some(point) = segment_quad(&partner.edges[edge], &own.faces[face]) {
                    other_edge_hits += 1;
                    let contact =
                        ContactPoint::new(Side::Own, face, point, own.faces[face], own.normals[face]);
                    if !report.push(contact) {
                        break 'edges;
                    }
                }
            }

            if this_edge_hits == CONTACTS_PER_EDGE && other_edge_hits == CONTACTS_PER_EDGE {
                break;
            }
        }
    }

    trace!(contacts = report.len(), distance, "box-box narrow phase");
    report.len()
}
