//! # Collision Detection
//!
//! Narrow-phase contact generation between oriented boxes. Every edge of
//! each box is tested against every face of the other, and the crossings are
//! gathered into a [`ContactReport`] that the response code in
//! [`crate::body`] consumes.

mod box_box;
mod contact;
pub mod geometry;
pub mod intersect;

pub use box_box::detect_box_box_contacts;
pub use contact::{ContactPoint, ContactReport, Side, SideNormals, CONTACT_CAPACITY};
pub use geometry::{BoxGeometry, BOX_EDGES, BOX_FACES};
pub use intersect::{point_in_triangle, segment_quad, segment_triangle};
