//! Segment, triangle and quad intersection predicates

use std::f32::consts::TAU;

use crate::types::Vec3;

/// Allowed deviation of the subtended angle sum from a full turn, in radians.
const ANGLE_SUM_TOLERANCE: f32 = 0.005;

/// Angle-sum inside test: the three angles a point subtends with the
/// triangle's vertex pairs add up to a full turn exactly when it lies inside.
///
/// A point on a vertex yields a zero-length direction and is reported outside.
#[must_use]
pub fn point_in_triangle(point: Vec3, triangle: &[Vec3; 3]) -> bool {
    let [Some(a), Some(b), Some(c)] = triangle.map(|vertex| (point - vertex).try_normalize()) else {
        return false;
    };

    let angle = |u: Vec3, v: Vec3| u.dot(v).clamp(-1.0, 1.0).acos();
    let sum = angle(a, b) + angle(b, c) + angle(c, a);
    (sum - TAU).abs() < ANGLE_SUM_TOLERANCE
}

/// Where the segment crosses the triangle, if it does.
///
/// The crossing distance along the segment is measured against the
/// triangle's plane. A segment parallel to the plane is treated as if the
/// denominator were 1, so it can still report a hit close to its start.
#[must_use]
pub fn segment_triangle(segment: &[Vec3; 2], triangle: &[Vec3; 3]) -> Option<Vec3> {
    let normal = (triangle[1] - triangle[0])
        .cross(triangle[2] - triangle[0])
        .normalize_or_zero();

    let along = segment[1] - segment[0];
    let length = along.length();
    let direction = along.normalize_or_zero();

    let mut denom = direction.dot(normal);
    if denom.abs() < f32::EPSILON {
        denom = 1.0;
    }

    let distance = (normal.dot(triangle[0]) - normal.dot(segment[0])) / denom;
    if distance < 0.0 || distance > length {
        return None;
    }

    let candidate = segment[0] + direction * distance;
    point_in_triangle(candidate, triangle).then_some(candidate)
}

/// Segment against a convex quad, split as `(q0, q1, q2)` and `(q0, q2, q3)`.
#[must_use]
pub fn segment_quad(segment: &[Vec3; 2], quad: &[Vec3; 4]) -> Option<Vec3> {
    segment_triangle(segment, &[quad[0], quad[1], quad[2]])
        .or_else(|| segment_triangle(segment, &[quad[0], quad[2], quad[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> [Vec3; 4] {
        [
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ]
    }

    #[test]
    fn segment_through_quad_center() {
        let segment = [Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 0.0, 2.0)];
        let hit = segment_quad(&segment, &unit_quad()).expect("segment crosses the quad");

        assert!(hit.length() < 1e-5, "hit at {hit:?}");
    }

    #[test]
    fn segment_on_one_side_misses() {
        let segment = [Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 2.0)];
        assert_eq!(segment_quad(&segment, &unit_quad()), None);
    }

    #[test]
    fn segment_pointing_away_misses() {
        let segment = [Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 3.0)];
        let reversed = [segment[1], segment[0]];

        assert_eq!(segment_quad(&segment, &unit_quad()), None);
        assert_eq!(segment_quad(&reversed, &unit_quad()), None);
    }

    #[test]
    fn segment_crossing_plane_outside_quad_misses() {
        let segment = [Vec3::new(3.0, 0.0, -1.0), Vec3::new(3.0, 0.0, 1.0)];
        assert_eq!(segment_quad(&segment, &unit_quad()), None);
    }

    #[test]
    fn off_center_hit_lands_in_second_triangle() {
        let segment = [Vec3::new(-0.3, 0.3, -1.0), Vec3::new(-0.3, 0.3, 1.0)];
        let hit = segment_quad(&segment, &unit_quad()).expect("segment crosses the quad");

        assert!((hit - Vec3::new(-0.3, 0.3, 0.0)).length() < 1e-5);
    }

    #[test]
    fn point_inside_and_outside_triangle() {
        let triangle = [Vec3::ZERO, Vec3::X, Vec3::Y];

        assert!(point_in_triangle(Vec3::new(0.25, 0.25, 0.0), &triangle));
        assert!(!point_in_triangle(Vec3::new(1.0, 1.0, 0.0), &triangle));
        assert!(!point_in_triangle(Vec3::ZERO, &triangle));
    }
}
