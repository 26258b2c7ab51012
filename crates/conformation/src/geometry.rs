//! Geometry primitives over image-space keypoints.
//!
//! All angles are in degrees within `[0, 180]`. Cosines are clamped to
//! `[-1, 1]` before `acos` so floating-point drift never yields NaN; a
//! zero-length ray yields `None`.

use classifier_common::Point2D;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference axis for [`angle_with_axis`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Euclidean distance between two points
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    a.distance_to(b)
}

/// Absolute vertical offset between two points
pub fn vertical_drop(a: Point2D, b: Point2D) -> f64 {
    (a.y - b.y).abs()
}

/// Angle at `vertex` between the rays `vertex -> a` and `vertex -> c`
pub fn angle_at_vertex(a: Point2D, vertex: Point2D, c: Point2D) -> Option<f64> {
    let (ax, ay) = vertex.to(a);
    let (cx, cy) = vertex.to(c);

    let norm_a = ax.hypot(ay);
    let norm_c = cx.hypot(cy);
    if norm_a == 0.0 || norm_c == 0.0 {
        return None;
    }

    let cos = (ax * cx + ay * cy) / (norm_a * norm_c);
    clamped_acos_degrees(cos)
}

/// Angle of the segment `a -> b` against a reference axis.
///
/// For [`Axis::Vertical`] the reference direction is straight down the
/// image (`+y`), so a segment pointing down measures 0; for
/// [`Axis::Horizontal`] it is `+x`.
pub fn angle_with_axis(a: Point2D, b: Point2D, axis: Axis) -> Option<f64> {
    let (dx, dy) = a.to(b);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }

    let cos = match axis {
        Axis::Vertical => dy / length,
        Axis::Horizontal => dx / length,
    };
    clamped_acos_degrees(cos)
}

fn clamped_acos_degrees(cos: f64) -> Option<f64> {
    if cos.is_nan() {
        return None;
    }
    Some(cos.clamp(-1.0, 1.0).acos().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(p(0.0, 0.0), p(3.0, 4.0)), 5.0);
        assert_eq!(distance(p(2.0, 2.0), p(2.0, 2.0)), 0.0);
        assert_eq!(vertical_drop(p(0.0, 10.0), p(50.0, 40.0)), 30.0);
    }

    #[test]
    fn test_right_angle_at_vertex() {
        let angle = angle_at_vertex(p(10.0, 0.0), p(0.0, 0.0), p(0.0, 10.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_rays() {
        assert_eq!(angle_at_vertex(p(1.0, 1.0), p(1.0, 1.0), p(5.0, 5.0)), None);
        assert_eq!(angle_at_vertex(p(5.0, 5.0), p(1.0, 1.0), p(1.0, 1.0)), None);
        assert_eq!(angle_with_axis(p(3.0, 3.0), p(3.0, 3.0), Axis::Vertical), None);
        assert_eq!(angle_with_axis(p(3.0, 3.0), p(3.0, 3.0), Axis::Horizontal), None);
    }

    #[test]
    fn test_collinear_rays_do_not_produce_nan() {
        // Nearly parallel rays push the cosine slightly past 1 without the clamp.
        let a = p(1e8, 1e8 + 1e-7);
        let c = p(3e8, 3e8 + 3e-7);
        let angle = angle_at_vertex(a, p(0.0, 0.0), c).unwrap();
        assert!(!angle.is_nan());
        assert!((0.0..=180.0).contains(&angle));

        let opposite = angle_at_vertex(p(-7.0, 0.0), p(0.0, 0.0), p(0.1, 0.0)).unwrap();
        assert!((opposite - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_conventions() {
        // Straight down the image (y increasing) is 0 against the vertical.
        assert!(angle_with_axis(p(0.0, 0.0), p(0.0, 10.0), Axis::Vertical).unwrap().abs() < 1e-9);
        let up = angle_with_axis(p(0.0, 10.0), p(0.0, 0.0), Axis::Vertical).unwrap();
        assert!((up - 180.0).abs() < 1e-9);
        let toe = angle_with_axis(p(0.0, 0.0), p(10.0, 10.0), Axis::Vertical).unwrap();
        assert!((toe - 45.0).abs() < 1e-9);

        assert!(angle_with_axis(p(0.0, 0.0), p(10.0, 0.0), Axis::Horizontal).unwrap().abs() < 1e-9);
        let diagonal = angle_with_axis(p(0.0, 0.0), p(10.0, 10.0), Axis::Horizontal).unwrap();
        assert!((diagonal - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_angles_stay_in_range_over_grid() {
        let coords = [-250.0, -3.5, 0.0, 0.25, 17.0, 640.0];
        for &ax in &coords {
            for &ay in &coords {
                for &cx in &coords {
                    for &cy in &coords {
                        let a = p(ax, ay);
                        let c = p(cx, cy);
                        if let Some(angle) = angle_at_vertex(a, p(0.25, 17.0), c) {
                            assert!((0.0..=180.0).contains(&angle), "{angle}");
                        }
                        for axis in [Axis::Vertical, Axis::Horizontal] {
                            if let Some(angle) = angle_with_axis(a, c, axis) {
                                assert!((0.0..=180.0).contains(&angle), "{angle}");
                            }
                        }
                    }
                }
            }
        }
    }
}
