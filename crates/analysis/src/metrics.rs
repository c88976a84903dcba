//! Kinematic primitives: angles, speeds, accelerations, center of mass.
//!
//! All functions are pure. Positions are landmarks; angles use normalized
//! coordinates, speeds use pixel coordinates.

use shotform_pose_model::{CenterOfMass, Joint, Landmark, LandmarkMap};

const ANGLE_EPSILON: f64 = 1e-6;

/// Angle in degrees at the vertex `p2` formed by `p1` and `p3`.
///
/// Returns `None` when any point is missing. The result is in `[0, 180]`.
pub fn angle(p1: Option<&Landmark>, p2: Option<&Landmark>, p3: Option<&Landmark>) -> Option<f64> {
    let (p1, p2, p3) = (p1?, p2?, p3?);

    let v1 = (p1.x - p2.x, p1.y - p2.y);
    let v2 = (p3.x - p2.x, p3.y - p2.y);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let norms = v1.0.hypot(v1.1) * v2.0.hypot(v2.1);
    let cos = (dot / (norms + ANGLE_EPSILON)).clamp(-1.0, 1.0);

    Some(cos.acos().to_degrees())
}

/// Per-frame speed in pixels per second.
///
/// The first sample is 0, as is any sample whose neighbour on either side is
/// missing. The result is smoothed with [`smooth`].
pub fn velocity(positions: &[Option<&Landmark>], fps: f64, window: usize) -> Vec<f64> {
    if positions.len() < 2 {
        return vec![0.0; positions.len()];
    }

    let mut speeds = Vec::with_capacity(positions.len());
    speeds.push(0.0);
    speeds.extend(positions.windows(2).map(|pair| match (pair[0], pair[1]) {
        (Some(prev), Some(curr)) => curr.pixel_distance(prev) * fps,
        _ => 0.0,
    }));

    smooth(&speeds, window)
}

/// Per-frame change in speed, in pixels per second squared.
pub fn acceleration(velocities: &[f64], fps: f64) -> Vec<f64> {
    if velocities.len() < 2 {
        return vec![0.0; velocities.len()];
    }

    let mut accel = Vec::with_capacity(velocities.len());
    accel.push(0.0);
    accel.extend(velocities.windows(2).map(|w| (w[1] - w[0]) * fps));
    accel
}

/// Centered moving average with half-width `window / 2`, shrinking at the
/// edges. Returns the input unchanged when `window < 2` or the series is
/// shorter than the window.
pub fn smooth(series: &[f64], window: usize) -> Vec<f64> {
    if window < 2 || series.len() < window {
        return series.to_vec();
    }

    let half = window / 2;
    (0..series.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(series.len());
            let slice = &series[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Hip midpoint. Requires both hips.
pub fn center_of_mass(landmarks: &LandmarkMap) -> Option<CenterOfMass> {
    let left = landmarks.get(Joint::LeftHip.name())?;
    let right = landmarks.get(Joint::RightHip.name())?;

    Some(CenterOfMass {
        x: (left.x + right.x) / 2.0,
        y: (left.y + right.y) / 2.0,
        x_pixel: (left.x_pixel + right.x_pixel).div_euclid(2),
        y_pixel: (left.y_pixel + right.y_pixel).div_euclid(2),
    })
}

/// Forearm angle above horizontal in degrees (elbow to wrist).
///
/// The shoulder is not used in the computation but must be present.
pub fn shooting_arc(
    shoulder: Option<&Landmark>,
    elbow: Option<&Landmark>,
    wrist: Option<&Landmark>,
) -> Option<f64> {
    let (_, elbow, wrist) = (shoulder?, elbow?, wrist?);
    let dx = wrist.x - elbow.x;
    let dy = wrist.y - elbow.y;
    // Image y grows downward.
    Some((-dy).atan2(dx).to_degrees())
}

/// Indices of strict local maxima above `threshold`. Endpoints never qualify.
pub fn peaks(series: &[f64], threshold: f64) -> Vec<usize> {
    (1..series.len().saturating_sub(1))
        .filter(|&i| {
            series[i] > series[i - 1] && series[i] > series[i + 1] && series[i] > threshold
        })
        .collect()
}

/// Indices of strict local minima below `threshold`. Endpoints never qualify.
pub fn valleys(series: &[f64], threshold: f64) -> Vec<usize> {
    (1..series.len().saturating_sub(1))
        .filter(|&i| {
            series[i] < series[i - 1] && series[i] < series[i + 1] && series[i] < threshold
        })
        .collect()
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax(series: &[f64]) -> Option<usize> {
    argmax_by(series.iter().copied().enumerate())
}

/// Index of the smallest value; the first one wins on ties.
pub fn argmin(series: &[f64]) -> Option<usize> {
    argmin_by(series.iter().copied().enumerate())
}

/// First `(index, value)` pair with the largest value.
pub fn argmax_by(items: impl IntoIterator<Item = (usize, f64)>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in items {
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// First `(index, value)` pair with the smallest value.
pub fn argmin_by(items: impl IntoIterator<Item = (usize, f64)>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in items {
        if best.map_or(true, |(_, b)| v < b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lm(x: f64, y: f64) -> Landmark {
        Landmark::from_normalized(x, y, 1000, 1000)
    }

    #[test]
    fn test_angle_straight_and_folded() {
        let straight = angle(Some(&lm(0.0, 0.5)), Some(&lm(0.5, 0.5)), Some(&lm(1.0, 0.5))).unwrap();
        assert!((straight - 180.0).abs() < 0.5);

        let folded = angle(Some(&lm(1.0, 0.5)), Some(&lm(0.5, 0.5)), Some(&lm(1.0, 0.5))).unwrap();
        assert!(folded.abs() < 0.5);

        let right = angle(Some(&lm(0.5, 0.0)), Some(&lm(0.5, 0.5)), Some(&lm(1.0, 0.5))).unwrap();
        assert!((right - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_missing_point() {
        assert!(angle(None, Some(&lm(0.5, 0.5)), Some(&lm(1.0, 0.5))).is_none());
    }

    #[test]
    fn test_velocity_missing_sample_is_zero() {
        let a = lm(0.0, 0.0);
        let b = lm(0.003, 0.004);
        let positions = vec![Some(&a), Some(&b), None, Some(&a)];
        let v = velocity(&positions, 10.0, 1);
        assert_eq!(v, vec![0.0, 50.0, 0.0, 0.0]);
    }

    #[test]
    fn test_smooth_shrinks_at_edges() {
        let smoothed = smooth(&[0.0, 3.0, 6.0, 9.0], 3);
        assert_eq!(smoothed, vec![1.5, 3.0, 6.0, 7.5]);
        assert_eq!(smooth(&[1.0, 2.0], 3), vec![1.0, 2.0]);
    }

    #[test]
    fn test_acceleration() {
        assert_eq!(acceleration(&[0.0, 10.0, 5.0], 30.0), vec![0.0, 300.0, -150.0]);
        assert_eq!(acceleration(&[4.0], 30.0), vec![0.0]);
    }

    #[test]
    fn test_center_of_mass_floors_pixels() {
        let mut landmarks = LandmarkMap::new();
        landmarks.insert("left_hip".into(), lm(0.4, 0.6));
        let mut right = lm(0.5, 0.6);
        right.x_pixel = 501;
        landmarks.insert("right_hip".into(), right);

        let com = center_of_mass(&landmarks).unwrap();
        assert!((com.x - 0.45).abs() < 1e-9);
        assert_eq!(com.x_pixel, 450);

        landmarks.remove("left_hip");
        assert!(center_of_mass(&landmarks).is_none());
    }

    #[test]
    fn test_shooting_arc_points_up() {
        let arc = shooting_arc(Some(&lm(0.5, 0.5)), Some(&lm(0.5, 0.4)), Some(&lm(0.5, 0.2))).unwrap();
        assert!((arc - 90.0).abs() < 1e-9);
        assert!(shooting_arc(None, Some(&lm(0.5, 0.4)), Some(&lm(0.5, 0.2))).is_none());
    }

    #[test]
    fn test_peaks_and_valleys() {
        let series = [0.0, 2.0, 1.0, 1.0, 3.0, 0.5, 4.0];
        assert_eq!(peaks(&series, 0.0), vec![1, 4]);
        assert_eq!(peaks(&series, 2.5), vec![4]);
        assert_eq!(valleys(&series, f64::INFINITY), vec![5]);
    }

    #[test]
    fn test_arg_extremes_take_first() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), Some(1));
        assert_eq!(argmin(&[2.0, 1.0, 1.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    proptest! {
        #[test]
        fn prop_angle_in_range(
            ax in 0.0f64..1.0, ay in 0.0f64..1.0,
            bx in 0.0f64..1.0, by in 0.0f64..1.0,
            cx in 0.0f64..1.0, cy in 0.0f64..1.0,
        ) {
            let a = angle(Some(&lm(ax, ay)), Some(&lm(bx, by)), Some(&lm(cx, cy))).unwrap();
            prop_assert!((0.0..=180.0).contains(&a));
        }

        #[test]
        fn prop_constant_position_has_no_motion(
            x in 0.0f64..1.0,
            y in 0.0f64..1.0,
            len in 0usize..40,
            window in 0usize..7,
        ) {
            let point = lm(x, y);
            let positions = vec![Some(&point); len];
            let v = velocity(&positions, 30.0, window);
            let a = acceleration(&v, 30.0);
            prop_assert_eq!(v.len(), len);
            prop_assert!(v.iter().all(|s| *s == 0.0));
            prop_assert!(a.iter().all(|s| *s == 0.0));
        }
    }
}
