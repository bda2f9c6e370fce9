use glam::Vec3;

use super::super::NodeId;
use super::ForceParams;

pub(super) fn repulsion_between(point_a: Vec3, point_b: Vec3, params: &ForceParams) -> Vec3 {
    let delta = point_a - point_b;
    let distance = delta.length().max(params.min_distance);
    if distance >= params.repulsion_cutoff {
        return Vec3::ZERO;
    }

    delta.normalize_or_zero() * (params.repulsion / (distance * distance))
}

/// Hookean: pulls when stretched past the rest length, pushes when compressed.
pub(super) fn spring_pull(point: Vec3, neighbor: Vec3, params: &ForceParams) -> Vec3 {
    let delta = neighbor - point;
    let stretch = delta.length() - params.rest_length;
    delta.normalize_or_zero() * (stretch * params.spring_strength)
}

pub(super) fn centering_pull(point: Vec3, base: Vec3, strength: f32) -> Vec3 {
    (base - point) * strength
}

pub(super) fn drift_noise(elapsed: f32, id: NodeId, strength: f32) -> Vec3 {
    let phase = id as f32;
    Vec3::new(
        (elapsed * 2.0 + phase).sin(),
        (elapsed * 1.5 + phase).cos(),
        (elapsed * 2.5 + phase).sin(),
    ) * strength
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repulsion_vanishes_past_cutoff() {
        let params = ForceParams::default();
        let far = repulsion_between(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &params);
        let edge = repulsion_between(Vec3::ZERO, Vec3::new(0.0, 2.5, 0.0), &params);

        assert_eq!(far, Vec3::ZERO);
        assert_eq!(edge, Vec3::ZERO);
    }

    #[test]
    fn repulsion_pushes_away_with_inverse_square() {
        let params = ForceParams::default();
        let push = repulsion_between(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, &params);

        assert!((push.x - 0.6).abs() < 1e-6);
        assert_eq!(push.y, 0.0);
        assert_eq!(push.z, 0.0);
    }

    #[test]
    fn repulsion_distance_is_floored() {
        let params = ForceParams::default();
        let close = repulsion_between(Vec3::new(0.01, 0.0, 0.0), Vec3::ZERO, &params);
        let coincident = repulsion_between(Vec3::ONE, Vec3::ONE, &params);

        assert!((close.length() - 60.0).abs() < 1e-3);
        assert_eq!(coincident, Vec3::ZERO);
    }

    #[test]
    fn spring_pulls_when_stretched_and_pushes_when_compressed() {
        let params = ForceParams::default();
        let stretched = spring_pull(Vec3::ZERO, Vec3::new(2.2, 0.0, 0.0), &params);
        let compressed = spring_pull(Vec3::ZERO, Vec3::new(0.2, 0.0, 0.0), &params);
        let resting = spring_pull(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.2), &params);

        assert!((stretched.x - 0.04).abs() < 1e-6);
        assert!((compressed.x + 0.04).abs() < 1e-6);
        assert!(resting.length() < 1e-6);
    }

    #[test]
    fn centering_points_home() {
        let pull = centering_pull(Vec3::new(3.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.5);
        assert_eq!(pull, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn noise_differs_between_nodes_and_respects_strength() {
        let first = drift_noise(1.25, 1, 0.025);
        let second = drift_noise(1.25, 2, 0.025);

        assert_ne!(first, second);
        assert!(first.abs().max_element() <= 0.025);
        assert_eq!(drift_noise(1.25, 1, 0.0), Vec3::ZERO);
    }
}
