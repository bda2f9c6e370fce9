mod forces;

use std::collections::HashMap;

use glam::Vec3;
use serde::Deserialize;
use tracing::{debug, trace};

use super::{Node, NodeId};
use forces::{centering_pull, drift_noise, repulsion_between, spring_pull};

pub const MAX_FRAME_DELTA: f32 = 0.1;
pub const ACTIVE_SCALE_THRESHOLD: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForceParams {
    pub repulsion: f32,
    pub repulsion_cutoff: f32,
    pub min_distance: f32,
    pub spring_strength: f32,
    pub rest_length: f32,
    pub centering: f32,
    pub noise_strength: f32,
    pub damping: f32,
    pub position_scale: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            repulsion: 0.6,
            repulsion_cutoff: 2.5,
            min_distance: 0.1,
            spring_strength: 0.04,
            rest_length: 1.2,
            centering: 0.015,
            noise_strength: 0.025,
            damping: 0.94,
            position_scale: 10.0,
        }
    }
}

impl ForceParams {
    /// First parameter the integrator cannot run with, as `(name, value)`.
    pub fn first_invalid(&self) -> Option<(&'static str, f32)> {
        let non_negative = [
            ("repulsion", self.repulsion),
            ("repulsion_cutoff", self.repulsion_cutoff),
            ("spring_strength", self.spring_strength),
            ("rest_length", self.rest_length),
            ("centering", self.centering),
            ("noise_strength", self.noise_strength),
            ("position_scale", self.position_scale),
        ];
        if let Some(bad) = non_negative
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Some(bad);
        }
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return Some(("min_distance", self.min_distance));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Some(("damping", self.damping));
        }
        None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    pub elapsed: f32,
    pub delta: f32,
}

pub fn clamp_frame_delta(delta: f32) -> f32 {
    if !delta.is_finite() {
        return 0.0;
    }
    delta.clamp(0.0, MAX_FRAME_DELTA)
}

pub fn is_active(node: &Node) -> bool {
    node.scale > ACTIVE_SCALE_THRESHOLD
}

#[derive(Debug, Default)]
pub(super) struct Velocities {
    by_id: HashMap<NodeId, Vec3>,
}

impl Velocities {
    #[cfg(test)]
    pub(super) fn get(&self, id: NodeId) -> Vec3 {
        self.by_id.get(&id).copied().unwrap_or(Vec3::ZERO)
    }

    fn entry(&mut self, id: NodeId) -> &mut Vec3 {
        self.by_id.entry(id).or_insert(Vec3::ZERO)
    }

    pub(super) fn clear(&mut self) {
        self.by_id.clear();
    }
}

#[derive(Debug, Default)]
pub(super) struct PhysicsScratch {
    positions: Vec<Vec3>,
    active: Vec<usize>,
}

pub(super) fn step_physics(
    nodes: &mut [Node],
    velocities: &mut Velocities,
    scratch: &mut PhysicsScratch,
    params: &ForceParams,
    clock: FrameClock,
) -> bool {
    let delta = clamp_frame_delta(clock.delta);
    if clock.delta > MAX_FRAME_DELTA {
        debug!(
            requested = clock.delta,
            applied = delta,
            "clamped oversized frame delta"
        );
    }

    scratch.positions.clear();
    scratch
        .positions
        .extend(nodes.iter().map(|node| node.current_position));
    scratch.active.clear();
    scratch.active.extend(
        nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| is_active(node))
            .map(|(index, _)| index),
    );

    let positions = &scratch.positions;
    let active = &scratch.active;

    for &index in active {
        let node = &nodes[index];
        let point = positions[index];
        let mut change = Vec3::ZERO;

        for &other in active {
            if other == index {
                continue;
            }
            change += repulsion_between(point, positions[other], params) * delta;
        }

        for &neighbor in &node.connections {
            let Some(other) = nodes.get(neighbor) else {
                continue;
            };
            if !is_active(other) {
                continue;
            }
            change += spring_pull(point, positions[neighbor], params) * delta;
        }

        change += centering_pull(point, node.base_position, params.centering) * delta;
        change += drift_noise(clock.elapsed, node.id, params.noise_strength);

        *velocities.entry(node.id) += change;
    }

    let step_scale = delta * params.position_scale;
    let mut any_motion = false;
    for &index in active {
        let velocity = velocities.entry(nodes[index].id);
        *velocity *= params.damping;
        let offset = *velocity * step_scale;
        if offset != Vec3::ZERO {
            any_motion = true;
        }
        nodes[index].current_position += offset;
    }

    trace!(active = active.len(), delta, any_motion, "physics step");
    any_motion
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId, position: Vec3, connections: &[NodeId]) -> Node {
        Node {
            id,
            base_position: position,
            current_position: position,
            size: 0.1,
            connections: connections.to_vec(),
            glow_speed: 2.0,
            scale: 1.0,
        }
    }

    fn frozen_params() -> ForceParams {
        ForceParams {
            repulsion: 0.0,
            spring_strength: 0.0,
            centering: 0.0,
            noise_strength: 0.0,
            ..ForceParams::default()
        }
    }

    fn step(nodes: &mut [Node], velocities: &mut Velocities, params: &ForceParams, delta: f32) {
        let mut scratch = PhysicsScratch::default();
        step_physics(
            nodes,
            velocities,
            &mut scratch,
            params,
            FrameClock {
                elapsed: 0.5,
                delta,
            },
        );
    }

    #[test]
    fn distant_unlinked_nodes_feel_nothing() {
        let params = ForceParams {
            noise_strength: 0.0,
            ..ForceParams::default()
        };
        let mut nodes = vec![
            node(0, Vec3::ZERO, &[]),
            node(1, Vec3::new(10.0, 0.0, 0.0), &[]),
        ];
        let mut velocities = Velocities::default();

        step(&mut nodes, &mut velocities, &params, 1.0 / 60.0);

        assert_eq!(velocities.get(0), Vec3::ZERO);
        assert_eq!(velocities.get(1), Vec3::ZERO);
        assert_eq!(nodes[1].current_position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn damping_shrinks_free_velocity() {
        let params = frozen_params();
        let mut nodes = vec![node(0, Vec3::ZERO, &[])];
        let mut velocities = Velocities::default();
        *velocities.entry(0) = Vec3::new(0.3, -0.4, 1.2);

        for _ in 0..5 {
            let before = velocities.get(0).length();
            step(&mut nodes, &mut velocities, &params, 1.0 / 60.0);
            let after = velocities.get(0).length();
            assert!(after < before);
            assert!((after - before * 0.94).abs() < 1e-6);
        }
    }

    #[test]
    fn oversized_delta_is_clamped() {
        let params = ForceParams::default();
        let layout = || {
            vec![
                node(0, Vec3::ZERO, &[1]),
                node(1, Vec3::new(0.7, 0.2, 0.0), &[0]),
            ]
        };

        let mut stalled = layout();
        let mut stalled_velocities = Velocities::default();
        step(&mut stalled, &mut stalled_velocities, &params, 5.0);

        let mut capped = layout();
        let mut capped_velocities = Velocities::default();
        step(&mut capped, &mut capped_velocities, &params, MAX_FRAME_DELTA);

        assert_eq!(stalled, capped);
        assert_eq!(stalled_velocities.get(1), capped_velocities.get(1));
    }

    #[test]
    fn defaults_are_valid_and_bad_values_are_named() {
        assert_eq!(ForceParams::default().first_invalid(), None);

        let params = ForceParams {
            damping: 1.5,
            ..ForceParams::default()
        };
        assert_eq!(params.first_invalid(), Some(("damping", 1.5)));

        let params = ForceParams {
            min_distance: 0.0,
            ..ForceParams::default()
        };
        assert_eq!(params.first_invalid(), Some(("min_distance", 0.0)));

        let params = ForceParams {
            spring_strength: -0.1,
            ..ForceParams::default()
        };
        assert_eq!(params.first_invalid(), Some(("spring_strength", -0.1)));
    }

    #[test]
    fn clamp_handles_odd_deltas() {
        assert_eq!(clamp_frame_delta(5.0), MAX_FRAME_DELTA);
        assert_eq!(clamp_frame_delta(0.016), 0.016);
        assert_eq!(clamp_frame_delta(-1.0), 0.0);
        assert_eq!(clamp_frame_delta(f32::NAN), 0.0);
        assert_eq!(clamp_frame_delta(f32::INFINITY), 0.0);
    }

    #[test]
    fn inactive_nodes_exert_no_force() {
        let params = ForceParams::default();

        let mut hidden = node(2, Vec3::new(0.3, 0.4, 0.0), &[0]);
        hidden.scale = 0.0;
        let mut with_hidden = vec![
            node(0, Vec3::ZERO, &[1, 2]),
            node(1, Vec3::new(1.0, 0.0, 0.0), &[0]),
            hidden,
        ];
        let mut with_hidden_velocities = Velocities::default();
        step(
            &mut with_hidden,
            &mut with_hidden_velocities,
            &params,
            1.0 / 60.0,
        );

        let mut without = vec![
            node(0, Vec3::ZERO, &[1]),
            node(1, Vec3::new(1.0, 0.0, 0.0), &[0]),
        ];
        let mut without_velocities = Velocities::default();
        step(&mut without, &mut without_velocities, &params, 1.0 / 60.0);

        assert_eq!(with_hidden_velocities.get(0), without_velocities.get(0));
        assert_eq!(with_hidden_velocities.get(1), without_velocities.get(1));
        assert_eq!(with_hidden[0].current_position, without[0].current_position);
        assert_eq!(with_hidden[2].current_position, Vec3::new(0.3, 0.4, 0.0));
        assert!(!with_hidden_velocities.by_id.contains_key(&2));
    }

    #[test]
    fn threshold_scale_counts_as_inactive() {
        let mut faded = node(0, Vec3::ZERO, &[]);
        faded.scale = ACTIVE_SCALE_THRESHOLD;
        assert!(!is_active(&faded));
        faded.scale = 0.02;
        assert!(is_active(&faded));
    }

    #[test]
    fn forces_read_a_single_snapshot() {
        let params = ForceParams {
            noise_strength: 0.0,
            ..ForceParams::default()
        };
        let forward = vec![
            node(0, Vec3::new(-0.5, 0.0, 0.0), &[1]),
            node(1, Vec3::new(0.5, 0.0, 0.0), &[0]),
        ];
        let mut nodes = forward.clone();
        let mut velocities = Velocities::default();
        step(&mut nodes, &mut velocities, &params, 1.0 / 60.0);

        let left = velocities.get(0);
        let right = velocities.get(1);
        assert!((left + right).length() < 1e-6);
        assert!(left.x < 0.0 && right.x > 0.0);
        assert!(
            (nodes[0].current_position.x + nodes[1].current_position.x).abs() < 1e-6
        );
    }
}
