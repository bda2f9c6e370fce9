use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::{Edge, Node, NodeId, Topology};

pub const SPHERE_RADIUS: f32 = 2.0;

const GOLDEN_RATIO: f32 = 1.618_034;
const NEAREST_LINKS: usize = 2;

fn fibonacci_sphere_point(index: usize, count: usize, radius: f32) -> Vec3 {
    let azimuth = (TAU * index as f32) / GOLDEN_RATIO;
    let polar = (1.0 - (2.0 * (index as f32 + 0.5)) / count as f32).acos();

    Vec3::new(
        radius * polar.sin() * azimuth.cos(),
        radius * polar.sin() * azimuth.sin(),
        radius * polar.cos(),
    )
}

fn make_node(id: NodeId, position: Vec3, size: f32, glow_speed: f32) -> Node {
    Node {
        id,
        base_position: position,
        current_position: position,
        size,
        connections: Vec::new(),
        glow_speed,
        scale: 1.0,
    }
}

/// Center node plus `satellites` nodes on a jittered sphere, each satellite
/// linked to the two closest nodes placed before it.
pub fn generate_topology<R: Rng + ?Sized>(
    satellites: usize,
    radius: f32,
    rng: &mut R,
) -> Topology {
    let mut nodes = Vec::with_capacity(satellites + 1);
    nodes.push(make_node(
        0,
        Vec3::ZERO,
        rng.gen_range(0.12_f32..0.18),
        rng.gen_range(1.0_f32..2.5),
    ));

    for index in 0..satellites {
        let shell = radius * rng.gen_range(0.95_f32..1.05);
        let position = fibonacci_sphere_point(index, satellites, shell);
        nodes.push(make_node(
            index + 1,
            position,
            rng.gen_range(0.06_f32..0.12),
            rng.gen_range(1.5_f32..4.0),
        ));
    }

    let mut edges = Vec::with_capacity((satellites * NEAREST_LINKS).saturating_sub(1));
    let mut nearest: Vec<(f32, NodeId)> = Vec::with_capacity(nodes.len());
    for id in 1..nodes.len() {
        let origin = nodes[id].base_position;
        nearest.clear();
        nearest.extend(
            nodes[..id]
                .iter()
                .map(|other| (origin.distance(other.base_position), other.id)),
        );
        nearest.sort_by(|a, b| a.0.total_cmp(&b.0));

        for &(_distance, target) in nearest.iter().take(NEAREST_LINKS) {
            nodes[id].connections.push(target);
            nodes[target].connections.push(id);
            edges.push(Edge {
                id: edges.len(),
                start: id,
                end: target,
                animation_offset: rng.gen_range(0.0_f32..10.0),
            });
        }
    }

    Topology::from_parts(nodes, edges)
}
