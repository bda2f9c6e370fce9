//! Animated node network: topology generation, force integration and the
//! read-only projection used for drawing.

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

mod build;
pub mod physics;
pub mod projector;

pub use build::{SPHERE_RADIUS, generate_topology};
pub use physics::{ForceParams, FrameClock};
use physics::{PhysicsScratch, Velocities, step_physics};

pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub base_position: Vec3,
    pub current_position: Vec3,
    pub size: f32,
    pub connections: Vec<NodeId>,
    pub glow_speed: f32,
    pub scale: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: usize,
    pub start: NodeId,
    pub end: NodeId,
    pub animation_offset: f32,
}

#[derive(Clone, Debug, Default)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    generation: u64,
}

impl Topology {
    pub(super) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            generation: 0,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn satellite_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Single owner of the node/edge set and the per-node velocities.
///
/// Readers get shared slices; only [`Simulation::advance`] moves nodes and
/// only [`Simulation::set_scale`] changes participation.
pub struct Simulation {
    topology: Topology,
    velocities: Velocities,
    scratch: PhysicsScratch,
    params: ForceParams,
    physics_enabled: bool,
    rng: StdRng,
    generations: u64,
}

impl Simulation {
    pub fn new(
        satellites: usize,
        seed: Option<u64>,
        params: ForceParams,
        physics_enabled: bool,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut simulation = Self {
            topology: Topology::default(),
            velocities: Velocities::default(),
            scratch: PhysicsScratch::default(),
            params,
            physics_enabled,
            rng,
            generations: 0,
        };
        simulation.rebuild(satellites);
        simulation
    }

    pub fn rebuild(&mut self, satellites: usize) {
        let next = generate_topology(satellites, SPHERE_RADIUS, &mut self.rng);
        self.publish(next);
        debug!(
            generation = self.topology.generation,
            nodes = self.topology.nodes.len(),
            edges = self.topology.edges.len(),
            "rebuilt network topology"
        );
    }

    fn publish(&mut self, mut next: Topology) {
        self.generations = self.generations.wrapping_add(1);
        next.generation = self.generations;
        self.velocities.clear();
        self.topology = next;
    }

    /// Runs one frame of physics. Returns whether any node moved.
    pub fn advance(&mut self, clock: FrameClock) -> bool {
        if !self.physics_enabled {
            return false;
        }

        step_physics(
            &mut self.topology.nodes,
            &mut self.velocities,
            &mut self.scratch,
            &self.params,
            clock,
        )
    }

    pub fn set_scale(&mut self, id: NodeId, scale: f32) -> bool {
        let Some(node) = self.topology.nodes.get_mut(id) else {
            return false;
        };

        node.scale = if scale.is_nan() {
            0.0
        } else {
            scale.clamp(0.0, 1.0)
        };
        true
    }

    #[cfg(test)]
    pub fn velocity(&self, id: NodeId) -> Vec3 {
        self.velocities.get(id)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn nodes(&self) -> &[Node] {
        self.topology.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.topology.edges()
    }

    pub fn generation(&self) -> u64 {
        self.topology.generation()
    }

    pub fn set_params(&mut self, params: ForceParams) {
        self.params = params;
    }

    pub fn physics_enabled(&self) -> bool {
        self.physics_enabled
    }
}
