use std::collections::VecDeque;

use eframe::egui::{Color32, Context, Pos2};
use tracing::info;

use crate::config::{PerformanceTier, SceneConfig};
use crate::network::projector::{Projector, ProjectorSettings};
use crate::network::{ForceParams, FrameClock, Simulation};

mod graph;
mod render_utils;
mod ui;

use render_utils::OrbitCamera;

pub struct NetworkApp {
    scene: SceneModel,
}

struct SceneModel {
    simulation: Simulation,
    projector: Projector,
    tier: PerformanceTier,
    satellites: usize,
    visible_satellites: usize,
    accent: [u8; 3],
    forces: ForceParams,
    camera: OrbitCamera,
    topology_dirty: bool,
    visibility_dirty: bool,
    mounted_at: Option<f64>,
    last_frame_at: Option<f64>,
    elapsed: f32,
    draw_scratch: DrawScratch,
    show_fps_bar: bool,
    fps_show_current: bool,
    fps_show_average: bool,
    fps_show_low: bool,
    fps_show_frame_time: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    drawn_line_count: usize,
}

#[derive(Default)]
struct DrawScratch {
    items: Vec<(f32, DrawItem)>,
}

enum DrawItem {
    Line {
        start: Pos2,
        end: Pos2,
        width: f32,
        color: Color32,
    },
    Sphere {
        center: Pos2,
        radius: f32,
        fill: Color32,
        halo: Option<(f32, Color32)>,
    },
}

impl NetworkApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: SceneConfig) -> Self {
        Self {
            scene: SceneModel::new(config),
        }
    }
}

impl SceneModel {
    fn new(config: SceneConfig) -> Self {
        let full_detail = config.tier.full_detail();
        let simulation = Simulation::new(
            config.satellites,
            config.seed,
            config.forces,
            full_detail,
        );
        let projector = Projector::new(ProjectorSettings {
            glow_trails: full_detail,
            halos: full_detail,
            pulse: full_detail,
            auto_rotate: config.auto_rotate,
            rotation_speed: config.rotation_speed,
        });

        info!(
            tier = config.tier.label(),
            satellites = config.satellites,
            edges = simulation.edges().len(),
            physics = simulation.physics_enabled(),
            "mounted network scene"
        );

        Self {
            simulation,
            projector,
            tier: config.tier,
            satellites: config.satellites,
            visible_satellites: config.satellites,
            accent: config.accent_color,
            forces: config.forces,
            camera: OrbitCamera::default(),
            topology_dirty: false,
            visibility_dirty: false,
            mounted_at: None,
            last_frame_at: None,
            elapsed: 0.0,
            draw_scratch: DrawScratch::default(),
            show_fps_bar: true,
            fps_show_current: true,
            fps_show_average: true,
            fps_show_low: false,
            fps_show_frame_time: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            drawn_line_count: 0,
        }
    }

    fn apply_visibility(&mut self) {
        let visible = self.visible_satellites.min(self.satellites);
        for id in 1..self.simulation.nodes().len() {
            let scale = if id <= visible { 1.0 } else { 0.0 };
            self.simulation.set_scale(id, scale);
        }
        self.visibility_dirty = false;
    }

    /// Applies pending configuration and advances physics for the frame that
    /// starts at `now` (seconds on the host clock).
    fn step(&mut self, now: f64) -> FrameClock {
        if self.topology_dirty {
            let all_visible =
                self.visible_satellites >= self.simulation.topology().satellite_count();
            self.simulation.rebuild(self.satellites);
            self.visible_satellites = if all_visible {
                self.satellites
            } else {
                self.visible_satellites.min(self.satellites)
            };
            self.visibility_dirty = true;
            self.topology_dirty = false;
        }
        if self.visibility_dirty {
            self.apply_visibility();
        }

        let mounted_at = *self.mounted_at.get_or_insert(now);
        let delta = self
            .last_frame_at
            .map(|last| (now - last) as f32)
            .unwrap_or(0.0);
        self.last_frame_at = Some(now);
        self.elapsed = (now - mounted_at) as f32;

        let clock = FrameClock {
            elapsed: self.elapsed,
            delta,
        };
        self.simulation.set_params(self.forces);
        self.simulation.advance(clock);
        clock
    }
}

impl eframe::App for NetworkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.scene.show(ctx);
    }
}

impl Drop for NetworkApp {
    fn drop(&mut self) {
        info!(
            nodes = self.scene.simulation.nodes().len(),
            trails = self.scene.projector.live_trails(),
            "tearing down network scene"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(tier: PerformanceTier, satellites: usize) -> SceneModel {
        SceneModel::new(SceneConfig {
            satellites,
            tier,
            auto_rotate: false,
            rotation_speed: 0.15,
            accent_color: [0, 255, 209],
            seed: Some(17),
            forces: ForceParams::default(),
        })
    }

    #[test]
    fn first_frame_starts_the_clock() {
        let mut scene = scene(PerformanceTier::High, 6);

        let first = scene.step(40.0);
        let second = scene.step(40.25);

        assert_eq!(first, FrameClock::default());
        assert_eq!(second.elapsed, 0.25);
        assert_eq!(second.delta, 0.25);
    }

    #[test]
    fn count_change_rebuilds_before_physics() {
        let mut scene = scene(PerformanceTier::High, 6);
        scene.step(0.0);
        scene.step(1.0 / 60.0);
        let generation = scene.simulation.generation();

        scene.satellites = 3;
        scene.topology_dirty = true;
        scene.step(2.0 / 60.0);

        assert!(scene.simulation.generation() > generation);
        assert_eq!(scene.simulation.nodes().len(), 4);
        assert_eq!(scene.visible_satellites, 3);
    }

    #[test]
    fn growing_a_fully_visible_network_shows_new_satellites() {
        let mut scene = scene(PerformanceTier::High, 6);
        scene.step(0.0);

        scene.satellites = 10;
        scene.topology_dirty = true;
        scene.step(1.0 / 60.0);

        let scales = scene
            .simulation
            .nodes()
            .iter()
            .map(|node| node.scale)
            .collect::<Vec<_>>();
        assert_eq!(scene.visible_satellites, 10);
        assert_eq!(scales, vec![1.0; 11]);
    }

    #[test]
    fn growing_keeps_a_partial_visibility_limit() {
        let mut scene = scene(PerformanceTier::High, 6);
        scene.visible_satellites = 4;
        scene.visibility_dirty = true;
        scene.step(0.0);

        scene.satellites = 10;
        scene.topology_dirty = true;
        scene.step(1.0 / 60.0);

        assert_eq!(scene.visible_satellites, 4);
        for node in scene.simulation.nodes() {
            let expected = if node.id <= 4 { 1.0 } else { 0.0 };
            assert_eq!(node.scale, expected, "node {}", node.id);
        }
    }

    #[test]
    fn hiding_satellites_zeroes_their_scale() {
        let mut scene = scene(PerformanceTier::High, 8);
        scene.visible_satellites = 5;
        scene.visibility_dirty = true;
        scene.step(0.0);

        for node in scene.simulation.nodes() {
            let expected = if node.id <= 5 { 1.0 } else { 0.0 };
            assert_eq!(node.scale, expected, "node {}", node.id);
        }
    }

    #[test]
    fn low_tier_scene_only_rotates() {
        let mut scene = scene(PerformanceTier::Low, 12);
        let before = scene.simulation.nodes().to_vec();

        for frame in 0..90 {
            scene.step(frame as f64 / 60.0);
        }

        assert!(!scene.simulation.physics_enabled());
        assert_eq!(scene.simulation.nodes(), before.as_slice());
        assert!(!scene.projector.settings().glow_trails);
    }
}
