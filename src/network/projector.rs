//! Turns simulation state into draw primitives. Never writes back into the
//! simulation; the only state kept here is presentation state (displayed
//! scales and per-edge trail buffers).

use glam::{Quat, Vec3};
use tracing::debug;

use super::Simulation;

pub const HALO_OPACITY: f32 = 0.15;

const SCALE_SMOOTHING: f32 = 0.1;
const SCALE_SNAP: f32 = 0.001;
const BASE_LINE_OPACITY: f32 = 0.25;
const HALO_SIZE: f32 = 1.5;

const TRAIL_SEGMENTS: usize = 11;
const TRAIL_CENTER: usize = TRAIL_SEGMENTS / 2;
const TRAIL_SPEED: f32 = 0.4;
const TRAIL_FADE_RATE: f32 = 5.0;
const TRAIL_LAYER_SPACING: f32 = 0.015;
const TRAIL_HALF_LENGTH: f32 = 0.025;
const TRAIL_FALLOFF: f32 = 2.5;
const TRAIL_PEAK_OPACITY: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectorSettings {
    pub glow_trails: bool,
    pub halos: bool,
    pub pulse: bool,
    pub auto_rotate: bool,
    pub rotation_speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereDraw {
    pub center: Vec3,
    pub radius: f32,
    pub emissive: f32,
    pub halo_radius: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Base,
    Glow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineDraw {
    pub start: Vec3,
    pub end: Vec3,
    pub opacity: f32,
    pub kind: LineKind,
}

#[derive(Debug, Default)]
pub struct FrameDraw {
    pub spheres: Vec<SphereDraw>,
    pub lines: Vec<LineDraw>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TrailSegment {
    from: f32,
    to: f32,
    opacity: f32,
}

#[derive(Debug)]
struct EdgeTrail {
    segments: Vec<TrailSegment>,
}

impl EdgeTrail {
    fn new(animated: bool) -> Self {
        let capacity = if animated { TRAIL_SEGMENTS } else { 0 };
        Self {
            segments: Vec::with_capacity(capacity),
        }
    }

    fn update(&mut self, elapsed: f32, offset: f32, connection_opacity: f32) {
        let progress = trail_progress(elapsed, offset);
        let envelope = trail_envelope(progress);

        self.segments.clear();
        for index in 0..TRAIL_SEGMENTS {
            let layer = index as f32 - TRAIL_CENTER as f32;
            let center = progress + layer * TRAIL_LAYER_SPACING;
            self.segments.push(TrailSegment {
                from: (center - TRAIL_HALF_LENGTH).clamp(0.0, 1.0),
                to: (center + TRAIL_HALF_LENGTH).clamp(0.0, 1.0),
                opacity: envelope
                    * trail_falloff(index)
                    * TRAIL_PEAK_OPACITY
                    * connection_opacity,
            });
        }
    }
}

pub fn rotation_angle(elapsed: f32, auto_rotate: bool, speed: f32) -> f32 {
    if auto_rotate { elapsed * speed } else { 0.0 }
}

pub fn smooth_scale(current: f32, target: f32) -> f32 {
    let gap = target - current;
    if gap.abs() > SCALE_SNAP {
        current + gap * SCALE_SMOOTHING
    } else {
        target
    }
}

pub fn pulse_intensity(elapsed: f32, glow_speed: f32) -> f32 {
    let glow = 0.5 + (elapsed * glow_speed).sin() * 0.5;
    0.8 + glow * 0.4
}

pub fn trail_progress(elapsed: f32, offset: f32) -> f32 {
    (elapsed * TRAIL_SPEED + offset).rem_euclid(1.0)
}

pub fn trail_envelope(progress: f32) -> f32 {
    let fade_in = (progress * TRAIL_FADE_RATE).min(1.0);
    let fade_out = ((1.0 - progress) * TRAIL_FADE_RATE).min(1.0);
    fade_in.min(fade_out)
}

fn trail_falloff(index: usize) -> f32 {
    let distance = index.abs_diff(TRAIL_CENTER) as f32 / TRAIL_CENTER as f32;
    (1.0 - distance).powf(TRAIL_FALLOFF)
}

pub struct Projector {
    settings: ProjectorSettings,
    generation: Option<u64>,
    displayed_scales: Vec<f32>,
    trails: Vec<EdgeTrail>,
    frame: FrameDraw,
}

impl Projector {
    pub fn new(settings: ProjectorSettings) -> Self {
        Self {
            settings,
            generation: None,
            displayed_scales: Vec::new(),
            trails: Vec::new(),
            frame: FrameDraw::default(),
        }
    }

    #[cfg(test)]
    pub fn settings(&self) -> &ProjectorSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ProjectorSettings {
        &mut self.settings
    }

    #[cfg(test)]
    pub fn displayed_scale(&self, id: super::NodeId) -> Option<f32> {
        self.displayed_scales.get(id).copied()
    }

    pub fn live_trails(&self) -> usize {
        self.trails.len()
    }

    fn sync(&mut self, simulation: &Simulation) {
        let generation = simulation.generation();
        if self.generation == Some(generation) {
            return;
        }

        if !self.trails.is_empty() {
            debug!(
                released = self.trails.len(),
                "released edge trails of previous topology"
            );
        }
        let animated = self.settings.glow_trails;
        self.trails = simulation
            .edges()
            .iter()
            .map(|_| EdgeTrail::new(animated))
            .collect();
        self.displayed_scales.clear();
        self.displayed_scales.resize(simulation.nodes().len(), 0.0);
        self.generation = Some(generation);
    }

    pub fn project(&mut self, simulation: &Simulation, elapsed: f32) -> &FrameDraw {
        self.sync(simulation);

        let settings = self.settings;
        let angle = rotation_angle(elapsed, settings.auto_rotate, settings.rotation_speed);
        let rotation = Quat::from_rotation_y(angle);
        let nodes = simulation.nodes();

        let frame = &mut self.frame;
        frame.spheres.clear();
        frame.lines.clear();

        for (node, displayed) in nodes.iter().zip(self.displayed_scales.iter_mut()) {
            *displayed = smooth_scale(*displayed, node.scale);
            let emissive = if settings.pulse {
                pulse_intensity(elapsed, node.glow_speed)
            } else {
                1.0
            };

            frame.spheres.push(SphereDraw {
                center: rotation * node.current_position,
                radius: node.size * *displayed,
                emissive,
                halo_radius: settings
                    .halos
                    .then_some(node.size * HALO_SIZE * *displayed),
            });
        }

        for (edge, trail) in simulation.edges().iter().zip(self.trails.iter_mut()) {
            let (Some(start), Some(end)) = (nodes.get(edge.start), nodes.get(edge.end)) else {
                continue;
            };

            let connection_opacity = start.scale.min(end.scale);
            let from = rotation * start.current_position;
            let to = rotation * end.current_position;
            frame.lines.push(LineDraw {
                start: from,
                end: to,
                opacity: BASE_LINE_OPACITY * connection_opacity,
                kind: LineKind::Base,
            });

            if !settings.glow_trails {
                continue;
            }

            trail.update(elapsed, edge.animation_offset, connection_opacity);
            for segment in &trail.segments {
                frame.lines.push(LineDraw {
                    start: from.lerp(to, segment.from),
                    end: from.lerp(to, segment.to),
                    opacity: segment.opacity,
                    kind: LineKind::Glow,
                });
            }
        }

        &self.frame
    }
}
