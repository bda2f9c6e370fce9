use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};
use glam::{Quat, Vec3};

use crate::network::SPHERE_RADIUS;

pub(super) const CAMERA_DISTANCE: f32 = 6.0;
const FIELD_OF_VIEW_DEGREES: f32 = 50.0;
const NEAR_PLANE: f32 = 0.1;
const ORBIT_SENSITIVITY: f32 = 0.008;
const PITCH_LIMIT: f32 = 1.45;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(super) struct OrbitCamera {
    pub(super) yaw: f32,
    pub(super) pitch: f32,
}

impl OrbitCamera {
    pub(super) fn orbit(&mut self, drag: Vec2) {
        self.yaw += drag.x * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch + drag.y * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    fn view_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ScreenPoint {
    pub(super) pos: Pos2,
    pub(super) depth: f32,
    pub(super) pixels_per_unit: f32,
}

pub(super) fn world_to_screen(rect: Rect, camera: &OrbitCamera, world: Vec3) -> Option<ScreenPoint> {
    let view = camera.view_rotation() * world;
    let depth = CAMERA_DISTANCE - view.z;
    if depth <= NEAR_PLANE {
        return None;
    }

    let focal = (rect.height().min(rect.width()) * 0.5)
        / (FIELD_OF_VIEW_DEGREES.to_radians() * 0.5).tan();
    let pixels_per_unit = focal / depth;
    Some(ScreenPoint {
        pos: rect.center() + vec2(view.x * pixels_per_unit, -view.y * pixels_per_unit),
        depth,
        pixels_per_unit,
    })
}

/// Cheap stand-in for the two colored point lights: nearer is brighter.
pub(super) fn depth_shade(depth: f32) -> f32 {
    let nearest = CAMERA_DISTANCE - SPHERE_RADIUS * 1.3;
    (1.0 - (depth - nearest) * 0.12).clamp(0.55, 1.0)
}

pub(super) fn accent_color(accent: [u8; 3], brightness: f32, opacity: f32) -> Color32 {
    let brightness = brightness.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (accent[0] as f32 * brightness) as u8,
        (accent[1] as f32 * brightness) as u8,
        (accent[2] as f32 * brightness) as u8,
        (opacity.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, accent: [u8; 3]) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(10, 13, 18));

    let ring = Stroke::new(1.0, accent_color(accent, 0.35, 0.06));
    let radius = rect.height().min(rect.width()) * 0.42;
    painter.circle_stroke(rect.center(), radius, ring);
    painter.circle_stroke(rect.center(), radius * 0.62, ring);
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}
