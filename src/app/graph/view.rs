use eframe::egui::{Color32, Sense, Stroke, Ui, vec2};
use tracing::trace;

use crate::network::projector::{FrameDraw, HALO_OPACITY, LineKind};

use super::super::render_utils::{
    OrbitCamera, accent_color, blend_color, circle_visible, depth_shade, draw_background,
    world_to_screen,
};
use super::super::{DrawItem, DrawScratch, SceneModel};

const BASE_LINE_WIDTH: f32 = 1.0;
const GLOW_LINE_WIDTH: f32 = 2.2;
const MIN_VISIBLE_ALPHA: f32 = 0.004;

fn collect_draw_items(
    frame: &FrameDraw,
    rect: eframe::egui::Rect,
    camera: &OrbitCamera,
    accent: [u8; 3],
    scratch: &mut DrawScratch,
) -> usize {
    scratch.items.clear();
    scratch.items.reserve(frame.lines.len() + frame.spheres.len());

    let mut line_count = 0usize;
    for line in &frame.lines {
        if line.opacity < MIN_VISIBLE_ALPHA {
            continue;
        }
        let (Some(start), Some(end)) = (
            world_to_screen(rect, camera, line.start),
            world_to_screen(rect, camera, line.end),
        ) else {
            continue;
        };

        let (width, color) = match line.kind {
            LineKind::Base => (BASE_LINE_WIDTH, accent_color(accent, 1.0, line.opacity)),
            LineKind::Glow => (
                GLOW_LINE_WIDTH,
                blend_color(
                    accent_color(accent, 1.0, line.opacity),
                    Color32::from_rgba_unmultiplied(255, 255, 255, (line.opacity * 255.0) as u8),
                    0.3,
                ),
            ),
        };

        scratch.items.push((
            (start.depth + end.depth) * 0.5,
            DrawItem::Line {
                start: start.pos,
                end: end.pos,
                width,
                color,
            },
        ));
        line_count += 1;
    }

    for sphere in &frame.spheres {
        let Some(center) = world_to_screen(rect, camera, sphere.center) else {
            continue;
        };
        let radius = sphere.radius * center.pixels_per_unit;
        if radius < 0.3 || !circle_visible(rect, center.pos, radius) {
            continue;
        }

        let lit = accent_color(accent, depth_shade(center.depth), 1.0);
        let fill = blend_color(lit, Color32::WHITE, (sphere.emissive - 0.8) * 0.6);
        let halo = sphere.halo_radius.map(|halo_radius| {
            (
                halo_radius * center.pixels_per_unit,
                accent_color(accent, 1.0, HALO_OPACITY),
            )
        });

        scratch.items.push((
            center.depth,
            DrawItem::Sphere {
                center: center.pos,
                radius,
                fill,
                halo,
            },
        ));
    }

    scratch.items.sort_by(|a, b| b.0.total_cmp(&a.0));
    line_count
}

impl SceneModel {
    pub(in crate::app) fn draw_scene(&mut self, ui: &mut Ui) {
        let now = ui.ctx().input(|input| input.time);
        let clock = self.step(now);

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.handle_orbit(ui, &response);

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, self.accent);

        let frame = self.projector.project(&self.simulation, clock.elapsed);
        self.drawn_line_count =
            collect_draw_items(frame, rect, &self.camera, self.accent, &mut self.draw_scratch);

        for (_depth, item) in &self.draw_scratch.items {
            match item {
                DrawItem::Line {
                    start,
                    end,
                    width,
                    color,
                } => {
                    painter.line_segment([*start, *end], Stroke::new(*width, *color));
                }
                DrawItem::Sphere {
                    center,
                    radius,
                    fill,
                    halo,
                } => {
                    if let Some((halo_radius, halo_color)) = halo {
                        painter.circle_filled(*center, *halo_radius, *halo_color);
                    }
                    painter.circle_filled(*center, *radius, *fill);
                    if *radius > 3.0 {
                        painter.circle_filled(
                            *center - vec2(*radius * 0.3, *radius * 0.3),
                            *radius * 0.35,
                            Color32::from_rgba_unmultiplied(255, 255, 255, 70),
                        );
                    }
                }
            }
        }

        trace!(
            elapsed = clock.elapsed,
            delta = clock.delta,
            items = self.draw_scratch.items.len(),
            "painted frame"
        );
        ui.ctx().request_repaint();
    }
}
