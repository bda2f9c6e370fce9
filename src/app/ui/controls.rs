use std::ops::RangeInclusive;

use eframe::egui::{self, Key, Response, Ui};
use tracing::{debug, info};

use crate::config::{MAX_ROTATION_SPEED, MAX_SATELLITES};
use crate::network::ForceParams;
use crate::util::format_hex_color;

use super::super::SceneModel;

const KEY_BASE_RATE: f32 = 10.0;
const KEY_ACCEL_PER_SEC: f32 = 9.0;
const KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct KeyHold {
    secs: f32,
}

fn hold_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(KEY_ACCEL_MAX)
}

/// Arrow keys nudge a focused slider, faster the longer they are held.
/// Returns the signed amount to add this frame in slider units.
fn arrow_key_nudge(ui: &Ui, response: &Response, step: f32) -> f32 {
    let state_id = response.id.with("arrow_key_hold");
    let mut hold = ui
        .ctx()
        .data(|data| data.get_temp::<KeyHold>(state_id).unwrap_or_default());

    let (dt, up, down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });
    let direction = f32::from(u8::from(up)) - f32::from(u8::from(down));

    let nudge = if !response.has_focus() || direction == 0.0 {
        hold = KeyHold::default();
        0.0
    } else {
        hold.secs += dt;
        ui.ctx().request_repaint();
        direction * step * KEY_BASE_RATE * hold_multiplier(hold.secs) * dt
    };

    ui.ctx().data_mut(|data| data.insert_temp(state_id, hold));
    nudge
}

/// Applies an arrow-key nudge, clamping into the slider range only when the
/// nudge actually moves the value. Returns whether the value changed.
fn apply_nudge(value: &mut f32, nudge: f32, min: f32, max: f32) -> bool {
    if nudge == 0.0 {
        return false;
    }
    let before = *value;
    *value = (*value + nudge).clamp(min, max);
    (*value - before).abs() > f32::EPSILON
}

fn float_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    label: &str,
    hover: &str,
) -> bool {
    let (min, max) = (*range.start(), *range.end());
    let response = ui
        .add(
            egui::Slider::new(value, range)
                .text(label)
                .clamping(egui::SliderClamping::Edits),
        )
        .on_hover_text(hover);
    if response.hovered() {
        response.request_focus();
    }

    let nudge = arrow_key_nudge(ui, &response, ((max - min) / 200.0).max(0.0005));
    let nudged = apply_nudge(value, nudge, min, max);
    response.changed() || nudged
}

fn count_slider(ui: &mut Ui, value: &mut usize, max: usize, label: &str, hover: &str) -> bool {
    let response = ui
        .add(egui::Slider::new(value, 0..=max).text(label))
        .on_hover_text(hover);
    if response.hovered() {
        response.request_focus();
    }

    let state_id = response.id.with("count_carry");
    let mut carry = ui
        .ctx()
        .data(|data| data.get_temp::<f32>(state_id).unwrap_or_default());
    carry += arrow_key_nudge(ui, &response, 1.0);
    let whole = carry.trunc();
    carry -= whole;
    ui.ctx().data_mut(|data| data.insert_temp(state_id, carry));

    let before = *value;
    if whole != 0.0 {
        *value = (*value as f32 + whole).clamp(0.0, max as f32) as usize;
    }
    response.changed() || *value != before
}

impl SceneModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Network Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label(format!("Performance tier: {}", self.tier.label()))
            .on_hover_text("Chosen at startup from the window width and platform.");
        ui.separator();

        self.draw_topology_controls(ui);
        ui.separator();
        self.draw_motion_controls(ui);
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Accent color");
            if ui.color_edit_button_srgb(&mut self.accent).changed() {
                debug!(accent = %format_hex_color(self.accent), "accent color changed");
            }
            ui.monospace(format_hex_color(self.accent));
        });

        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show a live FPS readout in the header.");

        ui.collapsing("FPS Display tuning", |ui| {
            ui.add_enabled_ui(self.show_fps_bar, |ui| {
                ui.checkbox(&mut self.fps_show_current, "Show current FPS");
                ui.checkbox(&mut self.fps_show_average, "Show average FPS");
                ui.checkbox(&mut self.fps_show_low, "Show low FPS");
                ui.checkbox(&mut self.fps_show_frame_time, "Show frame time");
            });
        });

        ui.collapsing("Force tuning", |ui| {
            ui.add_enabled_ui(self.simulation.physics_enabled(), |ui| {
                self.draw_force_controls(ui);
            });
            if !self.simulation.physics_enabled() {
                ui.small("Physics is disabled on the low performance tier.");
            }
        });
    }

    fn draw_topology_controls(&mut self, ui: &mut Ui) {
        if count_slider(
            ui,
            &mut self.satellites,
            MAX_SATELLITES,
            "Satellites",
            "Number of nodes orbiting the central hub. Changing it regenerates the network.",
        ) {
            self.topology_dirty = true;
        }

        let visible_max = self.satellites;
        if count_slider(
            ui,
            &mut self.visible_satellites,
            visible_max,
            "Visible satellites",
            "Satellites above this id fade out and stop taking part in the physics.",
        ) {
            self.visibility_dirty = true;
        }

        ui.horizontal(|ui| {
            if ui
                .button("Regenerate")
                .on_hover_text("Build a fresh random layout with the same satellite count.")
                .clicked()
            {
                info!(satellites = self.satellites, "regenerating network");
                self.topology_dirty = true;
            }
            if ui.button("Show all").clicked() {
                self.visible_satellites = self.satellites;
                self.visibility_dirty = true;
            }
        });
    }

    fn draw_motion_controls(&mut self, ui: &mut Ui) {
        let settings = self.projector.settings_mut();
        ui.checkbox(&mut settings.auto_rotate, "Auto-rotate")
            .on_hover_text("Spin the whole network around its vertical axis.");
        ui.add_enabled_ui(settings.auto_rotate, |ui| {
            float_slider(
                ui,
                &mut settings.rotation_speed,
                -MAX_ROTATION_SPEED..=MAX_ROTATION_SPEED,
                "Rotation speed",
                "Radians per second; negative values spin the other way.",
            );
        });
    }

    fn draw_force_controls(&mut self, ui: &mut Ui) {
        let forces = &mut self.forces;
        let mut changed = false;

        changed |= float_slider(
            ui,
            &mut forces.repulsion,
            0.0..=2.0,
            "Repulsion",
            "How strongly nearby nodes push each other apart.",
        );
        changed |= float_slider(
            ui,
            &mut forces.repulsion_cutoff,
            0.5..=5.0,
            "Repulsion range",
            "Nodes farther apart than this ignore each other.",
        );
        changed |= float_slider(
            ui,
            &mut forces.spring_strength,
            0.0..=0.2,
            "Edge spring",
            "How strongly linked nodes pull toward their rest length.",
        );
        changed |= float_slider(
            ui,
            &mut forces.rest_length,
            0.2..=3.0,
            "Rest length",
            "Preferred distance between linked nodes.",
        );
        changed |= float_slider(
            ui,
            &mut forces.centering,
            0.0..=0.1,
            "Home pull",
            "How strongly each node drifts back to where it was generated.",
        );
        changed |= float_slider(
            ui,
            &mut forces.noise_strength,
            0.0..=0.1,
            "Drift",
            "Amplitude of the slow wandering motion.",
        );
        changed |= float_slider(
            ui,
            &mut forces.damping,
            0.5..=0.99,
            "Damping",
            "Fraction of velocity kept every frame.",
        );

        if ui.button("Reset forces").clicked() {
            *forces = ForceParams::default();
            changed = true;
        }

        if changed {
            debug!(forces = ?self.forces, "force parameters changed");
        }
    }
}
