use eframe::egui::{self, CursorIcon, Ui};
use tracing::debug;

use super::super::SceneModel;
use super::super::render_utils::OrbitCamera;

impl SceneModel {
    pub(in crate::app) fn handle_orbit(&mut self, ui: &Ui, response: &egui::Response) {
        if response.double_clicked() {
            self.camera = OrbitCamera::default();
            debug!("camera reset");
            return;
        }

        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Secondary)
        {
            self.camera.orbit(response.drag_delta());
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        } else if response.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }
    }
}
