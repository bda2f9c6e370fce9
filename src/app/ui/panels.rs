use eframe::egui::{self, Align, Context, Layout};

use super::super::SceneModel;

impl SceneModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("neural-mesh");
                    ui.separator();
                    ui.label(format!("tier: {}", self.tier.label()));
                    ui.label(format!(
                        "visible: {}/{}",
                        self.visible_satellites.min(self.satellites),
                        self.satellites
                    ));
                    ui.label(format!("generation: {}", self.simulation.generation()));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.scene_summary_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.draw_controls(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_scene(ui));
    }
}
