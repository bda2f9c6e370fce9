use eframe::egui::Context;

use crate::network::physics::is_active;

use super::super::SceneModel;

const FPS_SAMPLE_WINDOW: usize = 180;

impl SceneModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        let dt = ctx.input(|input| input.stable_dt);
        self.record_frame_time(dt);
    }

    fn record_frame_time(&mut self, dt: f32) {
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar {
            return None;
        }

        let mut parts = Vec::new();

        if self.fps_show_current {
            parts.push(format!("FPS {:.0}", self.fps_current));
        }

        if self.fps_show_average && !self.fps_samples.is_empty() {
            let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
            parts.push(format!("avg {:.1}", avg));
        }

        if self.fps_show_low {
            if let Some(low) = self.fps_samples.iter().copied().reduce(f32::min) {
                parts.push(format!("low {:.0}", low));
            }
        }

        if self.fps_show_frame_time && self.fps_current > f32::EPSILON {
            parts.push(format!("{:.1} ms", 1000.0 / self.fps_current));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }

    pub(in crate::app) fn scene_summary_text(&self) -> String {
        let nodes = self.simulation.nodes();
        let active = nodes.iter().filter(|node| is_active(node)).count();
        let physics = if self.simulation.physics_enabled() {
            "physics on"
        } else {
            "rotation only"
        };
        format!(
            "active {active}/{} | edges {} | lines {} | {physics}",
            nodes.len(),
            self.simulation.edges().len(),
            self.drawn_line_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::FPS_SAMPLE_WINDOW;
    use crate::app::SceneModel;
    use crate::config::{PerformanceTier, SceneConfig};
    use crate::network::ForceParams;

    fn scene() -> SceneModel {
        SceneModel::new(SceneConfig {
            satellites: 4,
            tier: PerformanceTier::High,
            auto_rotate: false,
            rotation_speed: 0.15,
            accent_color: [0, 255, 209],
            seed: Some(1),
            forces: ForceParams::default(),
        })
    }

    #[test]
    fn window_keeps_latest_samples() {
        let mut scene = scene();
        for _ in 0..(FPS_SAMPLE_WINDOW + 20) {
            scene.record_frame_time(1.0 / 60.0);
        }
        scene.record_frame_time(0.0);

        assert_eq!(scene.fps_samples.len(), FPS_SAMPLE_WINDOW);
        assert!((scene.fps_current - 60.0).abs() < 0.01);
    }

    #[test]
    fn text_joins_enabled_parts() {
        let mut scene = scene();
        scene.record_frame_time(0.02);
        scene.record_frame_time(0.01);
        scene.fps_show_low = true;

        assert_eq!(
            scene.fps_display_text().as_deref(),
            Some("FPS 100 | avg 75.0 | low 50 | 10.0 ms")
        );

        scene.show_fps_bar = false;
        assert_eq!(scene.fps_display_text(), None);
    }

    #[test]
    fn summary_counts_only_participating_nodes() {
        let mut scene = scene();
        scene.visible_satellites = 2;
        scene.visibility_dirty = true;
        scene.step(0.0);

        let edges = scene.simulation.edges().len();
        assert_eq!(
            scene.scene_summary_text(),
            format!("active 3/5 | edges {edges} | lines 0 | physics on")
        );
    }
}
