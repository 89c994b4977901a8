use crate::{DeltaTimer, Scene, SkyMesh, radians_to_degrees};

/// Valeurs affichées dans l'overlay de debug.
#[derive(Debug, Clone, PartialEq)]
pub struct HudInfo {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub position: [f32; 3],
    /// Degrés
    pub heading: f32,
    /// Degrés
    pub pitch: f32,
    pub mesh: SkyMesh,
    pub mouse_captured: bool,
}

impl HudInfo {
    pub fn collect(timer: &DeltaTimer, scene: &Scene, mesh: SkyMesh, mouse_captured: bool) -> Self {
        let p = scene.camera.position;
        Self {
            fps: timer.fps(),
            frame_time_ms: timer.frame_time_ms(),
            position: [p.x, p.y, p.z],
            heading: radians_to_degrees(scene.camera.angle_ground),
            pitch: radians_to_degrees(scene.camera.angle_up),
            mesh,
            mouse_captured,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let [x, y, z] = self.position;
        vec![
            format!("{:.0} fps ({:.2} ms)", self.fps, self.frame_time_ms),
            format!("camera: ({x:.2}, {y:.2}, {z:.2})"),
            format!("heading {:.1}°, pitch {:.1}°", self.heading, self.pitch),
            format!("mesh: {}", self.mesh.name()),
            "view_proj: uploaded, not applied".to_string(),
            if self.mouse_captured {
                "Esc: release mouse".to_string()
            } else {
                "click: capture mouse".to_string()
            },
        ]
    }

    pub fn show(&self, ctx: &egui::Context) {
        egui::Window::new("Sky")
            .resizable(false)
            .default_pos([12.0, 12.0])
            .show(ctx, |ui| {
                for line in self.lines() {
                    ui.monospace(line);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CameraConfig;

    #[test]
    fn lines_describe_camera_and_mesh() {
        let scene = Scene::new("test", &CameraConfig::default(), 800, 600);
        let info = HudInfo::collect(&DeltaTimer::new(), &scene, SkyMesh::Cube, false);
        let lines = info.lines();

        assert_eq!(lines[1], "camera: (-10.00, 2.00, 1.00)");
        assert_eq!(lines[2], "heading 0.0°, pitch 0.0°");
        assert_eq!(lines[3], "mesh: cube");
        assert_eq!(lines.last().unwrap(), "click: capture mouse");
    }
}
