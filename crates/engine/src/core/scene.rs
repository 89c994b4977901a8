use winit::keyboard::KeyCode;

use crate::{Camera, CameraController, CameraConfig, Uniforms};

/// Etat de la scène du ciel : caméra, contrôleur et uniforms associés.
pub struct Scene {
    pub name: String,
    pub camera: Camera,
    pub controller: CameraController,
    uniforms: Uniforms,
}

impl Scene {
    pub fn new(name: impl Into<String>, config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Camera::from_config(config, 1.0);
        camera.set_viewport_size(width, height);

        let mut uniforms = Uniforms::new();
        uniforms.update_view_proj(&camera);

        Self {
            name: name.into(),
            camera,
            controller: CameraController::from_config(config),
            uniforms,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        self.controller.process_key(key, pressed)
    }

    /// Appelé par le handler d'événements bas niveau (DeviceEvent) :
    /// on accumule la delta souris et on retourne rapidement.
    pub fn accumulate_mouse(&mut self, dx: f32, dy: f32) {
        self.controller.process_mouse(dx, dy);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport_size(width, height);
    }

    /// Applique les entrées accumulées puis recalcule la matrice view-projection.
    pub fn update(&mut self, delta_time: f32) {
        self.controller.update_camera(&mut self.camera, delta_time);
        self.uniforms.update_view_proj(&self.camera);
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_refreshes_uniforms_from_camera() {
        let mut scene = Scene::new("test", &CameraConfig::default(), 800, 600);
        let before = *scene.uniforms();

        scene.accumulate_mouse(100.0, 0.0);
        scene.update(0.016);

        assert_ne!(before.view_proj, scene.uniforms().view_proj);

        let mut expected = Uniforms::new();
        expected.update_view_proj(&scene.camera);
        assert_eq!(expected.view_proj, scene.uniforms().view_proj);
    }

    #[test]
    fn resize_changes_aspect() {
        let mut scene = Scene::new("test", &CameraConfig::default(), 800, 600);
        assert!((scene.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        scene.resize(1000, 500);
        assert_eq!(scene.camera.aspect, 2.0);
    }
}
