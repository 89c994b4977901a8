use nalgebra::{Matrix4, Point3};
use winit::keyboard::KeyCode;

use crate::{CameraConfig, Mat4, Vec3, degrees_to_radians};

/// Passe de la convention de profondeur OpenGL ([-1, 1]) à celle de wgpu ([0, 1]).
#[rustfmt::skip]
pub fn opengl_to_wgpu_matrix() -> Mat4 {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Caméra 3D "fly" : Z est le haut du monde.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Rotation autour de l'axe Z (radians)
    pub angle_ground: f32,
    /// Inclinaison au-dessus de l'horizon (radians)
    pub angle_up: f32,
    pub aspect: f32,
    /// Champ de vision vertical en degrés
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self::from_config(&CameraConfig::default(), aspect)
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let [x, y, z] = config.position;
        Self {
            position: Point3::new(x, y, z),
            angle_ground: 0.0,
            angle_up: 0.0,
            aspect,
            fovy: config.fovy,
            znear: config.znear,
            zfar: config.zfar,
        }
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let target = self.position + self.look_direction();
        let view = Mat4::look_at_rh(&self.position, &target, &Vec3::z());
        let proj = Mat4::new_perspective(
            self.aspect,
            degrees_to_radians(self.fovy),
            self.znear,
            self.zfar,
        );
        proj * view
    }

    pub fn look_direction(&self) -> Vec3 {
        let (sin_up, cos_up) = self.angle_up.sin_cos();
        let (sin_ground, cos_ground) = self.angle_ground.sin_cos();
        Vec3::new(cos_up * cos_ground, cos_up * sin_ground, sin_up)
    }

    pub fn forward_direction(&self) -> Vec3 {
        let (sin_ground, cos_ground) = self.angle_ground.sin_cos();
        Vec3::new(cos_ground, sin_ground, 0.0)
    }

    pub fn right_direction(&self) -> Vec3 {
        let (sin_ground, cos_ground) = self.angle_ground.sin_cos();
        Vec3::new(sin_ground, -cos_ground, 0.0)
    }

    /// Mettre à jour l'aspect ratio (appeler lors du resize)
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

/// Etat des touches et de la souris, appliqué à la caméra une fois par frame.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Unités monde par seconde
    pub speed: f32,
    /// Radians par pixel de souris
    pub sensitivity: f32,
    angle_ground_delta: f32,
    angle_up_delta: f32,
    is_up_pressed: bool,
    is_down_pressed: bool,
    is_forward_pressed: bool,
    is_backward_pressed: bool,
    is_left_pressed: bool,
    is_right_pressed: bool,
}

impl CameraController {
    const MIN_DIRECTION: f32 = 0.001;

    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            angle_ground_delta: 0.0,
            angle_up_delta: 0.0,
            is_up_pressed: false,
            is_down_pressed: false,
            is_forward_pressed: false,
            is_backward_pressed: false,
            is_left_pressed: false,
            is_right_pressed: false,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.speed, config.sensitivity)
    }

    /// Retourne `true` si la touche est utilisée par le contrôleur.
    pub fn process_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let flag = match key {
            KeyCode::Space => &mut self.is_up_pressed,
            KeyCode::ShiftLeft => &mut self.is_down_pressed,
            KeyCode::KeyW => &mut self.is_forward_pressed,
            KeyCode::KeyA => &mut self.is_left_pressed,
            KeyCode::KeyS => &mut self.is_backward_pressed,
            KeyCode::KeyD => &mut self.is_right_pressed,
            _ => return false,
        };
        *flag = pressed;
        true
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.angle_ground_delta -= dx;
        self.angle_up_delta -= dy;
    }

    /// Relâche toutes les touches (perte de focus, souris libérée).
    pub fn release_all(&mut self) {
        self.is_up_pressed = false;
        self.is_down_pressed = false;
        self.is_forward_pressed = false;
        self.is_backward_pressed = false;
        self.is_left_pressed = false;
        self.is_right_pressed = false;
    }

    pub fn update_camera(&mut self, camera: &mut Camera, dt: f32) {
        let forward = camera.forward_direction();
        let right = camera.right_direction();

        let mut direction = Vec3::zeros();
        if self.is_forward_pressed {
            direction += forward;
        }
        if self.is_backward_pressed {
            direction -= forward;
        }
        if self.is_right_pressed {
            direction += right;
        }
        if self.is_left_pressed {
            direction -= right;
        }
        if self.is_up_pressed {
            direction += Vec3::z();
        }
        if self.is_down_pressed {
            direction -= Vec3::z();
        }

        let magnitude = direction.norm();
        if magnitude > Self::MIN_DIRECTION {
            camera.position += direction / magnitude * self.speed * dt;
        }

        camera.angle_ground += self.angle_ground_delta * self.sensitivity;
        camera.angle_up += self.angle_up_delta * self.sensitivity;
        self.angle_ground_delta = 0.0;
        self.angle_up_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn default_camera_matches_config_defaults() {
        let camera = Camera::new(16.0 / 9.0);
        assert_eq!(camera.position, Point3::new(-10.0, 2.0, 1.0));
        assert_eq!(camera.fovy, 45.0);
        assert_eq!(camera.znear, 0.1);
        assert_eq!(camera.zfar, 100.0);
    }

    #[test]
    fn directions_at_zero_angles() {
        let camera = Camera::new(1.0);
        assert!(close(camera.look_direction(), Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(camera.forward_direction(), Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(camera.right_direction(), Vec3::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn looking_up_keeps_forward_horizontal() {
        let mut camera = Camera::new(1.0);
        camera.angle_up = std::f32::consts::FRAC_PI_2;
        assert!(close(camera.look_direction(), Vec3::new(0.0, 0.0, 1.0)));
        assert!(close(camera.forward_direction(), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn point_ahead_projects_to_screen_center() {
        let camera = Camera::new(1.0);
        let ahead = camera.position + camera.look_direction() * 10.0;
        let clip = opengl_to_wgpu_matrix()
            * camera.build_view_projection_matrix()
            * ahead.to_homogeneous();
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn opengl_to_wgpu_remaps_depth() {
        let m = opengl_to_wgpu_matrix();
        let near = m * nalgebra::Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = m * nalgebra::Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert!((near.z - 0.0).abs() < 1e-6);
        assert!((far.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn controller_moves_normalized_direction() {
        let mut camera = Camera::new(1.0);
        let mut controller = CameraController::new(2.0, 0.001);
        assert!(controller.process_key(KeyCode::KeyW, true));
        assert!(controller.process_key(KeyCode::KeyD, true));
        let start = camera.position;

        controller.update_camera(&mut camera, 0.5);

        let moved = camera.position - start;
        assert!((moved.norm() - 1.0).abs() < 1e-5);
        assert!(close(moved, Vec3::new(1.0, -1.0, 0.0).normalize()));
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let mut camera = Camera::new(1.0);
        let mut controller = CameraController::new(2.0, 0.001);
        controller.process_key(KeyCode::Space, true);
        controller.process_key(KeyCode::ShiftLeft, true);
        let start = camera.position;
        controller.update_camera(&mut camera, 1.0);
        assert_eq!(camera.position, start);
    }

    #[test]
    fn unbound_key_is_not_consumed() {
        let mut controller = CameraController::new(1.0, 0.001);
        assert!(!controller.process_key(KeyCode::KeyQ, true));
    }

    #[test]
    fn mouse_delta_is_applied_once() {
        let mut camera = Camera::new(1.0);
        let mut controller = CameraController::new(1.0, 0.01);
        controller.process_mouse(10.0, -5.0);
        controller.process_mouse(10.0, 0.0);

        controller.update_camera(&mut camera, 0.016);
        assert!((camera.angle_ground - -0.2).abs() < 1e-6);
        assert!((camera.angle_up - 0.05).abs() < 1e-6);

        controller.update_camera(&mut camera, 0.016);
        assert!((camera.angle_ground - -0.2).abs() < 1e-6);
    }

    #[test]
    fn released_keys_stop_movement() {
        let mut camera = Camera::new(1.0);
        let mut controller = CameraController::new(1.0, 0.001);
        controller.process_key(KeyCode::KeyS, true);
        controller.release_all();
        let start = camera.position;
        controller.update_camera(&mut camera, 1.0);
        assert_eq!(camera.position, start);
    }

    #[test]
    fn zero_viewport_keeps_aspect() {
        let mut camera = Camera::new(2.0);
        camera.set_viewport_size(0, 600);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport_size(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport_size(400, 400);
        assert_eq!(camera.aspect, 1.0);
    }
}
