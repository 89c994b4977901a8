use bytemuck::{Pod, Zeroable};
use nalgebra::Matrix4;

use crate::{Camera, Mat4, opengl_to_wgpu_matrix};

/// Bloc uniforme du ciel, `@group(0) @binding(0)` côté WGSL.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
}

impl Default for Uniforms {
    fn default() -> Self {
        Self::new()
    }
}

impl Uniforms {
    pub const SIZE: u64 = std::mem::size_of::<Uniforms>() as u64;

    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::<f32>::identity().into(),
        }
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            view_proj: matrix.into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = (opengl_to_wgpu_matrix() * camera.build_view_projection_matrix()).into();
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        Mat4::from(self.view_proj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_a_single_mat4() {
        assert_eq!(Uniforms::SIZE, 64);
        assert_eq!(bytemuck::bytes_of(&Uniforms::new()).len(), 64);
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Uniforms::default().view_proj_matrix(), Mat4::identity());
    }

    #[test]
    fn matrix_is_stored_column_major() {
        let m = Mat4::new_translation(&nalgebra::Vector3::new(1.0, 2.0, 3.0));
        let uniforms = Uniforms::from_matrix(m);
        assert_eq!(uniforms.view_proj[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniforms.view_proj_matrix(), m);
    }
}
