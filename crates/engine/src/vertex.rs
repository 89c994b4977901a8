use bytemuck::{Pod, Zeroable};
use egui_wgpu::wgpu;
use serde::{Deserialize, Serialize};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            tex_coords,
        }
    }

    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

// Cube du skybox : 6 faces, 4 sommets par face.
const CUBE_VERTICES: &[Vertex] = &[
    // Face avant (+X)
    Vertex::new([1., 1., 1.], [1., 0.]),
    Vertex::new([1., -1., 1.], [1., 1.]),
    Vertex::new([1., -1., -1.], [0., 1.]),
    Vertex::new([1., 1., -1.], [0., 0.]),
    // Face arrière (-X)
    Vertex::new([-1., 1., 1.], [1., 0.]),
    Vertex::new([-1., -1., 1.], [1., 1.]),
    Vertex::new([-1., -1., -1.], [0., 1.]),
    Vertex::new([-1., 1., -1.], [0., 0.]),
    // Face gauche (-Y)
    Vertex::new([1., -1., 1.], [1., 0.]),
    Vertex::new([-1., -1., 1.], [1., 1.]),
    Vertex::new([-1., -1., -1.], [0., 1.]),
    Vertex::new([1., -1., -1.], [0., 0.]),
    // Face droite (+Y)
    Vertex::new([1., 1., 1.], [1., 0.]),
    Vertex::new([-1., 1., 1.], [1., 1.]),
    Vertex::new([-1., 1., -1.], [0., 1.]),
    Vertex::new([1., 1., -1.], [0., 0.]),
    // Face haut (+Z)
    Vertex::new([1., 1., 1.], [1., 0.]),
    Vertex::new([-1., 1., 1.], [1., 1.]),
    Vertex::new([-1., -1., 1.], [0., 1.]),
    Vertex::new([1., -1., 1.], [0., 0.]),
    // Face bas (-Z)
    Vertex::new([1., 1., -1.], [1., 0.]),
    Vertex::new([-1., 1., -1.], [1., 1.]),
    Vertex::new([-1., -1., -1.], [0., 1.]),
    Vertex::new([1., -1., -1.], [0., 0.]),
];

#[rustfmt::skip]
const CUBE_INDICES: &[u16] = &[
    0, 1, 2, 0, 2, 3,
    7, 6, 4, 6, 5, 4,
    8, 9, 10, 8, 10, 11,
    15, 14, 12, 14, 13, 12,
    16, 17, 18, 16, 18, 19,
    23, 22, 20, 22, 21, 20,
];

// Un seul triangle qui recouvre tout l'écran (positions déjà en clip space).
const FULLSCREEN_TRIANGLE_VERTICES: &[Vertex] = &[
    Vertex::new([-1., -1., 0.], [0., 0.]),
    Vertex::new([3., -1., 0.], [2., 0.]),
    Vertex::new([-1., 3., 0.], [0., 2.]),
];

const FULLSCREEN_TRIANGLE_INDICES: &[u16] = &[0, 1, 2];

/// Géométrie dessinée par la passe du ciel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SkyMesh {
    Cube,
    #[default]
    FullscreenTriangle,
}

impl SkyMesh {
    pub fn vertices(self) -> &'static [Vertex] {
        match self {
            SkyMesh::Cube => CUBE_VERTICES,
            SkyMesh::FullscreenTriangle => FULLSCREEN_TRIANGLE_VERTICES,
        }
    }

    pub fn indices(self) -> &'static [u16] {
        match self {
            SkyMesh::Cube => CUBE_INDICES,
            SkyMesh::FullscreenTriangle => FULLSCREEN_TRIANGLE_INDICES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SkyMesh::Cube => "cube",
            SkyMesh::FullscreenTriangle => "fullscreen triangle",
        }
    }
}
