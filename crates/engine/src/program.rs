//! Programme du ciel : source WGSL et réplique CPU des deux étages.
//!
//! La réplique CPU suit le WGSL instruction par instruction. Elle sert aux tests
//! et au rendu de référence (`raster`), sans GPU.

use crate::{Uniforms, Vec2, Vec3, Vec4, Vertex};

/// Entrée de l'étage vertex (`@location(0)` position, `@location(1)` tex_coords).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexInput {
    pub position: Vec3,
    pub tex_coords: Vec2,
}

impl From<&Vertex> for VertexInput {
    fn from(vertex: &Vertex) -> Self {
        Self {
            position: Vec3::from(vertex.position),
            tex_coords: Vec2::from(vertex.tex_coords),
        }
    }
}

/// Sortie de l'étage vertex, interpolée par le rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    /// `@builtin(position)`
    pub clip_position: Vec4,
    /// `@location(0)`
    pub tex_coords: Vec2,
}

pub struct SkyProgram;

impl SkyProgram {
    pub const SOURCE: &'static str = include_str!("../shaders/sky.wgsl");
    pub const LABEL: &'static str = "sky_shader";
    pub const VERTEX_ENTRY: &'static str = "vs_main";
    pub const FRAGMENT_ENTRY: &'static str = "fs_main";
    pub const UNIFORM_GROUP: u32 = 0;
    pub const UNIFORM_BINDING: u32 = 0;

    /// Étage vertex. `view_proj` est lié mais pas appliqué : la position est
    /// déjà considérée en clip space.
    pub fn vertex(_uniforms: &Uniforms, input: &VertexInput) -> VertexOutput {
        VertexOutput {
            clip_position: Vec4::new(input.position.x, input.position.y, input.position.z, 1.0),
            tex_coords: input.tex_coords,
        }
    }

    /// Étage fragment : couleur de debug (u, v, 0, 1), sans échantillonnage.
    pub fn fragment(tex_coords: Vec2) -> Vec4 {
        Vec4::new(tex_coords.x, tex_coords.y, 0.0, 1.0)
    }
}
