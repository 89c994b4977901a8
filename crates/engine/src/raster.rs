//! Rendu de référence sur CPU.
//!
//! Rejoue la passe du ciel sans GPU : étage vertex de `SkyProgram`, passage en
//! coordonnées fenêtre, culling des faces arrière, couverture des centres de
//! pixels (règle top-left), interpolation perspective-correcte puis étage
//! fragment. Pas de clipping contre les plans : un triangle avec un sommet à
//! `w <= 0` est ignoré.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::{
    Camera, EngineResult, SkyConfig, SkyProgram, Uniforms, Vec2, Vec4, Vertex, VertexInput,
    VertexOutput, barycentric,
};

pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, clear: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![clear; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[self.index(x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Vec4) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }

    /// Conversion en RGBA8 (valeurs linéaires, bornées à [0, 1]).
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = self.pixel(x, y);
            Rgba([to_u8(c.x), to_u8(c.y), to_u8(c.z), to_u8(c.w)])
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        self.to_image().save(path)?;
        Ok(())
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Un échantillon produit par le rasterizer, avant l'étage fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub x: u32,
    pub y: u32,
    pub depth: f32,
    pub tex_coords: Vec2,
}

/// Sommet après division perspective, en coordonnées fenêtre.
#[derive(Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
    inv_w: f32,
    tex_coords: Vec2,
}

fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

fn is_top_left(from: &ScreenVertex, to: &ScreenVertex) -> bool {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

fn covers(weight: f32, top_left: bool) -> bool {
    weight > 0.0 || (weight == 0.0 && top_left)
}

pub struct Rasterizer {
    /// Faces avant = sens anti-horaire en NDC, comme le pipeline GPU.
    pub cull_back_faces: bool,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            cull_back_faces: true,
        }
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dessine une liste de triangles indexés dans `target` (blending REPLACE).
    pub fn draw(
        &self,
        target: &mut Framebuffer,
        uniforms: &Uniforms,
        vertices: &[Vertex],
        indices: &[u16],
    ) {
        for triangle in indices.chunks_exact(3) {
            let (Some(a), Some(b), Some(c)) = (
                vertices.get(triangle[0] as usize),
                vertices.get(triangle[1] as usize),
                vertices.get(triangle[2] as usize),
            ) else {
                log::warn!(
                    "Skipping triangle {:?}: index out of range for {} vertices",
                    triangle,
                    vertices.len()
                );
                continue;
            };

            let outputs = [a, b, c].map(|v| SkyProgram::vertex(uniforms, &VertexInput::from(v)));

            for fragment in self.rasterize_triangle(target.width, target.height, &outputs) {
                let color = SkyProgram::fragment(fragment.tex_coords);
                target.set_pixel(fragment.x, fragment.y, color);
            }
        }
    }

    pub fn rasterize_triangle(
        &self,
        width: u32,
        height: u32,
        triangle: &[VertexOutput; 3],
    ) -> Vec<Fragment> {
        if width == 0 || height == 0 || triangle.iter().any(|v| v.clip_position.w <= 0.0) {
            return Vec::new();
        }

        let to_screen = |v: &VertexOutput| {
            let inv_w = 1.0 / v.clip_position.w;
            let ndc = v.clip_position.xyz() * inv_w;
            ScreenVertex {
                x: (ndc.x + 1.0) * 0.5 * width as f32,
                y: (1.0 - ndc.y) * 0.5 * height as f32,
                z: ndc.z,
                inv_w,
                tex_coords: v.tex_coords,
            }
        };

        let (a, mut b, mut c) = (
            to_screen(&triangle[0]),
            to_screen(&triangle[1]),
            to_screen(&triangle[2]),
        );

        // En coordonnées fenêtre (y vers le bas), une face avant a une aire négative.
        let mut area = edge(&a, &b, c.x, c.y);
        if area == 0.0 || (self.cull_back_faces && area > 0.0) {
            return Vec::new();
        }
        if area < 0.0 {
            std::mem::swap(&mut b, &mut c);
            area = -area;
        }

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as u32).min(width);
        let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as u32).min(height);

        let bias = [is_top_left(&b, &c), is_top_left(&c, &a), is_top_left(&a, &b)];
        let mut fragments = Vec::new();

        for y in min_y..max_y {
            for x in min_x..max_x {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let w = [edge(&b, &c, px, py), edge(&c, &a, px, py), edge(&a, &b, px, py)];
                if !(0..3).all(|i| covers(w[i], bias[i])) {
                    continue;
                }

                let lambda = [w[0] / area, w[1] / area, w[2] / area];
                let depth = barycentric([a.z, b.z, c.z], lambda);
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }

                let perspective = [
                    lambda[0] * a.inv_w,
                    lambda[1] * b.inv_w,
                    lambda[2] * c.inv_w,
                ];
                let norm = perspective.iter().sum::<f32>();
                let weights = perspective.map(|p| p / norm);

                fragments.push(Fragment {
                    x,
                    y,
                    depth,
                    tex_coords: barycentric([a.tex_coords, b.tex_coords, c.tex_coords], weights),
                });
            }
        }

        fragments
    }
}

/// Rend la configuration complète (mesh, caméra, couleur de fond) sur CPU.
pub fn render_snapshot(config: &SkyConfig) -> Framebuffer {
    let mut camera = Camera::from_config(&config.camera, 1.0);
    camera.set_viewport_size(config.window.width, config.window.height);

    let mut uniforms = Uniforms::new();
    uniforms.update_view_proj(&camera);

    let [r, g, b, a] = config.clear_color.map(|c| c as f32);
    let mut framebuffer =
        Framebuffer::new(config.window.width, config.window.height, Vec4::new(r, g, b, a));

    Rasterizer::new().draw(
        &mut framebuffer,
        &uniforms,
        config.mesh.vertices(),
        config.mesh.indices(),
    );

    log::debug!(
        "Rendered {}x{} snapshot of the {}",
        framebuffer.width(),
        framebuffer.height(),
        config.mesh.name()
    );

    framebuffer
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::{Mat4, SkyMesh};

    fn clear() -> Vec4 {
        Vec4::new(0.1, 0.2, 0.3, 1.0)
    }

    fn close(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max() < 1e-5
    }

    fn fullscreen(width: u32, height: u32, uniforms: &Uniforms) -> Framebuffer {
        let mut fb = Framebuffer::new(width, height, clear());
        let mesh = SkyMesh::FullscreenTriangle;
        Rasterizer::new().draw(&mut fb, uniforms, mesh.vertices(), mesh.indices());
        fb
    }

    #[test]
    fn fullscreen_triangle_center_is_half_uv() {
        let fb = fullscreen(3, 3, &Uniforms::new());
        assert!(close(fb.pixel(1, 1), Vec4::new(0.5, 0.5, 0.0, 1.0)));
    }

    #[test]
    fn fullscreen_triangle_covers_every_pixel() {
        let fb = fullscreen(16, 9, &Uniforms::new());
        for y in 0..9 {
            for x in 0..16 {
                let c = fb.pixel(x, y);
                assert_eq!(c.z, 0.0);
                assert_eq!(c.w, 1.0);
                assert!(c.x > 0.0 && c.x < 1.0 && c.y > 0.0 && c.y < 1.0);
            }
        }
    }

    #[test]
    fn uv_follows_screen_axes() {
        let fb = fullscreen(4, 4, &Uniforms::new());
        // u grandit vers la droite, v vers le haut de l'écran.
        assert!(fb.pixel(3, 0).x > fb.pixel(0, 0).x);
        assert!(fb.pixel(0, 0).y > fb.pixel(0, 3).y);
    }

    // Documents current behaviour: view_proj is uploaded but never applied.
    #[test]
    fn altered_view_proj_renders_identically() {
        let identity = fullscreen(8, 8, &Uniforms::new());
        let rotated = Mat4::from_euler_angles(0.3, 1.2, -0.7).append_translation(
            &nalgebra::Vector3::new(5.0, -2.0, 9.0),
        );
        let altered = fullscreen(8, 8, &Uniforms::from_matrix(rotated));
        assert_eq!(identity.to_image(), altered.to_image());
    }

    #[test]
    fn back_faces_are_culled() {
        let clockwise = [
            Vertex::new([-1.0, -1.0, 0.0], [0.0, 0.0]),
            Vertex::new([-1.0, 3.0, 0.0], [0.0, 2.0]),
            Vertex::new([3.0, -1.0, 0.0], [2.0, 0.0]),
        ];
        let mut fb = Framebuffer::new(4, 4, clear());
        Rasterizer::new().draw(&mut fb, &Uniforms::new(), &clockwise, &[0, 1, 2]);
        assert_eq!(fb.pixel(2, 2), clear());

        let no_cull = Rasterizer {
            cull_back_faces: false,
        };
        no_cull.draw(&mut fb, &Uniforms::new(), &clockwise, &[0, 1, 2]);
        assert_ne!(fb.pixel(2, 2), clear());
    }

    #[test]
    fn out_of_range_indices_skip_the_triangle() {
        let mesh = SkyMesh::FullscreenTriangle;
        let mut fb = Framebuffer::new(4, 4, clear());
        Rasterizer::new().draw(&mut fb, &Uniforms::new(), &mesh.vertices()[..1], &[0, 1, 2]);
        assert_eq!(fb.pixel(2, 2), clear());

        // Les triangles valides du même buffer sont toujours dessinés.
        Rasterizer::new().draw(&mut fb, &Uniforms::new(), mesh.vertices(), &[0, 1, 7, 0, 1, 2]);
        assert_ne!(fb.pixel(2, 2), clear());
    }

    #[test]
    fn fragments_outside_depth_range_are_discarded() {
        let behind = [
            Vertex::new([-1.0, -1.0, -0.5], [0.0, 0.0]),
            Vertex::new([3.0, -1.0, -0.5], [2.0, 0.0]),
            Vertex::new([-1.0, 3.0, -0.5], [0.0, 2.0]),
        ];
        let mut fb = Framebuffer::new(4, 4, clear());
        Rasterizer::new().draw(&mut fb, &Uniforms::new(), &behind, &[0, 1, 2]);
        assert_eq!(fb.pixel(1, 1), clear());
    }

    #[test]
    fn shared_edge_pixels_are_drawn_once() {
        // Quad coupé en deux triangles le long de la diagonale.
        let quad = [
            Vertex::new([-1.0, -1.0, 0.0], [0.0, 0.0]),
            Vertex::new([1.0, -1.0, 0.0], [1.0, 0.0]),
            Vertex::new([1.0, 1.0, 0.0], [1.0, 1.0]),
            Vertex::new([-1.0, 1.0, 0.0], [0.0, 1.0]),
        ];
        let rasterizer = Rasterizer::new();
        let out = |i: usize| SkyProgram::vertex(&Uniforms::new(), &VertexInput::from(&quad[i]));
        let first = rasterizer.rasterize_triangle(4, 4, &[out(0), out(1), out(2)]);
        let second = rasterizer.rasterize_triangle(4, 4, &[out(0), out(2), out(3)]);

        assert_eq!(first.len() + second.len(), 16);
        for f in &first {
            assert!(!second.iter().any(|s| s.x == f.x && s.y == f.y));
        }
    }

    #[test]
    fn image_conversion_clamps_and_rounds() {
        let mut fb = Framebuffer::new(2, 1, Vec4::new(0.0, 0.0, 0.0, 1.0));
        fb.set_pixel(1, 0, Vec4::new(2.0, 0.5, -1.0, 1.0));
        let img = fb.to_image();
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([255, 128, 0, 255]));
    }

    #[test]
    fn snapshot_uses_config_and_saves_png() {
        let mut config = SkyConfig::default();
        config.window.width = 5;
        config.window.height = 5;

        let fb = render_snapshot(&config);
        assert_eq!((fb.width(), fb.height()), (5, 5));
        assert!(close(fb.pixel(2, 2), Vec4::new(0.5, 0.5, 0.0, 1.0)));

        let dir = tempdir().unwrap();
        let path = dir.path().join("sky.png");
        fb.save_png(&path).unwrap();
        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded, fb.to_image());
    }

    #[test]
    fn cube_snapshot_keeps_clear_color_where_uncovered() {
        let mut config = SkyConfig::default();
        config.mesh = SkyMesh::Cube;
        config.window.width = 8;
        config.window.height = 8;

        let fb = render_snapshot(&config);
        let clear = clear();
        let covered = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| !close(fb.pixel(x, y), clear))
            .count();
        assert!(covered > 0);
        for y in 0..8 {
            for x in 0..8 {
                let c = fb.pixel(x, y);
                assert!(close(c, clear) || (c.z == 0.0 && c.w == 1.0));
            }
        }
    }
}
