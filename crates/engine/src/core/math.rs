pub type Vec2 = nalgebra::Vector2<f32>;
pub type Vec3 = nalgebra::Vector3<f32>;
pub type Vec4 = nalgebra::Vector4<f32>;
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Combine trois valeurs avec des poids barycentriques (somme = 1).
pub fn barycentric<T>(values: [T; 3], weights: [f32; 3]) -> T
where
    T: Copy + std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
{
    values[0] * weights[0] + values[1] * weights[1] + values[2] * weights[2]
}

pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barycentric_weights_pick_vertices() {
        let values = [Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0)];
        assert_eq!(barycentric(values, [0.0, 1.0, 0.0]), Vec2::new(2.0, 0.0));
        assert_eq!(barycentric(values, [0.5, 0.25, 0.25]), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn angle_conversions_round_trip() {
        assert!((degrees_to_radians(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((radians_to_degrees(std::f32::consts::FRAC_PI_2) - 90.0).abs() < 1e-4);
    }
}
