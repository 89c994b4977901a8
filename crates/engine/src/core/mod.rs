mod camera;
mod math;
mod scene;

pub use camera::*;
pub use math::*;
pub use scene::*;
