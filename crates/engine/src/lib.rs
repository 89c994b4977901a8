mod config;
mod core;
mod delta_timer;
mod error;
mod program;
mod raster;
mod renderer;
mod shader;
mod sky;
mod uniforms;
mod vertex;
mod window;

pub use config::*;
pub use core::*;
pub use delta_timer::*;
pub use error::*;
pub use program::*;
pub use raster::*;
pub use renderer::*;
pub use shader::*;
pub use sky::*;
pub use uniforms::*;
pub use vertex::*;
pub use window::*;

pub use egui;
pub use egui_wgpu::wgpu;
pub use winit;
