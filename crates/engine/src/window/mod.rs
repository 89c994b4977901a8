mod gui;
mod hud;
mod traits;
mod window_manager;
mod window_state;

pub use gui::*;
pub use hud::*;
pub use traits::*;
pub use window_manager::*;
pub use window_state::*;
