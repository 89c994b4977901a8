use std::sync::{Arc, Mutex, MutexGuard};

use egui_wgpu::{ScreenDescriptor, wgpu};
use winit::{event::DeviceEvent, keyboard::KeyCode};

use crate::{EngineResult, SkyConfig, WindowState};

/// Résultat d'une tentative de rendu de frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// Frame ignorée (fenêtre minimisée, surface obsolète ou perdue).
    Skipped,
    /// Erreur irrécupérable : l'application doit s'arrêter.
    Fatal,
}

/// Verrouille l'état de la fenêtre, même si un thread a paniqué en le tenant.
pub fn lock_state(state: &Mutex<WindowState>) -> MutexGuard<'_, WindowState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub trait Window {
    fn state(&self) -> &Arc<Mutex<WindowState>>;
    fn window(&self) -> &Arc<winit::window::Window>;

    /// Enregistre les passes de la frame (avant l'overlay egui).
    fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        state: &mut WindowState,
    );

    /// Dessine l'interface egui de la frame.
    fn draw(&mut self, ctx: &egui::Context);

    fn device_event(&mut self, event: &DeviceEvent);

    /// Retourne `true` si la touche a été consommée.
    fn on_key(&mut self, key: KeyCode, pressed: bool) -> bool;

    fn on_resized(&mut self, _width: u32, _height: u32) {}

    fn id(&self) -> winit::window::WindowId {
        self.window().id()
    }

    fn request_redraw(&self) {
        self.window().request_redraw();
    }

    fn is_mouse_captured(&self) -> bool {
        lock_state(self.state()).is_mouse_captured()
    }

    fn set_mouse_capture(&mut self, capture: bool) {
        let window = Arc::clone(self.window());
        lock_state(self.state()).set_mouse_capture(&window, capture);
    }

    fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            lock_state(self.state()).resize_surface(width, height);
            self.on_resized(width, height);
        }
    }

    fn handle_redraw(&mut self) -> FrameOutcome {
        let window_arc = Arc::clone(self.window());

        if window_arc.is_minimized().unwrap_or(false) {
            return FrameOutcome::Skipped;
        }

        let state_arc = Arc::clone(self.state());
        let mut state = lock_state(&state_arc);

        let surface_texture = match state.surface.get_current_texture() {
            Ok(tex) => tex,
            Err(wgpu::SurfaceError::Outdated) => return FrameOutcome::Skipped,
            Err(wgpu::SurfaceError::Lost) => {
                log::warn!("Surface lost, reconfiguring");
                state.reconfigure();
                return FrameOutcome::Skipped;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
                return FrameOutcome::Fatal;
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
                return FrameOutcome::Skipped;
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [state.config.width, state.config.height],
            pixels_per_point: window_arc.scale_factor() as f32 * state.scale_factor,
        };

        let mut encoder = state
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.render(&mut encoder, &surface_view, &mut state);

        let ctx = state.begin_frame(&window_arc);
        self.draw(&ctx);
        state.end_frame_and_draw(&mut encoder, &window_arc, &surface_view, screen_descriptor);

        state.queue.submit(Some(encoder.finish()));
        drop(state);

        surface_texture.present();
        window_arc.request_redraw();
        FrameOutcome::Presented
    }
}

/// Construction asynchrone d'une fenêtre à partir d'une fenêtre winit.
pub trait WindowFactory {
    fn create(
        winit_window: winit::window::Window,
        config: SkyConfig,
    ) -> impl Future<Output = EngineResult<Self>>
    where
        Self: Sized;
}
