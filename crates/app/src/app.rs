use engine::{FrameOutcome, SkyConfig, WindowManager, lock_state};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use crate::sky_window::SkyWindow;

/// Application winit : possède la configuration et le gestionnaire de fenêtres.
pub struct App {
    config: SkyConfig,
    window_manager: WindowManager,
}

impl App {
    pub fn new(config: SkyConfig) -> Self {
        Self {
            config,
            window_manager: WindowManager::new(),
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(self)?;

        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_manager.has_windows() {
            return;
        }

        let created = pollster::block_on(
            self.window_manager
                .create_window::<SkyWindow>(event_loop, &self.config),
        );

        if let Err(err) = created {
            log::error!("Failed to create the sky window: {err}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window_arc) = self.window_manager.get_window(window_id) else {
            return;
        };
        let Ok(mut window) = window_arc.lock() else {
            return;
        };

        let consumed = lock_state(window.state())
            .egui_renderer
            .handle_input(window.window(), &event)
            .consumed;

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                // `remove_window` verrouille chaque fenêtre : relâcher la nôtre d'abord.
                drop(window);
                self.window_manager.remove_window(window_id);
                if !self.window_manager.has_windows() {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                if window.handle_redraw() == FrameOutcome::Fatal {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                window.handle_resized(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    if keycode == KeyCode::Escape {
                        if pressed {
                            window.set_mouse_capture(false);
                        }
                    } else if !consumed || !pressed {
                        // Les relâchements passent toujours, pour ne pas bloquer une touche.
                        window.on_key(keycode, pressed);
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if !consumed {
                    window.set_mouse_capture(true);
                }
            }
            WindowEvent::Focused(false) => {
                window.set_mouse_capture(false);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(active_window) = self.window_manager.get_active_window()
            && let Ok(mut window) = active_window.lock()
        {
            window.device_event(&event);
        }
    }
}
