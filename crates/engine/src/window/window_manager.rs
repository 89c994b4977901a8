use std::sync::{Arc, Mutex};

use winit::{
    dpi::PhysicalSize,
    event_loop::ActiveEventLoop,
    window::{WindowAttributes, WindowId},
};

use crate::{EngineResult, SkyConfig, Window, WindowFactory};

#[derive(Default)]
pub struct WindowManager {
    windows: Vec<Arc<Mutex<dyn Window>>>,
    active_window: Option<Arc<Mutex<dyn Window>>>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crée une fenêtre winit selon la configuration puis la fenêtre de type `W`.
    pub async fn create_window<W>(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: &SkyConfig,
    ) -> EngineResult<Arc<Mutex<W>>>
    where
        W: Window + WindowFactory + 'static,
    {
        let attributes = WindowAttributes::default()
            .with_title(config.window.title.clone())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height));

        let winit_window = event_loop.create_window(attributes)?;
        log::info!(
            "Created window '{}' ({}x{})",
            config.window.title,
            config.window.width,
            config.window.height
        );

        let window = Arc::new(Mutex::new(W::create(winit_window, config.clone()).await?));

        let window_as_trait: Arc<Mutex<dyn Window>> = window.clone();
        self.windows.push(window_as_trait.clone());
        self.active_window = Some(window_as_trait);

        Ok(window)
    }

    pub fn remove_window(&mut self, window_id: WindowId) {
        // Les fenêtres dont le mutex est empoisonné sont retirées aussi.
        self.windows
            .retain(|w| w.lock().map(|guard| guard.id() != window_id).unwrap_or(false));

        let active_removed = self
            .active_window
            .as_ref()
            .is_some_and(|active| active.lock().map(|g| g.id() == window_id).unwrap_or(true));
        if active_removed {
            self.active_window = self.windows.first().cloned();
        }
    }

    pub fn get_active_window(&self) -> Option<Arc<Mutex<dyn Window>>> {
        self.active_window.clone()
    }

    pub fn get_window(&self, window_id: WindowId) -> Option<Arc<Mutex<dyn Window>>> {
        self.windows
            .iter()
            .find(|w| w.lock().map(|guard| guard.id() == window_id).unwrap_or(false))
            .cloned()
    }

    pub fn has_windows(&self) -> bool {
        !self.windows.is_empty()
    }
}
