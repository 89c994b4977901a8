//! WindowState
//! - wgpu device/queue/surface & configuration
//! - renderer egui encapsulé (EguiRenderer)
//! - delta souris et capture du curseur

use egui_wgpu::{ScreenDescriptor, wgpu};
use winit::event::DeviceEvent;
use winit::window::{CursorGrabMode, Window as WinitWindow};

use crate::{EguiRenderer, EngineResult};

pub struct WindowState {
    // WGPU core
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub format: wgpu::TextureFormat,
    /// multiplier additionnel (optionnel) appliqué au scale factor de la fenêtre
    pub scale_factor: f32,

    mouse_delta: (f32, f32),
    mouse_captured: bool,

    pub egui_renderer: EguiRenderer,
}

impl WindowState {
    /// Crée un nouvel état WGPU + Egui pour la surface fournie.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        window: &WinitWindow,
        width: u32,
        height: u32,
    ) -> EngineResult<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await?;

        let caps = surface.get_capabilities(&adapter);

        // Préférence Bgra8 sRGB quand disponible
        let preferred = wgpu::TextureFormat::Bgra8UnormSrgb;
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| *f == preferred)
            .unwrap_or(caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);
        log::debug!("Surface configured: {}x{} {:?}", config.width, config.height, format);

        let egui_renderer = EguiRenderer::new(&device, config.format, window);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            format,
            scale_factor: 1.0,
            mouse_delta: (0.0, 0.0),
            mouse_captured: false,
            egui_renderer,
        })
    }

    /// Accumule la delta souris quand la souris est capturée.
    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event
            && self.mouse_captured
        {
            self.mouse_delta.0 += delta.0 as f32;
            self.mouse_delta.1 += delta.1 as f32;
        }
    }

    /// Retourne la delta souris accumulée et la remet à zéro.
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    pub fn set_mouse_capture(&mut self, window: &WinitWindow, capture: bool) {
        self.mouse_captured = capture;
        if capture {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
                .ok();
        } else {
            window.set_cursor_grab(CursorGrabMode::None).ok();
            self.mouse_delta = (0.0, 0.0);
        }
        window.set_cursor_visible(!capture);
    }

    pub fn is_mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    pub fn begin_frame(&mut self, window: &WinitWindow) -> egui::Context {
        self.egui_renderer.begin_frame(window)
    }

    pub fn end_frame_and_draw(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        window: &WinitWindow,
        window_surface_view: &wgpu::TextureView,
        screen_descriptor: ScreenDescriptor,
    ) {
        self.egui_renderer.end_frame_and_draw(
            &self.device,
            &self.queue,
            encoder,
            window,
            window_surface_view,
            screen_descriptor,
        );
    }

    /// Reconfigure la surface après un resize.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        log::debug!("Resizing surface to {}x{}", width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Reconfigure la surface avec sa taille actuelle (après `SurfaceError::Lost`).
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
