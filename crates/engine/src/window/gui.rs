use egui::Context;
use egui_wgpu::wgpu::{self, CommandEncoder, Device, Queue, StoreOp, TextureFormat, TextureView};
use egui_wgpu::{Renderer, ScreenDescriptor};
use egui_winit::{EventResponse, State};
use winit::event::WindowEvent;
use winit::window::Window;

/// Pont egui <-> winit <-> wgpu pour l'overlay (HUD).
pub struct EguiRenderer {
    state: State,
    renderer: Renderer,
    frame_started: bool,
}

impl EguiRenderer {
    const MAX_TEXTURE_SIDE: usize = 2048;

    pub fn new(device: &Device, output_color_format: TextureFormat, window: &Window) -> Self {
        let state = State::new(
            Context::default(),
            egui::viewport::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(Self::MAX_TEXTURE_SIDE),
        );

        // Pas de depth ni de MSAA : le HUD est dessiné par-dessus la passe du ciel.
        let renderer = Renderer::new(device, output_color_format, None, 1, true);

        Self {
            state,
            renderer,
            frame_started: false,
        }
    }

    pub fn context(&self) -> &Context {
        self.state.egui_ctx()
    }

    pub fn handle_input(&mut self, window: &Window, event: &WindowEvent) -> EventResponse {
        self.state.on_window_event(window, event)
    }

    pub fn begin_frame(&mut self, window: &Window) -> Context {
        let raw_input = self.state.take_egui_input(window);
        self.state.egui_ctx().begin_pass(raw_input);
        self.frame_started = true;
        self.context().clone()
    }

    pub fn end_frame_and_draw(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        window_surface_view: &TextureView,
        screen_descriptor: ScreenDescriptor,
    ) {
        if !self.frame_started {
            log::warn!("end_frame_and_draw called without begin_frame; skipping egui");
            return;
        }
        self.frame_started = false;

        self.context()
            .set_pixels_per_point(screen_descriptor.pixels_per_point);

        let output = self.state.egui_ctx().end_pass();
        self.state
            .handle_platform_output(window, output.platform_output);

        let ctx = self.state.egui_ctx();
        let primitives = ctx.tessellate(output.shapes, ctx.pixels_per_point());

        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &primitives, &screen_descriptor);

        let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("egui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: window_surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.renderer
            .render(&mut rpass.forget_lifetime(), &primitives, &screen_descriptor);

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
