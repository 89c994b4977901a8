use std::sync::{Arc, Mutex};

use engine::{
    DeltaTimer, EngineResult, HudInfo, PassContext, PassManager, Scene, SkyConfig, SkyMesh,
    SkyPass, Window, WindowFactory, WindowState, lock_state, wgpu,
};
use winit::{event::DeviceEvent, keyboard::KeyCode};

pub struct SkyWindow {
    window: Arc<winit::window::Window>,
    state: Arc<Mutex<WindowState>>,
    scene: Scene,
    pass_manager: PassManager,
    delta_timer: DeltaTimer,
    mesh: SkyMesh,
    mouse_captured: bool,
}

impl SkyWindow {
    pub async fn new(window: winit::window::Window, config: SkyConfig) -> EngineResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let window = Arc::new(window);
        let surface = instance.create_surface(Arc::clone(&window))?;

        let size = window.inner_size();
        let state = WindowState::new(&instance, surface, &window, size.width, size.height).await?;

        let scene = Scene::new("sky", &config.camera, size.width, size.height);

        let mut pass_manager = PassManager::new();
        pass_manager.add(SkyPass::new(&state.device, state.format, &config)?);
        pass_manager.prepare_all(&state.device, &state.queue);
        log::info!(
            "Render passes: {}",
            pass_manager.names().collect::<Vec<_>>().join(", ")
        );

        Ok(Self {
            window,
            state: Arc::new(Mutex::new(state)),
            scene,
            pass_manager,
            delta_timer: DeltaTimer::new(),
            mesh: config.mesh,
            mouse_captured: false,
        })
    }
}

impl Window for SkyWindow {
    fn state(&self) -> &Arc<Mutex<WindowState>> {
        &self.state
    }

    fn window(&self) -> &Arc<winit::window::Window> {
        &self.window
    }

    fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        state: &mut WindowState,
    ) {
        let delta_time = self.delta_timer.update();

        let (dx, dy) = state.take_mouse_delta();
        if dx != 0.0 || dy != 0.0 {
            self.scene.accumulate_mouse(dx, dy);
        }
        self.mouse_captured = state.is_mouse_captured();

        self.scene.update(delta_time);

        let mut ctx = PassContext {
            encoder,
            target: surface_view,
            queue: state.queue(),
            scene: &self.scene,
        };
        self.pass_manager.execute_all(&mut ctx);
    }

    fn draw(&mut self, ctx: &egui::Context) {
        HudInfo::collect(&self.delta_timer, &self.scene, self.mesh, self.mouse_captured).show(ctx);
    }

    fn device_event(&mut self, event: &DeviceEvent) {
        lock_state(&self.state).handle_device_event(event);
    }

    fn on_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        self.scene.handle_key(key, pressed)
    }

    fn on_resized(&mut self, width: u32, height: u32) {
        self.scene.resize(width, height);
    }

    fn set_mouse_capture(&mut self, capture: bool) {
        lock_state(&self.state).set_mouse_capture(&self.window, capture);
        if !capture {
            self.scene.controller.release_all();
        }
        self.mouse_captured = capture;
    }
}

impl WindowFactory for SkyWindow {
    fn create(
        winit_window: winit::window::Window,
        config: SkyConfig,
    ) -> impl Future<Output = EngineResult<Self>> {
        Self::new(winit_window, config)
    }
}
