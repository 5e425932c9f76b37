use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes},
};

use crate::error::Result;
use crate::gfx::{camera::CursorState, rendering::RenderEngine, scene::Scene};
use crate::settings::SceneSettings;

/// Window, event loop and render engine around a [`Scene`]
pub struct TartanApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    settings: SceneSettings,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    last_frame: Instant,
    cursor: Option<CursorState>,
}

impl TartanApp {
    pub fn new(settings: SceneSettings, mut scene: Scene) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        scene.background = settings.background;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                settings,
                window: None,
                render_engine: None,
                scene,
                last_frame: Instant::now(),
                cursor: None,
            },
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.app_state.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.app_state.scene
    }

    /// Runs until the window is closed
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl AppState {
    /// Mirrors the current camera's cursor state onto the window
    fn apply_cursor(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let wanted = self.scene.current_camera().settings().cursor;
        if self.cursor == Some(wanted) {
            return;
        }

        let grab = match wanted {
            CursorState::Normal | CursorState::Hidden => window.set_cursor_grab(CursorGrabMode::None),
            CursorState::Grabbed => window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked)),
        };
        if let Err(e) = grab {
            log::warn!("Could not change cursor grab: {}", e);
        }
        window.set_cursor_visible(wanted == CursorState::Normal);
        self.cursor = Some(wanted);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let present_mode = self.settings.present_mode();
        match pollster::block_on(RenderEngine::new(window, width, height, present_mode)) {
            Ok(renderer) => {
                self.scene.resize(width, height);
                self.render_engine = Some(renderer);
                self.last_frame = Instant::now();
            }
            Err(e) => {
                log::error!("Failed to initialise renderer: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(size.width, size.height);
                }
                self.scene.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;

                self.scene.update(delta_time);
                self.apply_cursor();
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.render_frame(&mut self.scene);
                }
            }
            other => {
                self.scene.handle_window_event(&other);
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        self.scene.handle_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
