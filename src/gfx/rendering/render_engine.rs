//! wgpu rendering engine for tartan scenes
//!
//! Owns the surface, device and depth buffer plus one pipeline and one
//! [`ShaderProgram`] per [`ShaderKind`]. Each frame it dispatches the current
//! camera and light sources to both programs, then draws the scene's items
//! with whichever program each model is assigned.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::error::Result;
use crate::gfx::{resources::texture_resource::TextureResource, scene::Scene};

use super::draw::DrawModel;
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::shader::{ShaderKind, ShaderLayouts, ShaderProgram};

const FRAME_BIND_GROUP: u32 = 0;

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    layouts: ShaderLayouts,
    lighted: ShaderProgram,
    unlighted: ShaderProgram,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// Fails if no adapter or device is available or a shader doesn't
    /// validate.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        present_mode: wgpu::PresentMode,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let layouts = ShaderLayouts::new(&device);
        let mut pipeline_manager = PipelineManager::new(device.clone());
        for kind in ShaderKind::ALL {
            pipeline_manager.load_shader(kind.label(), kind.source())?;
            pipeline_manager.register_pipeline(
                kind.label(),
                PipelineConfig::default_with_shader(kind.label())
                    .with_label(&format!("{} Pipeline", kind.label()))
                    .with_cull_mode(None)
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING))
                    .with_bind_group_layouts(vec![
                        layouts.frame.layout.clone(),
                        layouts.model.layout.clone(),
                    ]),
            );
        }
        pipeline_manager.create_all_pipelines()?;

        let lighted = ShaderProgram::new(&device, ShaderKind::Lighted, &layouts);
        let unlighted = ShaderProgram::new(&device, ShaderKind::Unlighted, &layouts);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            layouts,
            lighted,
            unlighted,
        })
    }

    fn program(&self, kind: ShaderKind) -> &ShaderProgram {
        match kind {
            ShaderKind::Lighted => &self.lighted,
            ShaderKind::Unlighted => &self.unlighted,
        }
    }

    /// Draws one frame of `scene`
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame(&mut self, scene: &mut Scene) {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::error!("Failed to acquire surface texture: {}", e);
                return;
            }
        };

        {
            let camera = scene.current_camera();
            let lights = scene.light_sources();
            for program in [&mut self.lighted, &mut self.unlighted] {
                program.use_camera(camera);
                program.use_light_sources(&lights);
                program.upload(&self.queue);
            }
        }

        let background = scene.background;
        let mut items = scene.draw_items();
        for item in items.iter_mut() {
            if !item.model.is_gpu_ready() {
                item.model.init_gpu_resources(&self.device, &self.layouts.model);
            }
            let program = self.program(item.model.shader());
            for unit in item.model.units_mut() {
                let uniform = program.model_uniform(unit, item.parent);
                unit.write_uniform(&self.queue, uniform);
            }
        }

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background[0] as f64,
                            g: background[1] as f64,
                            b: background[2] as f64,
                            a: background[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for item in items.iter() {
                let kind = item.model.shader();
                let Some(pipeline) = self.pipeline_manager.get_pipeline(kind.label()) else {
                    log::error!("Pipeline '{}' is unavailable", kind.label());
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(FRAME_BIND_GROUP, self.program(kind).frame_bind_group(), &[]);
                render_pass.draw_complex_model(&*item.model);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Resizes the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn set_present_mode(&mut self, present_mode: wgpu::PresentMode) {
        self.config.present_mode = present_mode;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
