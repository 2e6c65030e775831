//! Rendering system with wgpu pipeline and instanced cube drawing.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use log::{info, warn};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::OrbitCamera;
use crate::error::SetupError;
use crate::field::{ElementField, SharedUniforms, VisualElement};
use crate::mesh::{CubeMesh, Vertex};
use crate::params::RenderConfig;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Uniform buffer shared by every cube (camera, lights, fog, time)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    /// View-space depth row: `dot(eye_depth, (world, 1))` is the distance along the view axis
    pub eye_depth: [f32; 4],
    pub light_dir: [f32; 4],
    pub ambient: [f32; 4],
    pub hemi_sky: [f32; 4],
    pub hemi_ground: [f32; 4],
    pub fog_color: [f32; 4],
    pub fog_range: [f32; 2],
    pub resolution: [f32; 2],
    pub time: f32,
    pub box_count: f32,
    pub _padding: [f32; 2], // Padding for alignment
}

impl Uniforms {
    /// Gather per-frame uniforms from camera, shared parameters and scene config
    pub fn new(
        camera: &OrbitCamera,
        shared: &SharedUniforms,
        box_count: usize,
        config: &RenderConfig,
    ) -> Self {
        let lights = &config.lights;
        let [r, g, b] = config.clear_color;
        let [sx, sy, sz] = lights.hemisphere_sky;
        let [gx, gy, gz] = lights.hemisphere_ground;
        let [dx, dy, dz] = lights.directional_dir;
        let depth_row = -camera.view_matrix().row(2);

        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye_depth: depth_row.to_array(),
            light_dir: [dx, dy, dz, lights.directional_intensity],
            ambient: [
                lights.ambient_intensity,
                lights.ambient_intensity,
                lights.ambient_intensity,
                1.0,
            ],
            hemi_sky: [sx, sy, sz, lights.hemisphere_intensity],
            hemi_ground: [gx, gy, gz, 0.0],
            fog_color: [r, g, b, 1.0],
            fog_range: [config.fog_near, config.fog_far],
            resolution: shared.resolution,
            time: shared.time,
            box_count: box_count as f32,
            _padding: [0.0; 2],
        }
    }
}

/// Per-instance data (model matrix + shader params)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    /// id, total count, color offset, unused
    pub params: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4
    ];

    pub fn from_element(element: &VisualElement) -> Self {
        let params = &element.params;
        Self {
            model: element.model_matrix().to_cols_array_2d(),
            params: [
                params.id as f32,
                params.total_count as f32,
                params.color_offset,
                0.0,
            ],
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

/// Rendering system managing wgpu device, pipeline, and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    sample_count: u32,
    render_config: RenderConfig,
}

impl RenderSystem {
    /// Create new rendering system
    ///
    /// # Arguments
    /// * `window` - Target window (must have 'static lifetime via Arc)
    /// * `render_config` - Clear color, MSAA, fog and lights
    /// * `box_size` - Cube edge length (world units)
    /// * `instance_capacity` - Maximum number of cubes drawn per frame
    pub async fn new(
        window: Arc<Window>,
        render_config: &RenderConfig,
        box_size: f32,
        instance_capacity: usize,
    ) -> Result<Self, SetupError> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(SetupError::Adapter)?;

        info!("GPU: {}", adapter.get_info().name);

        // Request device
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        // Fall back to no antialiasing when the format cannot multisample
        let requested = render_config.msaa_samples.max(1);
        let sample_count = if adapter
            .get_texture_format_features(surface_format)
            .flags
            .sample_count_supported(requested)
        {
            requested
        } else {
            warn!("{}x MSAA unsupported for {:?}, disabling", requested, surface_format);
            1
        };

        // Load shaders
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cube Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Create buffers
        let cube = CubeMesh::new(box_size);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&cube.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&cube.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = instance_capacity.max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (instance_capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniforms = Uniforms {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            ..Uniforms::zeroed()
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Create cube render pipeline
        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cube Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &VERTEX_ATTRIBUTES,
                    },
                    InstanceRaw::layout(),
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let depth_view = create_depth_view(&device, &surface_config, sample_count);
        let msaa_view = create_msaa_view(&device, &surface_config, sample_count);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            index_count: cube.indices.len() as u32,
            instance_buffer,
            instance_capacity,
            instance_count: 0,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            msaa_view,
            sample_count,
            render_config: render_config.clone(),
        })
    }

    /// Resize surface and attachments to a new drawing-buffer size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
    }

    /// Reconfigure the surface at its current size (after `Lost`/`Outdated`)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config, self.sample_count);
        self.msaa_view = create_msaa_view(&self.device, &self.surface_config, self.sample_count);
    }

    /// Upload camera, shared uniforms and cube instances for the next frame
    pub fn update_scene(
        &mut self,
        camera: &OrbitCamera,
        shared: &SharedUniforms,
        field: Option<&ElementField>,
    ) {
        let box_count = field.map_or(0, |f| f.len());
        let uniforms = Uniforms::new(camera, shared, box_count, &self.render_config);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let instances: Vec<InstanceRaw> = field
            .map(|f| {
                f.elements()
                    .iter()
                    .take(self.instance_capacity)
                    .map(InstanceRaw::from_element)
                    .collect()
            })
            .unwrap_or_default();

        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.instance_count = instances.len() as u32;
    }

    /// Render a frame
    pub fn render(&self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let [r, g, b] = self.render_config.clear_color;
        let clear = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };

        // Multisampled target resolves into the swapchain image
        let (target, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if self.instance_count > 0 {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_msaa_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("MSAA Color Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ShaderParams;
    use crate::params::OrbitParams;
    use glam::{DVec3, Vec3, Vec4};

    #[test]
    fn test_gpu_struct_sizes() {
        // Must match the WGSL layouts in shader.wgsl
        assert_eq!(std::mem::size_of::<Uniforms>(), 192);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn test_instance_from_element() {
        let element = VisualElement {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: DVec3::ZERO,
            scale: Vec3::splat(0.5),
            params: ShaderParams {
                id: 7,
                total_count: 400,
                color_offset: 0.25,
            },
        };

        let raw = InstanceRaw::from_element(&element);
        assert_eq!(raw.params, [7.0, 400.0, 0.25, 0.0]);
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(raw.model[0][0], 0.5);
    }

    #[test]
    fn test_uniforms_gather_scene_state() {
        let mut camera = OrbitCamera::new(OrbitParams::default(), 1.5);
        camera.orbit(2.0);
        let shared = SharedUniforms {
            time: 2.0,
            resolution: [800.0, 600.0],
        };
        let config = RenderConfig::default();

        let uniforms = Uniforms::new(&camera, &shared, 400, &config);
        assert_eq!(uniforms.time, 2.0);
        assert_eq!(uniforms.resolution, [800.0, 600.0]);
        assert_eq!(uniforms.box_count, 400.0);
        assert_eq!(uniforms.fog_range, [1.0, 10000.0]);
        assert_eq!(uniforms.light_dir, [0.0, 1.0, 1.0, 0.5]);
        assert_eq!(uniforms.view_proj, camera.view_proj().to_cols_array_2d());
    }

    #[test]
    fn test_fog_depth_runs_along_view_axis() {
        let mut camera = OrbitCamera::new(OrbitParams::default(), 1.0);
        camera.orbit(4.0);
        let config = RenderConfig::default();
        let uniforms = Uniforms::new(&camera, &SharedUniforms::default(), 1, &config);
        let depth = |p: Vec3| Vec4::from_array(uniforms.eye_depth).dot(p.extend(1.0));

        // Orbit target sits at the camera distance
        assert!((depth(Vec3::ZERO) - 5000.0).abs() < 0.1);

        // Off-axis points at the same depth fog the same, unlike eye distance
        let eye = camera.position();
        let forward = (camera.target() - eye).normalize();
        let side = forward.cross(Vec3::Y).normalize();
        let off_axis = side * 2000.0;
        assert!((depth(off_axis) - 5000.0).abs() < 0.1);
        assert!(off_axis.distance(eye) > 5300.0);

        // The camera itself is at depth zero
        assert!(depth(eye).abs() < 0.1);
    }

    #[test]
    fn test_vignette_ignores_stale_resolution() {
        let shader = include_str!("shader.wgsl");
        let fragment = &shader[shader.find("fn fs_main").unwrap()..];

        // Resizes never refresh the resolution uniform, so screen position comes from clip space
        assert!(!fragment.contains("u.resolution"));
        assert!(fragment.contains("in.clip.xy / in.clip.w"));
    }
}
