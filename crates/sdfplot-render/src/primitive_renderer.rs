//! Batched SDF primitive renderer.
//!
//! Every shape of a frame is collected into one [`InstanceBatch`], uploaded to a single
//! grow-only instance buffer and drawn with two pipelines sharing one shader module: faces
//! (rects, markers, triangles) first, then overlay shapes (lines, glyphs, images).
//!
//! ```ignore
//! let mut renderer =
//!     PrimitiveRenderer::new(context.clone(), FrameCapture::FORMAT, 800, 600, Default::default());
//! renderer.clear(Color::WHITE);
//! renderer.draw_rects(&[Rect::new(10.0, 10.0, 50.0, 20.0, Color::BLUE)], Vec2::new(800.0, 600.0));
//! renderer.render_to_view(&mut encoder, capture.view());
//! ```

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use sdfplot_core::profiling::{profile_function, profile_scope};

use crate::batch::{DrawCommand, InstanceBatch, PipelineKind, TextureBinding, grown_capacity};
use crate::colormap::colorize;
use crate::config::RendererConfig;
use crate::font_atlas::{FontAtlas, fallback_measure};
use crate::image_cache::{ImageCache, ImageKey};
use crate::instance::{Instance, Uniforms};
use crate::renderer::{Circle, ImageData, Line, PlotRenderer, Rect, ScreenRect, Triangle};
use crate::{Color, GraphicsContext};

const SHADER: &str = include_str!("shaders/primitives.wgsl");

/// Texture format of uploaded images.
pub const IMAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Counters for the most recent [`PrimitiveRenderer::prepare`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: usize,
    pub face_instances: usize,
    pub overlay_instances: usize,
    pub images: usize,
}

/// Scissor rectangle clamped to a `width` x `height` target, as `(x, y, w, h)`.
///
/// Returns `None` when nothing of `rect` lies inside the target.
pub fn scissor_pixels(rect: ScreenRect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let rect = rect.normalized();
    let x0 = rect.x.max(0.0).floor() as u32;
    let y0 = rect.y.max(0.0).floor() as u32;
    let x1 = ((rect.x + rect.width).max(0.0).ceil() as u32).min(width);
    let y1 = ((rect.y + rect.height).max(0.0).ceil() as u32).min(height);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0, y0, x1 - x0, y1 - y0))
}

/// GPU texture and bind group for one queued image.
struct GpuImage {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl GpuImage {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Plot Image Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: IMAGE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group =
            texture_bind_group(device, layout, &view, sampler, "Plot Image Bind Group");
        Self {
            texture,
            bind_group,
        }
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Primitive Instance Buffer"),
        size: Instance::SIZE * capacity.max(1) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    tracing::debug!("Creating {} for {:?}", label, format);

    let blend = wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Instance::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// GPU implementation of [`PlotRenderer`].
pub struct PrimitiveRenderer {
    context: Arc<GraphicsContext>,
    config: RendererConfig,
    faces_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    image_sampler: wgpu::Sampler,
    atlas_bind_group: wgpu::BindGroup,
    font: Option<FontAtlas>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    batch: InstanceBatch,
    plan: Vec<DrawCommand>,
    images: ImageCache<GpuImage>,
    frame_images: Vec<ImageKey>,
    width: u32,
    height: u32,
    view_proj: Option<Mat4>,
    camera_pos: Vec3,
    scissor: Option<ScreenRect>,
    clear_color: Color,
    stats: RenderStats,
}

impl PrimitiveRenderer {
    /// Build the pipelines for `target_format` and bake the configured font.
    ///
    /// A font that fails to load is logged and text drawing becomes a no-op.
    pub fn new(
        context: Arc<GraphicsContext>,
        target_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: RendererConfig,
    ) -> Self {
        profile_function!();
        let device = context.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Primitive Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Primitive Uniform Layout"),
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

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Primitive Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Primitive Uniform Buffer"),
            size: Uniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        context.queue().write_buffer(
            &uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::screen(width, height)),
        );

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Primitive Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Primitive Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let faces_pipeline = create_pipeline(
            device,
            "Primitive Faces Pipeline",
            &pipeline_layout,
            &shader,
            target_format,
        );
        let overlay_pipeline = create_pipeline(
            device,
            "Primitive Overlay Pipeline",
            &pipeline_layout,
            &shader,
            target_format,
        );

        let atlas_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Font Atlas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let image_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Plot Image Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let font = match FontAtlas::from_source(&config.font, config.bake_size) {
            Ok(font) => font,
            Err(e) => {
                tracing::warn!("Font atlas unavailable, text will not be drawn: {}", e);
                None
            }
        };

        let atlas_view = Self::create_atlas_view(&context, font.as_ref());
        let atlas_bind_group = texture_bind_group(
            device,
            &texture_layout,
            &atlas_view,
            &atlas_sampler,
            "Font Atlas Bind Group",
        );

        let instance_capacity = config.initial_capacity.max(1);
        let instance_buffer = create_instance_buffer(device, instance_capacity);

        Self {
            images: ImageCache::new(config.image_cache_capacity),
            batch: InstanceBatch::with_capacity(instance_capacity),
            clear_color: config.clear_color,
            context,
            config,
            faces_pipeline,
            overlay_pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            image_sampler,
            atlas_bind_group,
            font,
            instance_buffer,
            instance_capacity,
            plan: Vec::new(),
            frame_images: Vec::new(),
            width: width.max(1),
            height: height.max(1),
            view_proj: None,
            camera_pos: Vec3::ZERO,
            scissor: None,
            stats: RenderStats::default(),
        }
    }

    /// Upload the atlas bitmap, or a 1x1 placeholder so group 1 is always bindable.
    fn create_atlas_view(context: &GraphicsContext, font: Option<&FontAtlas>) -> wgpu::TextureView {
        let (size, pixels): (u32, &[u8]) = match font {
            Some(atlas) => (FontAtlas::SIZE, atlas.bitmap()),
            None => (1, &[0u8]),
        };
        let extent = wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        };
        let texture = context.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Font Atlas Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        context.queue().write_texture(
            texture.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size),
                rows_per_image: Some(size),
            },
            extent,
        );
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn context(&self) -> &Arc<GraphicsContext> {
        &self.context
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn font(&self) -> Option<&FontAtlas> {
        self.font.as_ref()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Instance slots currently allocated on the GPU.
    pub fn instance_capacity(&self) -> usize {
        self.instance_capacity
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Update the target size. Only the projection changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    fn track_screen(&mut self, screen: Vec2) {
        let (w, h) = (screen.x.round() as u32, screen.y.round() as u32);
        if w > 0 && h > 0 && (w, h) != (self.width, self.height) {
            self.resize(w, h);
        }
    }

    /// Sort the batch, upload uniforms and instances, and build the draw plan.
    pub fn prepare(&mut self) {
        profile_function!();

        let uniforms = Uniforms::new(self.width, self.height, self.view_proj, self.camera_pos);
        self.context
            .queue()
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        self.plan = self.batch.plan();
        let split = self.batch.split();
        self.stats = RenderStats {
            draw_calls: self.plan.len(),
            face_instances: split,
            overlay_instances: self.batch.len() - split,
            images: self.batch.image_count(),
        };

        let required = self.batch.total_len();
        if required == 0 {
            return;
        }

        let capacity = grown_capacity(self.instance_capacity, required, self.config.headroom);
        if capacity != self.instance_capacity {
            tracing::debug!(
                "Growing instance buffer from {} to {} instances",
                self.instance_capacity,
                capacity
            );
            self.instance_buffer = create_instance_buffer(self.context.device(), capacity);
            self.instance_capacity = capacity;
        }

        profile_scope!("upload_instances");
        let data = self.batch.upload_data();
        self.context
            .queue()
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&data));
    }

    /// Record the prepared draws into `pass`.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        profile_function!();

        if self.plan.is_empty() {
            return;
        }

        if let Some(scissor) = self.scissor {
            match scissor_pixels(scissor, self.width, self.height) {
                Some((x, y, w, h)) => pass.set_scissor_rect(x, y, w, h),
                None => return,
            }
        }

        pass.push_debug_group("plot primitives");
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));

        for command in &self.plan {
            let bind_group = match command.binding {
                TextureBinding::Atlas => &self.atlas_bind_group,
                TextureBinding::Image(index) => {
                    match self
                        .frame_images
                        .get(index)
                        .and_then(|key| self.images.peek(key))
                    {
                        Some(image) => &image.bind_group,
                        None => continue,
                    }
                }
            };
            let pipeline = match command.pipeline {
                PipelineKind::Faces => &self.faces_pipeline,
                PipelineKind::Overlay => &self.overlay_pipeline,
            };
            pass.set_pipeline(pipeline);
            pass.set_bind_group(1, bind_group, &[]);
            pass.draw(0..6, command.instances.clone());
        }

        pass.pop_debug_group();
    }

    /// Prepare, then draw the frame into `view` cleared to the frame's clear color.
    pub fn render_to_view(&mut self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        self.prepare();

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Plot Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.render(&mut pass);
    }

    fn upload_image(&mut self, image: &ImageData) -> ImageKey {
        let (width, height) = (image.width, image.height);
        let key = self.images.next_key(width, height, IMAGE_FORMAT);

        let device = self.context.device();
        let layout = &self.texture_layout;
        let sampler = &self.image_sampler;
        let (gpu, created) = self.images.get_or_insert_with(key, || {
            GpuImage::new(device, layout, sampler, width, height)
        });
        if created {
            tracing::trace!("Created image texture {}x{} slot {}", width, height, key.slot);
        }

        let pixels = colorize(image);
        self.context.queue().write_texture(
            gpu.texture.as_image_copy(),
            &pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        key
    }
}

impl PlotRenderer for PrimitiveRenderer {
    fn set_view_projection(&mut self, view_proj: Option<Mat4>) {
        self.view_proj = view_proj;
    }

    fn set_camera_position(&mut self, position: Vec3) {
        self.camera_pos = position;
    }

    fn set_scissor_rect(&mut self, rect: ScreenRect) {
        self.scissor = Some(rect);
    }

    fn disable_scissor(&mut self) {
        self.scissor = None;
    }

    fn draw_rects(&mut self, rects: &[Rect], screen: Vec2) {
        self.track_screen(screen);
        self.batch.extend(
            rects
                .iter()
                .filter(|r| !r.color.is_invisible())
                .map(Rect::to_instance),
        );
    }

    fn draw_lines(&mut self, lines: &[Line], screen: Vec2) {
        self.track_screen(screen);
        self.batch.extend(
            lines
                .iter()
                .filter(|l| !l.color.is_invisible())
                .map(Line::to_instance),
        );
    }

    fn draw_circles(&mut self, circles: &[Circle], screen: Vec2) {
        self.track_screen(screen);
        self.batch.extend(
            circles
                .iter()
                .filter(|c| !c.color.is_invisible())
                .map(Circle::to_instance),
        );
    }

    fn draw_triangles(&mut self, triangles: &[Triangle], screen: Vec2) {
        self.track_screen(screen);
        self.batch.extend(
            triangles
                .iter()
                .filter(|t| !t.color.is_invisible())
                .map(Triangle::to_instance),
        );
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color, rotation: f32) {
        if let Some(font) = &self.font {
            self.batch
                .extend(font.layout(text, position, size, color, rotation));
        }
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        match &self.font {
            Some(font) => font.measure(text, size),
            None => fallback_measure(text, size),
        }
    }

    fn clear(&mut self, color: Color) {
        self.batch.clear();
        self.plan.clear();
        self.images.begin_frame();
        self.frame_images.clear();
        self.scissor = None;
        self.clear_color = color.sanitized();
    }

    fn draw_image(&mut self, image: &ImageData, dest: ScreenRect) {
        if !image.is_valid() {
            tracing::warn!(
                "Skipping image {}x{} with {} values",
                image.width,
                image.height,
                image.values.len()
            );
            return;
        }
        let dest = dest.normalized();
        let key = self.upload_image(image);
        self.frame_images.push(key);
        self.batch
            .push_image(Instance::image(dest.x, dest.y, dest.width, dest.height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_is_clamped_to_target() {
        let rect = ScreenRect::new(-10.0, 20.0, 100.0, 1000.0);
        assert_eq!(scissor_pixels(rect, 800, 600), Some((0, 20, 90, 580)));
    }

    #[test]
    fn scissor_outside_target_is_empty() {
        assert_eq!(scissor_pixels(ScreenRect::new(900.0, 0.0, 10.0, 10.0), 800, 600), None);
        assert_eq!(scissor_pixels(ScreenRect::new(5.0, 5.0, 0.0, 10.0), 800, 600), None);
    }

    #[test]
    fn scissor_accepts_negative_extent() {
        let rect = ScreenRect::new(50.0, 50.0, -20.0, -10.0);
        assert_eq!(scissor_pixels(rect, 800, 600), Some((30, 40, 20, 10)));
    }

    #[test]
    fn shader_declares_both_entry_points() {
        assert!(SHADER.contains("fn vs_main"));
        assert!(SHADER.contains("fn fs_main"));
    }
}
