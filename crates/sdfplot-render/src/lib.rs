//! sdfplot Render - batched SDF plotting primitives on wgpu
//!
//! Plot shapes are converted into fixed-size [`Instance`] records and drawn as instanced
//! quads whose coverage is computed per pixel from closed-form signed distance functions.
//!
//! - [`PlotRenderer`]: the drawing interface, with the typed records [`Rect`], [`Line`],
//!   [`Circle`] and [`Triangle`]
//! - [`PrimitiveRenderer`]: the GPU implementation
//! - [`NullRenderer`]: a device-free implementation producing the same draw plan
//! - [`FrameCapture`]: offscreen target with blocking RGBA readback
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sdfplot_render::{
//!     Color, FrameCapture, GraphicsContext, PlotRenderer, PrimitiveRenderer, Rect, RendererConfig,
//! };
//! use glam::Vec2;
//!
//! let context = GraphicsContext::new_owned_sync().expect("no GPU");
//! let capture = FrameCapture::new(&context, 320, 240).expect("capture");
//! let config = RendererConfig::default();
//! let mut renderer =
//!     PrimitiveRenderer::new(context.clone(), FrameCapture::FORMAT, 320, 240, config);
//!
//! renderer.clear(Color::WHITE);
//! let bar = Rect::new(10.0, 10.0, 100.0, 50.0, Color::BLUE);
//! renderer.draw_rects(&[bar], Vec2::new(320.0, 240.0));
//!
//! let mut encoder = context.device().create_command_encoder(&Default::default());
//! renderer.render_to_view(&mut encoder, capture.view());
//! let pixels = capture.copy_and_readback(&context, encoder).expect("readback");
//! assert_eq!(pixels.len(), 320 * 240 * 4);
//! ```

pub mod batch;
pub mod color;
pub mod colormap;
pub mod config;
pub mod context;
pub mod font_atlas;
pub mod frame_capture;
pub mod image_cache;
pub mod instance;
pub mod null_renderer;
pub mod primitive_renderer;
pub mod renderer;
pub mod sdf;

pub use batch::{DrawCommand, InstanceBatch, PipelineKind, TextureBinding};
pub use color::Color;
pub use config::{FontSource, RendererConfig};
pub use context::{GraphicsContext, GraphicsContextDescriptor, GraphicsError};
pub use font_atlas::{FontAtlas, FontError, GlyphInfo};
pub use frame_capture::{CaptureError, FrameCapture};
pub use instance::{Instance, MarkerType, PrimitiveKind, Uniforms};
pub use null_renderer::NullRenderer;
pub use primitive_renderer::{PrimitiveRenderer, RenderStats};
pub use renderer::{Circle, ImageData, Line, PlotRenderer, Rect, ScreenRect, TextCommand, Triangle};

#[cfg(feature = "image")]
pub use frame_capture::save_png;

// Re-export wgpu so callers can build encoders and views without a direct dependency.
pub use wgpu;
