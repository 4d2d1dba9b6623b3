//! sdfplot Backend - host plotting calls to SDF primitives
//!
//! This crate sits between a plotting library and a [`PlotRenderer`]:
//! - Logical-to-screen mapping with aspect-preserving scale ([`ViewTransform`])
//! - The host's four-slot color layout ([`fix_color`], [`fix_fill_color`])
//! - Polylines as capsules with round joins, dash styles and marker tokens
//! - Rectangle reconstruction from independently drawn edges
//! - Scalar grid normalization for images and 3D text projection
//!
//! # Example
//!
//! ```
//! use sdfplot_backend::{BackendConfig, PlotBackend};
//! use sdfplot_render::NullRenderer;
//!
//! let config = BackendConfig::new().with_render_size(1600, 1200);
//! let mut backend = PlotBackend::with_config(NullRenderer::new(), config);
//! backend.set_width(800);
//! backend.set_height(600);
//!
//! backend.new_frame();
//! backend.draw_background([0.0, 1.0, 1.0, 1.0]);
//!
//! // A bar drawn as four separate edges.
//! let color = [0.0, 0.2, 0.4, 0.8];
//! backend.draw_path(&[100.0, 300.0], &[50.0, 50.0], color, "-");
//! backend.draw_path(&[300.0, 300.0], &[50.0, 400.0], color, "-");
//! backend.draw_path(&[300.0, 100.0], &[400.0, 400.0], color, "-");
//! backend.draw_path(&[100.0, 100.0], &[400.0, 50.0], color, "-");
//! backend.render_data();
//!
//! // Background plus the merged bar.
//! assert_eq!(backend.renderer().batch().len(), 2);
//! ```
//!
//! [`PlotRenderer`]: sdfplot_render::PlotRenderer

mod backend;
mod color;
mod config;
mod image;
mod markers;
mod path;
mod reconstruct;
mod text;
mod transform;

pub use backend::*;
pub use color::*;
pub use config::*;
pub use image::*;
pub use markers::*;
pub use path::*;
pub use reconstruct::*;
pub use text::*;
pub use transform::*;
