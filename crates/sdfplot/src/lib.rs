//! sdfplot - GPU plotting primitives drawn with signed distance fields
//!
//! Plotting libraries emit rectangles, polylines, markers, triangles, text and images.
//! sdfplot turns those calls into fixed-size instance records and shades each one per
//! pixel from a closed-form distance function, so every shape is anti-aliased without
//! tessellation.
//!
//! - [`backend`]: the translation layer a host plotting library talks to
//! - [`render`]: the renderer trait, the wgpu implementation and frame capture
//! - [`core`]: logging and profiling setup
//! - [`HeadlessPlot`]: offscreen rendering straight to RGBA pixels
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sdfplot::prelude::*;
//!
//! sdfplot::core::logging::init();
//!
//! let mut plot = HeadlessPlot::new(800, 600)?;
//! let backend = plot.backend_mut();
//! backend.new_frame();
//! backend.draw_background([0.0, 1.0, 1.0, 1.0]);
//! backend.set_line_width(2.0);
//! backend.draw_path(&[50.0, 400.0, 750.0], &[100.0, 500.0, 100.0], [0.0, 0.1, 0.3, 0.8], "-");
//! backend.set_marker_style("s");
//! backend.draw_markers(&[50.0, 400.0, 750.0], &[100.0, 500.0, 100.0], None);
//!
//! let pixels = plot.render()?;
//! assert_eq!(pixels.len(), 800 * 600 * 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `image`: PNG export via [`HeadlessPlot::save_png`]
//! - `profiling-server`: serve puffin scopes to `puffin_viewer`

pub mod headless;

pub use sdfplot_backend as backend;
pub use sdfplot_core as core;
pub use sdfplot_render as render;

pub use headless::{HeadlessError, HeadlessPlot};
pub use sdfplot_backend::{BackendConfig, PlotBackend};
pub use sdfplot_render::{
    Color, GraphicsContext, NullRenderer, PlotRenderer, PrimitiveRenderer, RendererConfig,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::headless::{HeadlessError, HeadlessPlot};

    pub use sdfplot_backend::{BackendConfig, LegacyColor, PlotBackend};
    pub use sdfplot_render::{
        Circle, Color, FontSource, FrameCapture, GraphicsContext, ImageData, Line, MarkerType,
        NullRenderer, PlotRenderer, PrimitiveRenderer, Rect, RendererConfig, ScreenRect,
        Triangle,
    };
}
