//! Test utilities for sdfplot.
//!
//! [`RecordingRenderer`] implements [`PlotRenderer`](sdfplot_render::PlotRenderer) by
//! recording every call, so translation-layer behavior can be asserted without a GPU.
//!
//! # Example
//!
//! ```rust
//! use sdfplot_render::{Color, PlotRenderer, Rect};
//! use sdfplot_test_utils::RecordingRenderer;
//! use glam::Vec2;
//!
//! let mut renderer = RecordingRenderer::new();
//! renderer.clear(Color::WHITE);
//! renderer.draw_rects(&[Rect::new(0.0, 0.0, 4.0, 4.0, Color::RED)], Vec2::new(100.0, 100.0));
//!
//! assert_eq!(renderer.rects().len(), 1);
//! assert_eq!(renderer.call_count(), 2);
//! ```

pub mod recording;

pub use recording::*;
