//! Offscreen plotting: draw through a [`PlotBackend`] and read the frame back as RGBA.

use std::fmt;
use std::sync::Arc;

use sdfplot_backend::{BackendConfig, PlotBackend};
use sdfplot_render::{
    CaptureError, FrameCapture, GraphicsContext, GraphicsError, PrimitiveRenderer, RendererConfig,
    wgpu,
};

/// Errors that can occur while setting up or capturing a headless plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessError {
    /// No GPU device could be acquired.
    Graphics(GraphicsError),
    /// The offscreen target could not be created or read back.
    Capture(CaptureError),
}

impl fmt::Display for HeadlessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadlessError::Graphics(e) => write!(f, "Graphics error: {}", e),
            HeadlessError::Capture(e) => write!(f, "Capture error: {}", e),
        }
    }
}

impl std::error::Error for HeadlessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HeadlessError::Graphics(e) => Some(e),
            HeadlessError::Capture(e) => Some(e),
        }
    }
}

impl From<GraphicsError> for HeadlessError {
    fn from(err: GraphicsError) -> Self {
        HeadlessError::Graphics(err)
    }
}

impl From<CaptureError> for HeadlessError {
    fn from(err: CaptureError) -> Self {
        HeadlessError::Capture(err)
    }
}

/// A plot backend wired to an offscreen GPU target.
///
/// ```rust,no_run
/// use sdfplot::HeadlessPlot;
///
/// let mut plot = HeadlessPlot::new(640, 480)?;
/// let backend = plot.backend_mut();
/// backend.new_frame();
/// backend.draw_path(&[0.0, 320.0, 640.0], &[0.0, 480.0, 0.0], [0.0, 0.0, 0.0, 1.0], "-");
/// let pixels = plot.render()?;
/// assert_eq!(pixels.len(), 640 * 480 * 4);
/// # Ok::<(), sdfplot::HeadlessError>(())
/// ```
pub struct HeadlessPlot {
    context: Arc<GraphicsContext>,
    capture: FrameCapture,
    backend: PlotBackend<PrimitiveRenderer>,
}

impl HeadlessPlot {
    /// Acquire a GPU and create a `width` x `height` plot with default settings.
    pub fn new(width: u32, height: u32) -> Result<Self, HeadlessError> {
        let context = GraphicsContext::new_owned_sync()?;
        Self::with_config(
            context,
            BackendConfig::new().with_render_size(width, height),
            RendererConfig::default(),
        )
    }

    /// Build on an existing context. The target size is taken from `backend_config`.
    pub fn with_config(
        context: Arc<GraphicsContext>,
        backend_config: BackendConfig,
        renderer_config: RendererConfig,
    ) -> Result<Self, HeadlessError> {
        let (width, height) = (backend_config.render_width, backend_config.render_height);
        let capture = FrameCapture::new(&context, width, height)?;
        let renderer = PrimitiveRenderer::new(
            context.clone(),
            FrameCapture::FORMAT,
            width,
            height,
            renderer_config,
        );
        tracing::info!("Headless plot ready ({}x{})", width, height);

        Ok(Self {
            context,
            capture,
            backend: PlotBackend::with_config(renderer, backend_config),
        })
    }

    pub fn context(&self) -> &Arc<GraphicsContext> {
        &self.context
    }

    pub fn backend(&self) -> &PlotBackend<PrimitiveRenderer> {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut PlotBackend<PrimitiveRenderer> {
        &mut self.backend
    }

    pub fn width(&self) -> u32 {
        self.capture.width()
    }

    pub fn height(&self) -> u32 {
        self.capture.height()
    }

    /// Submit the queued shapes, draw them offscreen and return tightly packed RGBA8 rows.
    pub fn render(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.backend.render_data();

        let device = self.context.device();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Headless Plot Encoder"),
        });
        self.backend
            .renderer_mut()
            .render_to_view(&mut encoder, self.capture.view());
        self.capture.copy_and_readback(&self.context, encoder)
    }

    /// Render and write the frame to `path` as PNG.
    #[cfg(feature = "image")]
    pub fn save_png(&mut self, path: impl AsRef<std::path::Path>) -> Result<(), CaptureError> {
        let pixels = self.render()?;
        sdfplot_render::save_png(path, self.width(), self.height(), pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_and_source() {
        let err: HeadlessError = GraphicsError::NoAdapter.into();
        assert_eq!(err.to_string(), "Graphics error: No suitable GPU adapter found");
        assert!(std::error::Error::source(&err).is_some());

        let err: HeadlessError = CaptureError::InvalidDimensions.into();
        assert!(matches!(err, HeadlessError::Capture(_)));
    }

    #[test]
    #[ignore] // Requires GPU
    fn renders_background_fill() {
        let mut plot = HeadlessPlot::new(64, 48).expect("GPU");
        let backend = plot.backend_mut();
        backend.new_frame();
        backend.draw_background([0.0, 1.0, 0.0, 0.0]);
        let pixels = plot.render().expect("readback");
        assert_eq!(pixels.len(), 64 * 48 * 4);
        let center = (24 * 64 + 32) * 4;
        assert_eq!(&pixels[center..center + 4], &[255, 0, 0, 255]);
    }

    #[cfg(feature = "image")]
    #[test]
    #[ignore] // Requires GPU
    fn saves_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plot.png");
        let mut plot = HeadlessPlot::new(32, 32).expect("GPU");
        plot.backend_mut().new_frame();
        plot.save_png(&path).expect("save");
        assert!(path.is_file());
    }
}
