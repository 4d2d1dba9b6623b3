//! Offscreen render target with synchronous pixel readback.
//!
//! ```ignore
//! let capture = FrameCapture::new(&context, 800, 600)?;
//! let mut encoder = context.device().create_command_encoder(&Default::default());
//! renderer.render(&mut encoder, capture.view(), Color::WHITE);
//! let pixels = capture.copy_and_readback(&context, encoder)?;
//! ```

use sdfplot_core::profiling::profile_function;

use crate::GraphicsContext;

/// Frame capture error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Buffer mapping failed
    MapFailed(String),
    /// Width or height is zero
    InvalidDimensions,
    /// Image encoding failed
    EncodeFailed(String),
    /// IO error
    Io(String),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapFailed(msg) => write!(f, "Buffer mapping failed: {}", msg),
            Self::InvalidDimensions => write!(f, "Invalid dimensions for capture"),
            Self::EncodeFailed(msg) => write!(f, "Image encoding failed: {}", msg),
            Self::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

const BYTES_PER_PIXEL: u32 = 4;

/// Row pitch of the staging buffer: `width * 4` rounded up to the copy alignment (256).
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * BYTES_PER_PIXEL).div_ceil(align) * align
}

/// Drop the per-row padding, returning tightly packed `width * 4` byte rows.
pub fn strip_row_padding(
    data: &[u8],
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
) -> Vec<u8> {
    let row_bytes = (width * BYTES_PER_PIXEL) as usize;
    let pitch = padded_bytes_per_row as usize;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in data.chunks(pitch).take(height as usize) {
        pixels.extend_from_slice(&row[..row_bytes.min(row.len())]);
    }
    pixels
}

pub struct FrameCapture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    staging: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

impl FrameCapture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub fn new(context: &GraphicsContext, width: u32, height: u32) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::InvalidDimensions);
        }
        let device = context.device();

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Capture Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_bytes_per_row = padded_bytes_per_row(width);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Capture Staging"),
            size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Self {
            texture,
            view,
            staging,
            width,
            height,
            padded_bytes_per_row,
        })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        Self::FORMAT
    }

    /// Record the texture-to-buffer copy into `encoder`.
    pub fn copy_to_staging(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            self.texture.size(),
        );
    }

    /// Append the copy to `encoder`, submit it and block until the pixels are on the CPU.
    ///
    /// Returns tightly packed RGBA8 rows, top row first.
    pub fn copy_and_readback(
        &self,
        context: &GraphicsContext,
        mut encoder: wgpu::CommandEncoder,
    ) -> Result<Vec<u8>, CaptureError> {
        profile_function!();

        self.copy_to_staging(&mut encoder);
        context.queue().submit(std::iter::once(encoder.finish()));
        self.read_staging(context)
    }

    /// Map the staging buffer and read it back. The copy must already be submitted.
    pub fn read_staging(&self, context: &GraphicsContext) -> Result<Vec<u8>, CaptureError> {
        let slice = self.staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        if let Err(e) = context.device().poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        }) {
            tracing::error!("Device poll failed during capture: {}", e);
            return Err(CaptureError::MapFailed(e.to_string()));
        }

        let mapped = rx
            .recv()
            .map_err(|e| CaptureError::MapFailed(e.to_string()))
            .and_then(|r| r.map_err(|e| CaptureError::MapFailed(e.to_string())));
        if let Err(e) = mapped {
            tracing::error!("Staging buffer map failed: {}", e);
            return Err(e);
        }

        let data = slice.get_mapped_range();
        let pixels = strip_row_padding(&data, self.width, self.height, self.padded_bytes_per_row);
        drop(data);
        self.staging.unmap();

        Ok(pixels)
    }
}

/// Encode tightly packed RGBA8 pixels as a PNG file.
#[cfg(feature = "image")]
pub fn save_png(
    path: impl AsRef<std::path::Path>,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
) -> Result<(), CaptureError> {
    let img = image::RgbaImage::from_raw(width, height, pixels).ok_or(
        CaptureError::EncodeFailed("pixel buffer does not match dimensions".to_string()),
    )?;
    img.save(path).map_err(|e| CaptureError::Io(e.to_string()))
}
