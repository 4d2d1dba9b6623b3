//! CPU side of the primitive batch: per-frame instance collection, painter ordering and
//! the draw plan executed by [`PrimitiveRenderer`](crate::PrimitiveRenderer).
//!
//! Everything here is GPU-free so the ordering rules can be tested without a device.

use std::ops::Range;

use crate::instance::Instance;

/// Which of the two pipelines a draw uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Rects, circles, markers and triangles.
    Faces,
    /// Lines, glyphs and images, drawn on top of the faces.
    Overlay,
}

/// Texture bound at group 1 for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureBinding {
    /// The font atlas, or a 1x1 placeholder when no font is loaded.
    Atlas,
    /// The n-th image queued this frame.
    Image(usize),
}

/// One instanced draw of six vertices per instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    pub pipeline: PipelineKind,
    /// Instance range inside the uploaded buffer.
    pub instances: Range<u32>,
    pub binding: TextureBinding,
}

impl DrawCommand {
    pub fn instance_count(&self) -> u32 {
        self.instances.end - self.instances.start
    }

    pub fn first_instance(&self) -> u32 {
        self.instances.start
    }
}

/// Draw plan for `split` face instances followed by overlay instances up to `main_len`, and
/// `image_count` single-instance image draws appended after the main array.
pub fn plan_draws(split: usize, main_len: usize, image_count: usize) -> Vec<DrawCommand> {
    let mut draws = Vec::with_capacity(2 + image_count);
    let (split, main_len) = (split as u32, main_len as u32);

    if split > 0 {
        draws.push(DrawCommand {
            pipeline: PipelineKind::Faces,
            instances: 0..split,
            binding: TextureBinding::Atlas,
        });
    }
    if split < main_len {
        draws.push(DrawCommand {
            pipeline: PipelineKind::Overlay,
            instances: split..main_len,
            binding: TextureBinding::Atlas,
        });
    }
    for index in 0..image_count {
        let first = main_len + index as u32;
        draws.push(DrawCommand {
            pipeline: PipelineKind::Overlay,
            instances: first..first + 1,
            binding: TextureBinding::Image(index),
        });
    }
    draws
}

/// Capacity the instance buffer must have to hold `required` records.
///
/// Never shrinks; when `current` is too small the new capacity is `required + headroom`.
pub fn grown_capacity(current: usize, required: usize, headroom: usize) -> usize {
    if required <= current {
        current
    } else {
        required + headroom
    }
}

/// Per-frame instance collection.
#[derive(Debug, Default, Clone)]
pub struct InstanceBatch {
    instances: Vec<Instance>,
    images: Vec<Instance>,
    sorted: bool,
}

impl InstanceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            images: Vec::new(),
            sorted: true,
        }
    }

    #[inline]
    pub fn push(&mut self, instance: Instance) {
        self.instances.push(instance);
        self.sorted = false;
    }

    pub fn extend(&mut self, instances: impl IntoIterator<Item = Instance>) {
        self.instances.extend(instances);
        self.sorted = false;
    }

    /// Queue an image quad; returns its index for [`TextureBinding::Image`].
    pub fn push_image(&mut self, instance: Instance) -> usize {
        self.images.push(instance);
        self.images.len() - 1
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.images.clear();
        self.sorted = true;
    }

    /// Number of non-image instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty() && self.images.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Total records uploaded: main instances then images.
    pub fn total_len(&self) -> usize {
        self.instances.len() + self.images.len()
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn image_instances(&self) -> &[Instance] {
        &self.images
    }

    /// Stable-sort faces before overlay shapes. Submission order is kept within each group.
    pub fn sort(&mut self) {
        if !self.sorted {
            self.instances.sort_by_key(|inst| !inst.is_face());
            self.sorted = true;
        }
    }

    /// Index of the first overlay instance. Only meaningful after [`InstanceBatch::sort`].
    pub fn split(&self) -> usize {
        self.instances.partition_point(Instance::is_face)
    }

    /// Sort, then produce the draw plan for this frame.
    pub fn plan(&mut self) -> Vec<DrawCommand> {
        self.sort();
        plan_draws(self.split(), self.instances.len(), self.images.len())
    }

    /// Records in upload order: sorted main instances followed by image quads.
    pub fn upload_data(&self) -> Vec<Instance> {
        let mut data = Vec::with_capacity(self.total_len());
        data.extend_from_slice(&self.instances);
        data.extend_from_slice(&self.images);
        data
    }
}
