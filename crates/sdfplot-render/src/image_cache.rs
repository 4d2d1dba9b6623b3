//! LRU cache of per-image GPU resources.
//!
//! Images are keyed by dimensions, texture format and a per-frame slot: the n-th image of a
//! given size drawn in a frame reuses the n-th texture of that size from earlier frames, so
//! a steady plot uploads into existing textures instead of allocating new ones.

use std::num::NonZeroUsize;

use ahash::HashMap;
use lru::LruCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageKey {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    /// Occurrence of this size within the current frame.
    pub slot: u32,
}

/// Resources are generic so the keying and eviction rules work without a device.
pub struct ImageCache<T> {
    entries: LruCache<ImageKey, T>,
    slots: HashMap<(u32, u32, wgpu::TextureFormat), u32>,
    frame_images: usize,
}

impl<T> ImageCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            slots: HashMap::default(),
            frame_images: 0,
        }
    }

    /// Forget the slot counters; call once per frame before queuing images.
    pub fn begin_frame(&mut self) {
        self.slots.clear();
        self.frame_images = 0;
    }

    /// Key for the next image of this size in the current frame.
    ///
    /// Grows the cache when a single frame uses more images than it can hold, so no entry
    /// queued this frame is evicted before it is drawn.
    pub fn next_key(&mut self, width: u32, height: u32, format: wgpu::TextureFormat) -> ImageKey {
        let counter = self.slots.entry((width, height, format)).or_insert(0);
        let slot = *counter;
        *counter += 1;

        self.frame_images += 1;
        if self.frame_images > self.entries.cap().get() {
            if let Some(cap) = NonZeroUsize::new(self.frame_images) {
                tracing::debug!("Growing image cache to {} entries", cap);
                self.entries.resize(cap);
            }
        }

        ImageKey {
            width,
            height,
            format,
            slot,
        }
    }

    /// Cached resource for `key`, creating it with `create` on a miss.
    ///
    /// Returns the resource and whether it was freshly created.
    pub fn get_or_insert_with(&mut self, key: ImageKey, create: impl FnOnce() -> T) -> (&T, bool) {
        let created = !self.entries.contains(&key);
        if created && self.entries.len() == self.entries.cap().get() {
            if let Some((evicted, _)) = self.entries.peek_lru() {
                tracing::trace!(
                    "Evicting image texture {}x{} slot {}",
                    evicted.width,
                    evicted.height,
                    evicted.slot
                );
            }
        }
        (self.entries.get_or_insert(key, create), created)
    }

    /// Look up without touching recency.
    pub fn peek(&self, key: &ImageKey) -> Option<&T> {
        self.entries.peek(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.begin_frame();
    }
}
