//! Index data container.
//!
//! An [`IndicesStream`] owns a contiguous buffer of fixed-width (16- or
//! 32-bit little-endian) indices. The width is chosen once before the first
//! reservation; values are always relative to the combined vertex buffer
//! once multiple primitives have been merged.

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Size in bytes of one index.
    pub fn size(&self) -> u32 {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// Fixed-width index buffer with reserve/append/merge operations.
///
/// `Clone` duplicates the full backing buffer and all scalar state.
#[derive(Debug, Clone, Default)]
pub struct IndicesStream {
    format: IndexFormat,
    data: Vec<u8>,
    reserved: u32,
    count: u32,
}

impl IndicesStream {
    /// Create an empty stream (Uint16 until configured otherwise).
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the index width. Must precede the first [`Self::reserve`].
    ///
    /// # Panics
    ///
    /// Panics if capacity has already been reserved; changing the width on a
    /// non-empty stream requires an explicit [`Self::reset`] first.
    pub fn set_index_format(&mut self, format: IndexFormat) {
        assert_eq!(
            self.reserved, 0,
            "index format must be set before reserving the buffer"
        );
        self.format = format;
    }

    /// Configured index format.
    pub fn index_format(&self) -> IndexFormat {
        self.format
    }

    /// Byte size of one stored index.
    pub fn index_stride(&self) -> u32 {
        self.format.size()
    }

    /// Drop all data and return to the default (empty, Uint16) state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Grow the reserved capacity to at least `count` indices at the current
    /// width. Monotonic: never shrinks. New bytes are zeroed.
    pub fn reserve(&mut self, count: u32) {
        if count > self.reserved {
            self.reserved = count;
            self.data
                .resize(count as usize * self.format.size() as usize, 0);
        }
    }

    /// Logical number of stored indices.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// True if no index has been written.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Logical byte size of the stored indices.
    pub fn byte_size(&self) -> usize {
        self.count as usize * self.format.size() as usize
    }

    /// Raw little-endian bytes of the stored indices.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.byte_size()]
    }

    /// Append one index in native width at the write cursor.
    ///
    /// Hot-path append: capacity is not re-checked per call, the caller must
    /// have reserved enough up front (debug builds assert).
    pub fn push_fast(&mut self, value: u32) {
        let width = self.format.size() as usize;
        let at = self.count as usize * width;
        debug_assert!(at + width <= self.data.len(), "push past reserved capacity");
        match self.format {
            IndexFormat::Uint16 => {
                debug_assert!(value <= u16::MAX as u32, "index {value} overflows u16");
                self.data[at..at + 2].copy_from_slice(&(value as u16).to_le_bytes());
            }
            IndexFormat::Uint32 => {
                self.data[at..at + 4].copy_from_slice(&value.to_le_bytes());
            }
        }
        self.count += 1;
    }

    /// Bulk-replace the contents with `count` raw indices of `element_size`
    /// bytes each. Logs an error and leaves the stream untouched if
    /// `element_size` does not match the configured width.
    pub fn copy_from_raw(&mut self, count: u32, element_size: u32, bytes: &[u8]) {
        if element_size != self.format.size() {
            log::error!(
                "index copy skipped: element size {element_size} does not match stream width {}",
                self.format.size()
            );
            return;
        }
        self.reserve(count);
        let len = count as usize * element_size as usize;
        self.data[..len].copy_from_slice(&bytes[..len]);
        self.count = count;
    }

    /// Decode the buffer into width-independent u32 values (widening for
    /// 16-bit storage).
    pub fn to_u32_vec(&self) -> Vec<u32> {
        match self.format {
            IndexFormat::Uint16 => self
                .as_bytes()
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
                .collect(),
            IndexFormat::Uint32 => self
                .as_bytes()
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        }
    }

    /// Append another stream's indices, adding `index_offset` to every
    /// appended value, starting at position `min(merge_at, count)`.
    ///
    /// This is an O(n) rewrite of the merged suffix: the source is decoded
    /// via [`Self::to_u32_vec`], offset, and re-encoded at this stream's
    /// width. The resulting count is `max(count, merge_point + source
    /// count)`. Logs an error and skips the merge if the widths differ.
    pub fn full_merge(&mut self, other: &IndicesStream, index_offset: u32, merge_at: u32) {
        if other.format != self.format {
            log::error!(
                "index merge skipped: source width {} does not match destination width {}",
                other.format.size(),
                self.format.size()
            );
            return;
        }
        let src_count = other.count;
        if src_count == 0 {
            return;
        }

        let merge_point = merge_at.min(self.count);
        self.reserve(merge_point + src_count);

        let mut values = other.to_u32_vec();
        for value in &mut values {
            *value += index_offset;
        }

        let start = merge_point as usize * self.format.size() as usize;
        match self.format {
            IndexFormat::Uint16 => {
                let narrowed: Vec<u16> = values.iter().map(|&v| v as u16).collect();
                let bytes: &[u8] = bytemuck::cast_slice(&narrowed);
                self.data[start..start + bytes.len()].copy_from_slice(bytes);
            }
            IndexFormat::Uint32 => {
                let bytes: &[u8] = bytemuck::cast_slice(&values);
                self.data[start..start + bytes.len()].copy_from_slice(bytes);
            }
        }
        self.count = self.count.max(merge_point + src_count);
    }
}
