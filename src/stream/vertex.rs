//! Vertex data container.
//!
//! A [`VertexStream`] owns one contiguous byte buffer per layout binding,
//! each sized `vertex_count * binding_stride`. The importer reserves it
//! once, writes through the raw record accessors, and the stream is
//! read-only for the rest of its life (device upload traverses the bytes).

use super::layout::VertexStreamLayout;

/// Byte-buffer vertex container addressed by a configured layout.
#[derive(Debug, Clone, Default)]
pub struct VertexStream {
    layout: VertexStreamLayout,
    buffers: Vec<Vec<u8>>,
    vertex_count: u32,
    reserved: u32,
}

impl VertexStream {
    /// Create an empty stream with an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with a pre-configured layout.
    pub fn with_layout(layout: VertexStreamLayout) -> Self {
        let mut stream = Self::new();
        stream.set_layout(layout);
        stream
    }

    /// Configure the layout. Must happen before any vertex data exists.
    ///
    /// # Panics
    ///
    /// Panics if the stream already holds reserved vertex data - the layout
    /// is write-once by contract.
    pub fn set_layout(&mut self, layout: VertexStreamLayout) {
        assert_eq!(
            self.reserved, 0,
            "vertex layout must be configured before data is reserved"
        );
        self.buffers = vec![Vec::new(); layout.binding_count() as usize];
        self.layout = layout;
    }

    /// The configured layout.
    pub fn layout(&self) -> &VertexStreamLayout {
        &self.layout
    }

    /// Grow the backing storage to hold at least `vertex_count` vertices at
    /// the configured strides. No-op if capacity already suffices; never
    /// shrinks. New bytes are zeroed.
    pub fn reserve(&mut self, vertex_count: u32) {
        if vertex_count <= self.reserved {
            return;
        }
        self.reserved = vertex_count;
        for (binding, buffer) in self.buffers.iter_mut().enumerate() {
            let stride = self.layout.stride(binding as u32) as usize;
            buffer.resize(vertex_count as usize * stride, 0);
        }
    }

    /// Set the logical vertex count without reserving.
    ///
    /// The caller must have reserved enough capacity; used when the final
    /// count is known in a separate pass from allocation.
    pub fn force_vertex_count(&mut self, vertex_count: u32) {
        debug_assert!(
            vertex_count <= self.reserved,
            "forcing a vertex count past the reserved capacity"
        );
        self.vertex_count = vertex_count;
    }

    /// Current logical vertex count.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Per-vertex byte stride of a binding.
    pub fn stride(&self, binding: u32) -> u32 {
        self.layout.stride(binding)
    }

    /// Per-vertex byte stride of binding 0 (the common single-binding path).
    pub fn vertex_stride(&self) -> u32 {
        self.layout.stride(0)
    }

    /// Total byte size across all bindings (logical, not reserved).
    pub fn byte_size(&self) -> usize {
        (0..self.buffers.len() as u32)
            .map(|b| self.vertex_count as usize * self.layout.stride(b) as usize)
            .sum()
    }

    /// Raw bytes of one binding's buffer (logical length).
    pub fn bytes(&self, binding: u32) -> &[u8] {
        let len = self.vertex_count as usize * self.layout.stride(binding) as usize;
        &self.buffers[binding as usize][..len]
    }

    /// Mutable raw bytes of one binding's buffer (full reserved length).
    ///
    /// Exclusive writer access for copy algorithms; callers index by
    /// `vertex * stride + offset` themselves on the hot path.
    pub fn bytes_mut(&mut self, binding: u32) -> &mut [u8] {
        &mut self.buffers[binding as usize]
    }

    /// One vertex record of a binding, as a mutable byte slice.
    pub fn vertex_mut(&mut self, binding: u32, vertex_index: u32) -> &mut [u8] {
        let stride = self.layout.stride(binding) as usize;
        let start = vertex_index as usize * stride;
        &mut self.buffers[binding as usize][start..start + stride]
    }
}
