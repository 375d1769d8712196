//! Declarative vertex stream layout.
//!
//! A [`VertexStreamLayout`] describes how vertex attributes are interleaved
//! into one or more binding slots. Attributes are registered in order via
//! [`VertexStreamLayout::set_vertex_type`]; each one is appended after the
//! previously registered attributes of its binding, and the binding's total
//! per-vertex stride is recomputed. There is no removal operation - layouts
//! are write-once-then-frozen by caller convention.

/// Semantic meaning of a vertex attribute.
///
/// Unique within a layout, except that texture-coordinate slots are
/// distinguished by their set index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    /// Vertex position (typically float3).
    Position,
    /// Vertex normal (typically float3).
    Normal,
    /// Vertex tangent (typically float4, w = handedness).
    Tangent,
    /// Vertex color (typically float4 or unorm4).
    Color,
    /// Bone indices for skinning (typically ushort4 or uint4).
    Joints,
    /// Bone weights for skinning (typically float4).
    Weights,
    /// Texture coordinate set `n` (typically float2).
    TexCoord(u32),
}

/// Numeric format of one attribute element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Single 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Single 32-bit unsigned integer.
    Uint,
    /// Two 32-bit unsigned integers.
    Uint2,
    /// Four 32-bit unsigned integers.
    Uint4,
    /// Two 16-bit unsigned integers.
    Ushort2,
    /// Four 16-bit unsigned integers.
    Ushort4,
    /// Four 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x4,
    /// Four 8-bit signed integers (normalized to -1.0-1.0).
    Snorm8x4,
}

impl VertexFormat {
    /// Element size in bytes.
    pub fn size(&self) -> u32 {
        match self {
            Self::Float | Self::Uint => 4,
            Self::Float2 | Self::Uint2 => 8,
            Self::Float3 => 12,
            Self::Float4 | Self::Uint4 => 16,
            Self::Ushort2 => 4,
            Self::Ushort4 => 8,
            Self::Unorm8x4 | Self::Snorm8x4 => 4,
        }
    }
}

/// One registered attribute within a [`VertexStreamLayout`].
///
/// `offset` and the owning binding's stride are derived by the layout; the
/// caller only chooses semantic, format, and binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLayout {
    /// Semantic of this attribute.
    pub semantic: VertexSemantic,
    /// Numeric format of one element.
    pub format: VertexFormat,
    /// Byte offset within one interleaved vertex record of the binding.
    pub offset: u32,
    /// Binding slot this attribute is interleaved into.
    pub binding: u32,
}

impl AttributeLayout {
    /// Element size in bytes, derived from the format.
    pub fn stride(&self) -> u32 {
        self.format.size()
    }
}

/// Ordered set of attribute registrations plus derived per-binding strides.
///
/// Invariant: offsets within one binding are non-overlapping, and the
/// binding's stride equals the sum of its attributes' element sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexStreamLayout {
    entries: Vec<AttributeLayout>,
    strides: Vec<u32>,
}

impl VertexStreamLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace one attribute's format for a binding.
    ///
    /// A new semantic is appended after the previously registered attributes
    /// of its binding; re-registering an existing semantic replaces its
    /// format (and binding) in place. Offsets and strides are recomputed
    /// either way.
    pub fn set_vertex_type(
        &mut self,
        semantic: VertexSemantic,
        format: VertexFormat,
        binding: u32,
    ) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.semantic == semantic) {
            entry.format = format;
            entry.binding = binding;
        } else {
            self.entries.push(AttributeLayout {
                semantic,
                format,
                offset: 0,
                binding,
            });
        }
        self.repack();
    }

    /// Recompute offsets and per-binding strides from registration order.
    fn repack(&mut self) {
        let binding_count = self
            .entries
            .iter()
            .map(|e| e.binding + 1)
            .max()
            .unwrap_or(0);
        self.strides = vec![0; binding_count as usize];
        for entry in &mut self.entries {
            let cursor = &mut self.strides[entry.binding as usize];
            entry.offset = *cursor;
            *cursor += entry.format.size();
        }
    }

    /// Ordered list of registered attributes.
    pub fn layouts(&self) -> &[AttributeLayout] {
        &self.entries
    }

    /// Total per-vertex byte size for a binding (0 for unknown bindings).
    pub fn stride(&self, binding: u32) -> u32 {
        self.strides.get(binding as usize).copied().unwrap_or(0)
    }

    /// Number of binding slots (highest registered binding + 1).
    pub fn binding_count(&self) -> u32 {
        self.strides.len() as u32
    }

    /// Number of attributes interleaved into a binding.
    pub fn binding_attribute_count(&self, binding: u32) -> u32 {
        self.entries.iter().filter(|e| e.binding == binding).count() as u32
    }

    /// Look up an attribute by semantic.
    pub fn attribute(&self, semantic: VertexSemantic) -> Option<&AttributeLayout> {
        self.entries.iter().find(|e| e.semantic == semantic)
    }

    /// Check if a semantic is registered.
    pub fn has_semantic(&self, semantic: VertexSemantic) -> bool {
        self.attribute(semantic).is_some()
    }

    /// True if no attribute has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
