//! CPU-side shadow copy of select mesh data.
//!
//! A [`ShadowData`] block mirrors the remapped index buffer plus five
//! tracked attributes (position, normal, texcoord0, joints, weights, in
//! that fixed order) into a single flat allocation, each attribute kept in
//! its raw source format. The block is built and returned by the importer
//! and owned by the caller; region boundaries are computed once at
//! allocation time and validated in debug builds.

use crate::stream::IndexFormat;

/// The five attribute slots a shadow block tracks, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackedAttr {
    Position,
    Normal,
    TexCoord0,
    Joints,
    Weights,
}

impl TrackedAttr {
    pub(crate) const COUNT: usize = 5;

    fn slot(self) -> usize {
        match self {
            Self::Position => 0,
            Self::Normal => 1,
            Self::TexCoord0 => 2,
            Self::Joints => 3,
            Self::Weights => 4,
        }
    }
}

/// One sub-region of the flat shadow allocation.
#[derive(Debug, Clone, Copy, Default)]
struct Region {
    offset: usize,
    elem_size: usize,
    count: usize,
}

impl Region {
    fn byte_len(&self) -> usize {
        self.elem_size * self.count
    }
}

/// Flat, GPU-independent mirror of indices and tracked vertex attributes.
///
/// Layout: remapped indices (native width) first, then one contiguous
/// array per tracked attribute. Attributes absent from the source document
/// have zero-length regions.
#[derive(Debug, Clone)]
pub struct ShadowData {
    data: Vec<u8>,
    index_format: IndexFormat,
    indices: Region,
    attributes: [Region; TrackedAttr::COUNT],
    vertex_count: u32,
}

impl ShadowData {
    /// Allocate a zeroed block sized from the aggregate counts.
    ///
    /// `elem_sizes` are the per-attribute source element sizes in tracked
    /// order; a zero size marks an absent attribute.
    pub(crate) fn allocate(
        index_format: IndexFormat,
        index_count: u32,
        vertex_count: u32,
        elem_sizes: [usize; TrackedAttr::COUNT],
    ) -> Self {
        let indices = Region {
            offset: 0,
            elem_size: index_format.size() as usize,
            count: index_count as usize,
        };

        let mut cursor = indices.byte_len();
        let mut attributes = [Region::default(); TrackedAttr::COUNT];
        for (region, &elem_size) in attributes.iter_mut().zip(elem_sizes.iter()) {
            *region = Region {
                offset: cursor,
                elem_size,
                count: if elem_size > 0 { vertex_count as usize } else { 0 },
            };
            cursor += region.byte_len();
        }

        debug_assert_eq!(
            cursor,
            indices.byte_len() + attributes.iter().map(Region::byte_len).sum::<usize>()
        );

        Self {
            data: vec![0; cursor],
            index_format,
            indices,
            attributes,
            vertex_count,
        }
    }

    fn region_bytes(&self, region: &Region) -> &[u8] {
        &self.data[region.offset..region.offset + region.byte_len()]
    }

    /// Write one remapped index at `slot`.
    pub(crate) fn write_index(&mut self, slot: u32, value: u32) {
        let width = self.indices.elem_size;
        let at = self.indices.offset + slot as usize * width;
        debug_assert!(at + width <= self.indices.offset + self.indices.byte_len());
        match self.index_format {
            IndexFormat::Uint16 => {
                self.data[at..at + 2].copy_from_slice(&(value as u16).to_le_bytes())
            }
            IndexFormat::Uint32 => self.data[at..at + 4].copy_from_slice(&value.to_le_bytes()),
        }
    }

    /// Mutable bytes plus element size of one tracked attribute region.
    pub(crate) fn attribute_mut(&mut self, attr: TrackedAttr) -> (&mut [u8], usize) {
        let region = self.attributes[attr.slot()];
        let bytes = &mut self.data[region.offset..region.offset + region.byte_len()];
        (bytes, region.elem_size)
    }

    /// Total byte size of the block.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Width of the shadow index array (matches the primary stream).
    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    /// Number of shadow indices.
    pub fn index_count(&self) -> u32 {
        self.indices.count as u32
    }

    /// Number of vertices each non-empty attribute region holds.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Raw little-endian bytes of the remapped index array.
    pub fn index_bytes(&self) -> &[u8] {
        self.region_bytes(&self.indices)
    }

    /// Shadow indices widened to u32.
    pub fn indices_u32(&self) -> Vec<u32> {
        match self.index_format {
            IndexFormat::Uint16 => self
                .index_bytes()
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
                .collect(),
            IndexFormat::Uint32 => self
                .index_bytes()
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        }
    }

    /// Raw position data in source format (empty if the source had none).
    pub fn positions(&self) -> &[u8] {
        self.region_bytes(&self.attributes[TrackedAttr::Position.slot()])
    }

    /// Source element size of one position, in bytes.
    pub fn position_stride(&self) -> usize {
        self.attributes[TrackedAttr::Position.slot()].elem_size
    }

    /// Raw normal data in source format.
    pub fn normals(&self) -> &[u8] {
        self.region_bytes(&self.attributes[TrackedAttr::Normal.slot()])
    }

    /// Source element size of one normal, in bytes.
    pub fn normal_stride(&self) -> usize {
        self.attributes[TrackedAttr::Normal.slot()].elem_size
    }

    /// Raw texcoord0 data in source format.
    pub fn texcoords(&self) -> &[u8] {
        self.region_bytes(&self.attributes[TrackedAttr::TexCoord0.slot()])
    }

    /// Source element size of one texcoord0 element, in bytes.
    pub fn texcoord_stride(&self) -> usize {
        self.attributes[TrackedAttr::TexCoord0.slot()].elem_size
    }

    /// Raw bone-index data in source format.
    pub fn joints(&self) -> &[u8] {
        self.region_bytes(&self.attributes[TrackedAttr::Joints.slot()])
    }

    /// Source element size of one bone-index element, in bytes.
    pub fn joint_stride(&self) -> usize {
        self.attributes[TrackedAttr::Joints.slot()].elem_size
    }

    /// Raw bone-weight data in source format.
    pub fn weights(&self) -> &[u8] {
        self.region_bytes(&self.attributes[TrackedAttr::Weights.slot()])
    }

    /// Source element size of one bone-weight element, in bytes.
    pub fn weight_stride(&self) -> usize {
        self.attributes[TrackedAttr::Weights.slot()].elem_size
    }
}
