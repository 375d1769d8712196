//! The import algorithm.
//!
//! Four passes over the document:
//!
//! 1. load and resolve buffers (see [`super::buffers`]);
//! 2. survey every primitive once - aggregate counts, validate accessors,
//!    record a representative accessor per semantic - and cross-reference
//!    the destination layout against the discovered attributes;
//! 3. copy indices (offset by the running vertex count) and attributes
//!    into the primary streams, primitive by primitive in document order;
//! 4. optionally mirror indices and the tracked attributes into a flat
//!    shadow block.
//!
//! All fatal checks happen in passes 1-2, before the destination
//! containers are touched; the copy passes themselves are infallible.

use std::collections::HashMap;
use std::path::Path;

use gltf::accessor::DataType;

use crate::math::{Aabb, Vec3};
use crate::stream::{IndexFormat, VertexSemantic, VertexStreamLayout};

use super::buffers::resolve_buffers;
use super::error::ImportError;
use super::shadow::{ShadowData, TrackedAttr};
use super::{MeshStreamData, SubMesh};

pub(super) fn import(
    path: &Path,
    out: &mut MeshStreamData,
    want_shadow: bool,
) -> Result<Option<ShadowData>, ImportError> {
    let bytes = read_scene_file(path)?;
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(&bytes)?;
    let buffers = resolve_buffers(&document, blob, path.parent())?;

    let survey = survey_document(&document, &buffers)?;
    let plan = plan_destination(out.vertex.layout(), &survey)?;

    // Fatal checks are done; the containers are mutated from here on.
    let index_format = if survey.vertex_count > u16::MAX as u32 {
        IndexFormat::Uint32
    } else {
        IndexFormat::Uint16
    };
    out.indices.set_index_format(index_format);
    out.indices.reserve(survey.index_count);
    out.vertex.reserve(survey.vertex_count);
    out.vertex.force_vertex_count(survey.vertex_count);
    out.joint_count = survey.joint_count;

    copy_primary(&survey, &plan, out);

    if !want_shadow {
        return Ok(None);
    }
    let mut shadow = ShadowData::allocate(
        index_format,
        survey.index_count,
        survey.vertex_count,
        survey.shadow_elem_sizes(),
    );
    copy_shadow(&survey, &mut shadow);
    Ok(Some(shadow))
}

fn read_scene_file(path: &Path) -> Result<Vec<u8>, ImportError> {
    std::fs::read(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ImportError::NotFound(path.to_path_buf()),
        _ => ImportError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    })
}

/// Map a glTF semantic to the engine semantic. Secondary color/skin sets
/// are ignored; every texcoord set is kept.
fn map_semantic(semantic: &gltf::Semantic) -> Option<VertexSemantic> {
    match semantic {
        gltf::Semantic::Positions => Some(VertexSemantic::Position),
        gltf::Semantic::Normals => Some(VertexSemantic::Normal),
        gltf::Semantic::Tangents => Some(VertexSemantic::Tangent),
        gltf::Semantic::Colors(0) => Some(VertexSemantic::Color),
        gltf::Semantic::Joints(0) => Some(VertexSemantic::Joints),
        gltf::Semantic::Weights(0) => Some(VertexSemantic::Weights),
        gltf::Semantic::TexCoords(set) => Some(VertexSemantic::TexCoord(*set)),
        _ => None,
    }
}

/// A resolved, bounds-safe window into one accessor's data.
#[derive(Debug, Clone, Copy)]
struct AccessorSlice<'a> {
    data: &'a [u8],
    stride: usize,
    elem_size: usize,
    count: usize,
    data_type: DataType,
}

impl<'a> AccessorSlice<'a> {
    fn is_packed(&self) -> bool {
        self.stride == self.elem_size
    }

    /// Bytes of the `index`-th element, clamped to the available data.
    /// Zero-substituted buffers may be shorter than the accessor claims.
    fn element(&self, index: usize) -> &'a [u8] {
        let start = index * self.stride;
        let end = (start + self.elem_size).min(self.data.len());
        &self.data[start.min(end)..end]
    }
}

fn accessor_slice<'a>(
    accessor: &gltf::Accessor<'_>,
    buffers: &'a [Vec<u8>],
) -> Result<AccessorSlice<'a>, ImportError> {
    let view = accessor.view().ok_or_else(|| {
        ImportError::Accessor(format!(
            "accessor {} has no buffer view (sparse accessors are not supported)",
            accessor.index()
        ))
    })?;
    let buffer_index = view.buffer().index();
    let buffer = buffers.get(buffer_index).ok_or_else(|| {
        ImportError::Buffer(format!("buffer index {buffer_index} out of range"))
    })?;

    let elem_size = accessor.data_type().size() * accessor.dimensions().multiplicity();
    let stride = view.stride().unwrap_or(elem_size);
    let start = (view.offset() + accessor.offset()).min(buffer.len());

    Ok(AccessorSlice {
        data: &buffer[start..],
        stride,
        elem_size,
        count: accessor.count(),
        data_type: accessor.data_type(),
    })
}

/// Decode one index value. Falls back to 0 on truncated data (only
/// possible with zero-substituted buffers, already warned about).
fn index_value(slice: &AccessorSlice<'_>, index: usize) -> u32 {
    let element = slice.element(index);
    match slice.data_type {
        DataType::U8 => element.first().copied().unwrap_or(0) as u32,
        DataType::U16 if element.len() >= 2 => {
            u16::from_le_bytes([element[0], element[1]]) as u32
        }
        DataType::U32 if element.len() >= 4 => {
            u32::from_le_bytes([element[0], element[1], element[2], element[3]])
        }
        _ => 0,
    }
}

/// One validated primitive, ready for the copy passes.
struct PrimitiveRecord<'a> {
    index_slice: AccessorSlice<'a>,
    index_count: u32,
    vertex_count: u32,
    attributes: Vec<(VertexSemantic, AccessorSlice<'a>)>,
}

/// Aggregate counts plus validated per-primitive records.
struct Survey<'a> {
    index_count: u32,
    vertex_count: u32,
    joint_count: u32,
    primitives: Vec<PrimitiveRecord<'a>>,
    /// Representative accessor per semantic, last-seen wins. Used for
    /// layout cross-referencing and shadow region sizing.
    representative: HashMap<VertexSemantic, AccessorSlice<'a>>,
}

impl Survey<'_> {
    /// Source element sizes of the five tracked attributes, in shadow
    /// storage order; 0 marks an absent attribute.
    fn shadow_elem_sizes(&self) -> [usize; TrackedAttr::COUNT] {
        let size = |semantic| {
            self.representative
                .get(&semantic)
                .map(|slice| slice.elem_size)
                .unwrap_or(0)
        };
        [
            size(VertexSemantic::Position),
            size(VertexSemantic::Normal),
            size(VertexSemantic::TexCoord(0)),
            size(VertexSemantic::Joints),
            size(VertexSemantic::Weights),
        ]
    }
}

/// Pass 2a: walk every primitive once, validating accessors and summing
/// aggregate counts.
fn survey_document<'a>(
    document: &gltf::Document,
    buffers: &'a [Vec<u8>],
) -> Result<Survey<'a>, ImportError> {
    let mut survey = Survey {
        index_count: 0,
        vertex_count: 0,
        joint_count: 0,
        primitives: Vec::new(),
        representative: HashMap::new(),
    };

    for (mesh_idx, mesh) in document.meshes().enumerate() {
        for (prim_idx, primitive) in mesh.primitives().enumerate() {
            let position = primitive.get(&gltf::Semantic::Positions).ok_or(
                ImportError::MissingPositions {
                    mesh: mesh_idx,
                    primitive: prim_idx,
                },
            )?;
            let vertex_count = position.count() as u32;

            let index_accessor = primitive.indices().ok_or_else(|| {
                ImportError::Accessor(format!(
                    "mesh {mesh_idx} primitive {prim_idx} has no indices \
                     (non-indexed primitives are not supported)"
                ))
            })?;
            if !matches!(
                index_accessor.data_type(),
                DataType::U8 | DataType::U16 | DataType::U32
            ) {
                return Err(ImportError::Accessor(format!(
                    "unsupported index type {:?}",
                    index_accessor.data_type()
                )));
            }
            let index_slice = accessor_slice(&index_accessor, buffers)?;
            let index_count = index_accessor.count() as u32;

            let mut attributes = Vec::new();
            for (semantic, accessor) in primitive.attributes() {
                let Some(mapped) = map_semantic(&semantic) else {
                    continue;
                };
                if accessor.count() as u32 != vertex_count {
                    log::warn!(
                        "mesh {mesh_idx} primitive {prim_idx}: attribute {semantic:?} count {} \
                         does not match position count {vertex_count}, copy will be clamped",
                        accessor.count()
                    );
                }
                let slice = accessor_slice(&accessor, buffers)?;
                survey.representative.insert(mapped, slice);
                attributes.push((mapped, slice));
            }

            survey.index_count += index_count;
            survey.vertex_count += vertex_count;
            survey.primitives.push(PrimitiveRecord {
                index_slice,
                index_count,
                vertex_count,
                attributes,
            });
        }
    }

    for skin in document.skins() {
        survey.joint_count += skin.joints().count() as u32;
    }

    Ok(survey)
}

/// Destination placement of one layout attribute.
struct DstAttribute {
    semantic: VertexSemantic,
    binding: u32,
    offset: usize,
    size: usize,
    /// True when the binding holds only this attribute, enabling the
    /// contiguous bulk-copy path.
    solo_binding: bool,
}

struct DestinationPlan {
    attributes: Vec<DstAttribute>,
}

impl DestinationPlan {
    fn attribute(&self, semantic: VertexSemantic) -> Option<&DstAttribute> {
        self.attributes.iter().find(|a| a.semantic == semantic)
    }
}

/// Pass 2b: cross-reference the destination layout against the source.
///
/// A destination attribute absent from the source is tolerated only for
/// texture-coordinate slots (the pre-zeroed vertex buffer leaves them
/// deterministically zero-filled); any other absence is an error.
fn plan_destination(
    layout: &VertexStreamLayout,
    survey: &Survey<'_>,
) -> Result<DestinationPlan, ImportError> {
    let mut attributes = Vec::new();

    for entry in layout.layouts() {
        if !survey.representative.contains_key(&entry.semantic) {
            if matches!(entry.semantic, VertexSemantic::TexCoord(_)) {
                log::warn!(
                    "destination layout requests {:?} which the document does not provide, \
                     slot will be zero-filled",
                    entry.semantic
                );
            } else {
                return Err(ImportError::UnsupportedLayout(format!(
                    "destination layout requests {:?} but the document provides no such attribute",
                    entry.semantic
                )));
            }
        }
        attributes.push(DstAttribute {
            semantic: entry.semantic,
            binding: entry.binding,
            offset: entry.offset as usize,
            size: entry.format.size() as usize,
            solo_binding: layout.binding_attribute_count(entry.binding) == 1,
        });
    }

    Ok(DestinationPlan { attributes })
}

/// Pass 3: fill the primary streams primitive by primitive.
fn copy_primary(survey: &Survey<'_>, plan: &DestinationPlan, out: &mut MeshStreamData) {
    let mut running_index: u32 = 0;
    let mut running_vertex: u32 = 0;

    for prim in &survey.primitives {
        out.sub_meshes.push(SubMesh {
            start_index: running_index,
            index_count: prim.index_count,
        });

        // Indices stay valid against the concatenated vertex buffer.
        for i in 0..prim.index_count as usize {
            out.indices
                .push_fast(running_vertex + index_value(&prim.index_slice, i));
        }

        for (semantic, src) in &prim.attributes {
            if let Some(dst) = plan.attribute(*semantic) {
                let count = src.count.min(prim.vertex_count as usize);
                let stride = out.vertex.stride(dst.binding) as usize;
                let buffer = out.vertex.bytes_mut(dst.binding);
                copy_attribute(buffer, stride, dst, running_vertex as usize, src, count);
            }
            if *semantic == VertexSemantic::Position {
                grow_bounds(&mut out.bounds, src, prim.vertex_count as usize);
            }
        }

        running_index += prim.index_count;
        running_vertex += prim.vertex_count;
    }
}

/// Copy one attribute's per-vertex elements into a binding buffer.
///
/// A binding holding only this attribute, fed by tightly packed source
/// data of the same element size, is a single bulk copy. Otherwise each
/// element is scattered to `vertex * stride + offset`.
fn copy_attribute(
    dst: &mut [u8],
    dst_stride: usize,
    attr: &DstAttribute,
    base_vertex: usize,
    src: &AccessorSlice<'_>,
    count: usize,
) {
    if attr.solo_binding && src.is_packed() && src.elem_size == dst_stride {
        let start = base_vertex * dst_stride;
        let len = (count * dst_stride)
            .min(src.data.len())
            .min(dst.len().saturating_sub(start));
        dst[start..start + len].copy_from_slice(&src.data[..len]);
        return;
    }

    for v in 0..count {
        let element = src.element(v);
        let at = (base_vertex + v) * dst_stride + attr.offset;
        let len = element
            .len()
            .min(attr.size)
            .min(dst.len().saturating_sub(at));
        dst[at..at + len].copy_from_slice(&element[..len]);
    }
}

/// Accumulate the bounding box from a float3 position accessor.
fn grow_bounds(bounds: &mut Aabb, src: &AccessorSlice<'_>, count: usize) {
    if src.data_type != DataType::F32 || src.elem_size != 12 {
        return;
    }
    for v in 0..count {
        let e = src.element(v);
        if e.len() == 12 {
            bounds.grow(Vec3::new(
                f32::from_le_bytes([e[0], e[1], e[2], e[3]]),
                f32::from_le_bytes([e[4], e[5], e[6], e[7]]),
                f32::from_le_bytes([e[8], e[9], e[10], e[11]]),
            ));
        }
    }
}

fn tracked_attr(semantic: VertexSemantic) -> Option<TrackedAttr> {
    match semantic {
        VertexSemantic::Position => Some(TrackedAttr::Position),
        VertexSemantic::Normal => Some(TrackedAttr::Normal),
        VertexSemantic::TexCoord(0) => Some(TrackedAttr::TexCoord0),
        VertexSemantic::Joints => Some(TrackedAttr::Joints),
        VertexSemantic::Weights => Some(TrackedAttr::Weights),
        _ => None,
    }
}

/// Pass 4: mirror indices and tracked attributes into the shadow block.
fn copy_shadow(survey: &Survey<'_>, shadow: &mut ShadowData) {
    let mut running_index: u32 = 0;
    let mut running_vertex: u32 = 0;

    for prim in &survey.primitives {
        for i in 0..prim.index_count {
            shadow.write_index(
                running_index + i,
                running_vertex + index_value(&prim.index_slice, i as usize),
            );
        }

        for (semantic, src) in &prim.attributes {
            let Some(attr) = tracked_attr(*semantic) else {
                continue;
            };
            let count = src.count.min(prim.vertex_count as usize);
            let (dst, elem_size) = shadow.attribute_mut(attr);
            if elem_size == 0 {
                continue;
            }
            let start = running_vertex as usize * elem_size;
            if src.is_packed() && src.elem_size == elem_size {
                let len = (count * elem_size)
                    .min(src.data.len())
                    .min(dst.len().saturating_sub(start));
                dst[start..start + len].copy_from_slice(&src.data[..len]);
            } else {
                for v in 0..count {
                    let element = src.element(v);
                    let at = start + v * elem_size;
                    let len = element
                        .len()
                        .min(elem_size)
                        .min(dst.len().saturating_sub(at));
                    dst[at..at + len].copy_from_slice(&element[..len]);
                }
            }
        }

        running_index += prim.index_count;
        running_vertex += prim.vertex_count;
    }
}
