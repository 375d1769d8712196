//! glTF scene importer.
//!
//! Loads a `.gltf`/`.glb` file, resolves its buffers (GLB blob, embedded
//! base64 data URIs, external `.bin` files next to the document), and packs
//! every primitive's geometry into caller-provided stream containers
//! according to a destination [`VertexStreamLayout`].
//!
//! # Usage
//!
//! ```ignore
//! use meshstream::gltf::{import_mesh, MeshStreamData};
//! use meshstream::stream::{VertexFormat, VertexSemantic, VertexStreamLayout};
//!
//! let mut layout = VertexStreamLayout::new();
//! layout.set_vertex_type(VertexSemantic::Position, VertexFormat::Float3, 0);
//! layout.set_vertex_type(VertexSemantic::Normal, VertexFormat::Float3, 0);
//! layout.set_vertex_type(VertexSemantic::TexCoord(0), VertexFormat::Float2, 0);
//!
//! let mut data = MeshStreamData::new(layout);
//! import_mesh("assets/model.gltf", &mut data)?;
//!
//! // Upload data.vertex / data.indices, draw data.sub_meshes ranges.
//! ```
//!
//! The importer is synchronous and single-threaded: one blocking call per
//! asset, no shared state between calls. Parallel loads run independent
//! calls on independent containers and merge afterwards via
//! [`IndicesStream::full_merge`](crate::stream::IndicesStream::full_merge).
//!
//! # Error model
//!
//! An unreadable or undecodable primary document is fatal and returned as
//! an [`ImportError`], with the containers untouched. A missing external
//! buffer file degrades to a zero-filled buffer with a warning; mismatched
//! per-primitive attribute counts are logged and clamped.

mod buffers;
mod error;
mod importer;
mod shadow;
#[cfg(test)]
mod tests;

pub use error::ImportError;
pub use shadow::ShadowData;

use std::path::Path;

use crate::math::Aabb;
use crate::stream::{IndicesStream, VertexStream, VertexStreamLayout};

/// One drawable index range within the concatenated index buffer,
/// corresponding to one source primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMesh {
    /// First index of the range.
    pub start_index: u32,
    /// Number of indices in the range.
    pub index_count: u32,
}

/// Destination aggregate for one imported asset.
///
/// The caller configures the vertex layout before the import; the importer
/// populates everything else. Sub-meshes are recorded in document order
/// (mesh order, then primitive order within each mesh).
#[derive(Debug, Clone, Default)]
pub struct MeshStreamData {
    /// Interleaved vertex data.
    pub vertex: VertexStream,
    /// Concatenated index data, remapped into the combined vertex space.
    pub indices: IndicesStream,
    /// Per-primitive draw ranges.
    pub sub_meshes: Vec<SubMesh>,
    /// Total joints across all skins in the document.
    pub joint_count: u32,
    /// Bounding box over all imported positions.
    pub bounds: Aabb,
}

impl MeshStreamData {
    /// Create an empty aggregate with the desired destination layout.
    pub fn new(layout: VertexStreamLayout) -> Self {
        Self {
            vertex: VertexStream::with_layout(layout),
            ..Self::default()
        }
    }
}

/// Import a glTF file into `data`.
///
/// On success the vertex and index streams are fully populated and
/// `data.sub_meshes` lists one `(start_index, index_count)` range per
/// primitive. On error the containers are left in their pre-call state.
pub fn import_mesh(path: impl AsRef<Path>, data: &mut MeshStreamData) -> Result<(), ImportError> {
    importer::import(path.as_ref(), data, false).map(|_| ())
}

/// Import a glTF file into `data` and additionally mirror remapped indices
/// plus position/normal/texcoord0/joints/weights data into a flat,
/// GPU-independent [`ShadowData`] block (for CPU ray queries, collision,
/// and other non-rendering consumers).
pub fn import_mesh_with_shadow(
    path: impl AsRef<Path>,
    data: &mut MeshStreamData,
) -> Result<ShadowData, ImportError> {
    let shadow = importer::import(path.as_ref(), data, true)?;
    debug_assert!(shadow.is_some());
    shadow.ok_or_else(|| ImportError::Buffer("shadow block was not produced".into()))
}
