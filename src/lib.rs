//! # meshstream
//!
//! Converts glTF scene descriptions (`.gltf`/`.glb` plus external buffer
//! files) into tightly packed, engine-native vertex and index streams ready
//! for upload to a graphics device.
//!
//! The crate has three areas:
//!
//! - [`stream`] - the destination containers: a declarative
//!   [`stream::VertexStreamLayout`], a byte-buffer [`stream::VertexStream`],
//!   and a fixed-width [`stream::IndicesStream`].
//! - [`gltf`] - the importer that loads a scene file, resolves its buffers,
//!   and bin-packs every primitive's geometry into the containers, with an
//!   optional CPU-side [`gltf::ShadowData`] mirror of select attributes.
//! - [`math`] - small math aliases used by the mesh types.
//!
//! Rendering concerns (device upload, descriptor setup, pass execution) are
//! consumers of the produced streams and live outside this crate.

pub mod gltf;
pub mod math;
pub mod stream;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
